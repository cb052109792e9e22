use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, info_span, warn, Instrument};

use ocr_core::credential::ApiKey;
use ocr_core::ocr::OcrRequest;
use ocr_core::ports::{OcrApiError, OcrApiPort};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP adapter for the Mistral `/v1/ocr` endpoint.
pub struct MistralOcrClient {
    http: reqwest::Client,
    endpoint: String,
}

impl MistralOcrClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build OCR HTTP client")?;
        Ok(Self::with_client(http, endpoint))
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Message from an error body: `error.message`, then `message`, then `detail`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let as_text = |v: &Value| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    };

    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(as_text)
        .or_else(|| value.get("message").and_then(as_text))
        .or_else(|| value.get("detail").and_then(as_text))
}

#[async_trait]
impl OcrApiPort for MistralOcrClient {
    async fn process(&self, api_key: &ApiKey, request: &OcrRequest) -> Result<Value, OcrApiError> {
        let span = info_span!(
            "infra.ocr.mistral_request",
            endpoint = %self.endpoint,
            model = %request.model,
            inline = request.document.is_inline(),
        );

        async move {
            let started = Instant::now();
            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(api_key.expose())
                .json(request)
                .send()
                .await
                .map_err(|e| OcrApiError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| OcrApiError::Transport(e.to_string()))?;
            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(status = status.as_u16(), elapsed_ms, "OCR API responded");

            if status == StatusCode::UNAUTHORIZED {
                return Err(OcrApiError::Unauthorized);
            }
            if !status.is_success() {
                let message = error_message(&body)
                    .unwrap_or_else(|| format!("OCR API request failed: {}", status.as_u16()));
                warn!(status = status.as_u16(), %message, "OCR API returned an error");
                return Err(OcrApiError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!(bytes = body.len(), "parsing OCR response body");
            serde_json::from_str(&body).map_err(|e| OcrApiError::InvalidResponse(e.to_string()))
        }
        .instrument(span)
        .await
    }
}
