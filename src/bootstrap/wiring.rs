//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on `ocr-infra`, `ocr-platform` and `ocr-app`
//! at once. Assembly only: no decisions about what a missing key or a
//! rejected file means.

use std::sync::Arc;

use ocr_app::usecases::{
    AcceptUrl, ClearApiKey, ExportResult, PasteClipboardImage, RestoreApiKey, RunOcr, StoreApiKey,
    ValidateFiles,
};
use ocr_core::config::ResolvedConfig;
use ocr_core::file_validation::FileValidationPolicy;
use ocr_core::ports::{
    ClipboardImagePort, ClockPort, CredentialCipherPort, CredentialStatePort,
    DeviceFingerprintPort, FileContentPort, KeyValueStorePort, OcrApiPort, ResultExportPort,
};
use ocr_infra::fs::{FsFileContentReader, FsResultExporter};
use ocr_infra::ocr::MistralOcrClient;
use ocr_infra::security::AesGcmCredentialCipher;
use ocr_infra::storage::{JsonFileKeyValueStore, KvCredentialRepository};
use ocr_infra::SystemClock;
use ocr_platform::{ArboardClipboard, HostFingerprintAdapter};

pub type WiringResult<T> = Result<T, WiringError>;

/// 依赖装配错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("OCR client initialization failed: {0}")]
    OcrClientInit(String),
}

/// Every use case the host can invoke, fully wired.
pub struct AppUseCases {
    pub store_api_key: StoreApiKey,
    pub restore_api_key: RestoreApiKey,
    pub clear_api_key: ClearApiKey,
    pub validate_files: Arc<ValidateFiles>,
    pub accept_url: AcceptUrl,
    pub paste_clipboard_image: PasteClipboardImage,
    pub run_ocr: RunOcr,
    pub export_result: ExportResult,
}

/// Wire all dependencies together.
/// 将所有依赖连接在一起。
pub fn wire_dependencies(config: &ResolvedConfig) -> WiringResult<AppUseCases> {
    // Credential storage / 凭据存储
    let store: Arc<dyn KeyValueStorePort> =
        Arc::new(JsonFileKeyValueStore::new(config.credential_store_path.clone()));
    let credentials: Arc<dyn CredentialStatePort> = Arc::new(KvCredentialRepository::new(store));
    let cipher: Arc<dyn CredentialCipherPort> = Arc::new(AesGcmCredentialCipher::new());
    let fingerprint: Arc<dyn DeviceFingerprintPort> = Arc::new(HostFingerprintAdapter::new());

    // Files and OCR / 文件与 OCR
    let content: Arc<dyn FileContentPort> = Arc::new(FsFileContentReader);
    let api: Arc<dyn OcrApiPort> = Arc::new(
        MistralOcrClient::new(&config.ocr_endpoint)
            .map_err(|e| WiringError::OcrClientInit(format!("{e:#}")))?,
    );
    let exporter: Arc<dyn ResultExportPort> = Arc::new(FsResultExporter);

    // Platform / 平台
    let clipboard: Arc<dyn ClipboardImagePort> = Arc::new(ArboardClipboard::new());
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let validate_files = Arc::new(ValidateFiles::new(
        content.clone(),
        FileValidationPolicy::new(config.file_limits.clone()),
    ));

    Ok(AppUseCases {
        store_api_key: StoreApiKey::new(credentials.clone(), cipher.clone(), fingerprint.clone()),
        restore_api_key: RestoreApiKey::new(credentials.clone(), cipher, fingerprint),
        clear_api_key: ClearApiKey::new(credentials),
        validate_files: validate_files.clone(),
        accept_url: AcceptUrl::new(),
        paste_clipboard_image: PasteClipboardImage::new(clipboard, clock, validate_files.clone()),
        run_ocr: RunOcr::new(content, validate_files, api, config.ocr_model.clone()),
        export_result: ExportResult::new(exporter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocr_core::app_dirs::AppDirs;
    use tempfile::TempDir;

    #[test]
    fn test_wiring_error_display() {
        let err = WiringError::OcrClientInit("tls backend missing".to_string());
        assert!(err.to_string().contains("OCR client initialization"));
        assert!(err.to_string().contains("tls backend missing"));
    }

    #[tokio::test]
    async fn test_wired_usecases_share_credential_store() {
        let dir = TempDir::new().unwrap();
        let dirs = AppDirs {
            app_data_root: dir.path().to_path_buf(),
        };
        let config = crate::bootstrap::resolve_config(None, &dirs).unwrap();
        let usecases = wire_dependencies(&config).unwrap();

        usecases.clear_api_key.execute().unwrap();
        let outcome = usecases.restore_api_key.execute().await.unwrap();

        assert!(outcome.key().is_none());
        assert_eq!(
            usecases.validate_files.policy().limits(),
            &config.file_limits
        );
    }
}
