use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use ocr_core::file_validation::{
    BatchReport, CandidateFile, FileValidationPolicy, FileVerdict, HEADER_PROBE_LEN,
};
use ocr_core::ports::FileContentPort;

/// Validate files before they are queued for OCR.
///
/// ## Behavior
///
/// - Metadata checks first; header bytes are read only for images that
///   passed them
/// - Files beyond the configured count are reported as too many, in order
/// - A batch never fails as a whole
pub struct ValidateFiles {
    content: Arc<dyn FileContentPort>,
    policy: FileValidationPolicy,
}

impl ValidateFiles {
    pub fn new(content: Arc<dyn FileContentPort>, policy: FileValidationPolicy) -> Self {
        Self { content, policy }
    }

    pub fn policy(&self) -> &FileValidationPolicy {
        &self.policy
    }

    pub async fn validate_one(&self, file: &CandidateFile) -> FileVerdict {
        let format = match self.policy.precheck(file) {
            Ok(format) => format,
            Err(rejection) => {
                debug!(file = %file.name, %rejection, "file rejected");
                return FileVerdict::Rejected(rejection);
            }
        };

        if !format.requires_content_check() {
            return FileVerdict::accepted();
        }

        let header = self.content.read_prefix(&file.source, HEADER_PROBE_LEN).await;
        let verdict = self.policy.decide_content(file, format, header.as_deref());
        if let FileVerdict::Rejected(rejection) = &verdict {
            debug!(file = %file.name, %rejection, "file rejected");
        }
        verdict
    }

    pub async fn execute(&self, files: Vec<CandidateFile>) -> BatchReport {
        let span = info_span!("usecase.validate_files.execute", count = files.len());

        async {
            let max_count = self.policy.limits().max_count;
            let mut report = BatchReport::new(self.policy.limits().clone());

            for (index, file) in files.into_iter().enumerate() {
                if index >= max_count {
                    report.record_too_many(file.name);
                    continue;
                }
                let verdict = self.validate_one(&file).await;
                report.record(file, verdict);
            }

            for warning in &report.warnings {
                warn!(%warning, "accepted without content check");
            }
            info!(
                accepted = report.accepted.len(),
                rejected = report.rejected_count(),
                "file batch validated"
            );
            report
        }
        .instrument(span)
        .await
    }
}
