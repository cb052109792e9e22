use std::collections::BTreeMap;

use super::model::{CandidateFile, FileVerdict, RejectionKind, ValidationWarning};
use super::policy::FileLimits;

/// Outcome of validating a selection of files.
///
/// A batch never fails as a whole: each file lands either in `accepted` or in
/// the rejection list for its failure category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    limits: FileLimits,
    pub accepted: Vec<CandidateFile>,
    pub rejected: BTreeMap<RejectionKind, Vec<String>>,
    pub warnings: Vec<ValidationWarning>,
}

impl BatchReport {
    pub fn new(limits: FileLimits) -> Self {
        Self {
            limits,
            accepted: Vec::new(),
            rejected: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record(&mut self, file: CandidateFile, verdict: FileVerdict) {
        match verdict {
            FileVerdict::Accepted { warnings } => {
                self.warnings.extend(warnings);
                self.accepted.push(file);
            }
            FileVerdict::Rejected(rejection) => {
                self.push_rejected(rejection.kind(), file.name);
            }
        }
    }

    /// Record a file that was skipped because the batch exceeded `max_count`.
    pub fn record_too_many(&mut self, name: impl Into<String>) {
        self.push_rejected(RejectionKind::TooMany, name.into());
    }

    fn push_rejected(&mut self, kind: RejectionKind, name: String) {
        self.rejected.entry(kind).or_default().push(name);
    }

    pub fn rejected_names(&self, kind: RejectionKind) -> &[String] {
        self.rejected.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.values().map(Vec::len).sum()
    }

    pub fn is_complete_success(&self) -> bool {
        self.rejected.is_empty()
    }

    /// One line per non-empty failure category, naming the affected files.
    pub fn summaries(&self) -> Vec<String> {
        self.rejected
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(kind, names)| {
                let files = names.join(", ");
                match kind {
                    RejectionKind::UnsupportedType => format!(
                        "Unsupported file type, ignored: {files}. Supported: JPG, PNG, GIF, BMP, WebP, PDF"
                    ),
                    RejectionKind::ExtensionMismatch => format!(
                        "File extension does not match the declared type, ignored: {files}"
                    ),
                    RejectionKind::TooLarge => format!(
                        "Files larger than {}MB, ignored: {files}",
                        self.limits.max_size_bytes / (1024 * 1024)
                    ),
                    RejectionKind::ContentMismatch => format!(
                        "File content does not match the declared type, ignored: {files}"
                    ),
                    RejectionKind::Unreadable => {
                        format!("File content could not be read, ignored: {files}")
                    }
                    RejectionKind::TooMany => format!(
                        "At most {} files are processed at once, ignored: {files}",
                        self.limits.max_count
                    ),
                }
            })
            .collect()
    }
}
