//! Acceptance rules for files entering the upload queue.
//!
//! Validation is split in two so the domain stays free of I/O:
//! [`FileValidationPolicy::precheck`] decides everything that can be known from
//! metadata, and [`FileValidationPolicy::decide_content`] judges the header
//! bytes once the caller has read them through a
//! [`FileContentPort`](crate::ports::FileContentPort).

mod filename;
mod format;
mod model;
mod policy;
mod report;

pub use filename::{sanitize_filename, MAX_FILENAME_LENGTH};
pub use format::{mime_essence, SupportedFormat, HEADER_PROBE_LEN};
pub use model::{CandidateFile, FileRejection, FileSource, FileVerdict, RejectionKind, ValidationWarning};
pub use policy::{ContentReadPolicy, FileLimits, FileValidationPolicy, DEFAULT_MAX_COUNT, DEFAULT_MAX_SIZE_BYTES};
pub use report::BatchReport;
