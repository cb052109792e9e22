//! Gatekeeping for user-supplied URLs.
//!
//! A URL is checked before it is ever used as a fetch target or handed to the
//! OCR API as a remote reference. The guard performs no network access and no
//! DNS resolution: a public host name that resolves to a private address is not
//! caught here.

mod model;
mod rules;

pub use model::{UrlKind, UrlRejection, UrlVerdict, ValidatedUrl};
pub use rules::validate_url;
