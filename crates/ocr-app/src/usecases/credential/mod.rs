//! API key lifecycle: store, restore on startup, clear.

mod clear_api_key;
mod restore_api_key;
mod store_api_key;

pub use clear_api_key::{ClearApiKey, ClearApiKeyError};
pub use restore_api_key::{RestoreApiKey, RestoreApiKeyError, RestoreOutcome};
pub use store_api_key::{StoreApiKey, StoreApiKeyError, StoreOutcome};
