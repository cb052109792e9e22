//! OS-facing adapters: per-user directories, host environment signals and the
//! system clipboard.

pub mod app_dirs;
pub mod clipboard;
pub mod environment;

pub use app_dirs::DirsAppDirsAdapter;
pub use clipboard::ArboardClipboard;
pub use environment::HostFingerprintAdapter;
