pub mod fs;
pub mod ocr;
pub mod security;
pub mod storage;
pub mod time;

pub use time::SystemClock;
