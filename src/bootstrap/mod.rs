//! Process bootstrap: configuration, tracing, dependency wiring.
//!
//! 启动流程：配置加载 → 日志初始化 → 依赖装配。

pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_config};
pub use tracing::init_tracing_subscriber;
pub use wiring::{wire_dependencies, AppUseCases, WiringError};
