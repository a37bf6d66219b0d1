pub mod config;
pub mod macros;

pub use config::{LogConfig, init_logging, init_logging_with_level};
pub use tracing::{Level, debug, error, info, trace, warn};

use once_cell::sync::Lazy;
use std::sync::OnceLock;

/// Environment variable read by [`init_logging`] when no other name is supplied
pub const DEFAULT_LOG_ENV: &str = "TELEPORT_ARC_LOG";

static LOG_CONFIG: OnceLock<LogConfig> = OnceLock::new();
static DEFAULT_CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::default);

pub fn get_log_config() -> &'static LogConfig {
    LOG_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}

pub(crate) fn set_log_config(config: LogConfig) {
    LOG_CONFIG.set(config).ok();
}
