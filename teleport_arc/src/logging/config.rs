use std::collections::HashMap;
use tracing::Level;

/// Per-scope log levels, parsed from a string like `warn,collision=debug,render=trace`
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        Self::from_env_with_default(env_var_name, Level::WARN)
    }

    /// Like [`Self::from_env`], but scopes the variable does not mention log
    /// at `default_level` instead of WARN.
    pub fn from_env_with_default(env_var_name: &str, default_level: Level) -> Self {
        let mut config = Self::new();
        config.set_global_level(default_level);

        if let Ok(log_config) = std::env::var(env_var_name) {
            config.parse_config_string(&log_config);
        }

        config
    }

    pub fn parse(config_str: &str) -> Self {
        let mut config = Self::new();
        config.parse_config_string(config_str);
        config
    }

    fn parse_config_string(&mut self, config_str: &str) {
        for part in config_str.split(',').map(str::trim) {
            if part.is_empty() {
                continue;
            }

            match part.split_once('=') {
                Some((scope, level)) => {
                    if let Some(level) = parse_level(level.trim()) {
                        self.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Some(level) = parse_level(part) {
                        self.global_level = level;
                    }
                }
            }
        }
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        let target_level = self.scope_levels.get(scope).unwrap_or(&self.global_level);
        level <= *target_level
    }

    pub fn set_global_level(&mut self, level: Level) {
        self.global_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Install the fmt subscriber (once) and load the scope table from `env_var_name`.
///
/// Embedders pick their own variable, e.g. `init_logging("TELEPORT_ARC_LOG")`.
/// The first call wins; later calls return the freshly parsed config but do not
/// replace the installed one.
pub fn init_logging(env_var_name: &str) -> LogConfig {
    init_logging_with_level(env_var_name, Level::WARN)
}

/// [`init_logging`] with a caller-chosen level for scopes the variable leaves
/// unset. Tools use this to honour a `--verbose` flag.
pub fn init_logging_with_level(env_var_name: &str, default_level: Level) -> LogConfig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = LogConfig::from_env_with_default(env_var_name, default_level);
    super::set_log_config(config.clone());
    config
}
