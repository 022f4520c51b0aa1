//! Environment variable names read by [`LoggerConfig::from_env`].
//!
//! These are purely helpers; the logger itself only ever sees an explicit
//! [`LoggerConfig`] value.
//!
//! [`LoggerConfig`]: crate::init::LoggerConfig
//! [`LoggerConfig::from_env`]: crate::init::LoggerConfig::from_env

/// Minimum level, e.g. `info` or `debug`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Output format name: `default`, `json` or `simple`.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Truthy flag that suppresses all output.
pub const LOG_SILENT_ENV: &str = "LOG_SILENT";

/// Truthy flag that enables ANSI colors on the level name.
pub const LOG_COLORS_ENV: &str = "LOG_COLORS";

const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

/// Read an environment variable or fall back to a provided default.
///
/// Unset and non-unicode values both yield the default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Case-insensitive affirmative check: `1`, `true`, `yes` and `on` (after
/// trimming surrounding whitespace) are true, everything else is false.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(value))
}
