//! Configuration file loading with precedence handling.

use crate::options::{DEFAULT_ADD_CALLER, DEFAULT_FUNCTION_SNIPPET_LENGTH};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HISTORICAL_CONSOLE_CONFIG";
/// Environment override for `add_caller`.
pub const ADD_CALLER_ENV: &str = "HISTORICAL_CONSOLE_ADD_CALLER";
/// Environment override for `function_snippet_length`.
pub const SNIPPET_LENGTH_ENV: &str = "HISTORICAL_CONSOLE_SNIPPET_LENGTH";

const APP_DIR: &str = "historical-console";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A snippet length of zero would blank every unnamed caller label.
    #[error("function_snippet_length must be greater than zero")]
    ZeroSnippetLength,
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/historical-console/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Append the caller label to each record.
    #[serde(default)]
    pub add_caller: Option<bool>,

    /// Snippet length for unnamed callers.
    #[serde(default)]
    pub function_snippet_length: Option<usize>,

    /// Recover function names from source text.
    #[serde(default)]
    pub legacy_function_names: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Append the caller label to each record.
    pub add_caller: bool,
    /// Snippet length for unnamed callers.
    pub function_snippet_length: usize,
    /// Recover function names from source text.
    pub legacy_function_names: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            add_caller: DEFAULT_ADD_CALLER,
            function_snippet_length: DEFAULT_FUNCTION_SNIPPET_LENGTH,
            legacy_function_names: false,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/historical-console/historical-console.log` on
/// Unix-like systems, or the platform equivalent. Falls back to the current
/// directory when no state directory is known.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join(APP_DIR).join("historical-console.log")
    } else {
        PathBuf::from("historical-console.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors, or sets
/// `function_snippet_length = 0`.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    if config.function_snippet_length == Some(0) {
        return Err(ConfigError::ZeroSnippetLength);
    }

    tracing::debug!(path = %path.display(), "loaded console config");
    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/historical-console/config.toml` on Unix, appropriate
/// path on other platforms. Returns `None` if no config directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (like CLI `--config`)
/// 2. `HISTORICAL_CONSOLE_CONFIG` environment variable
/// 3. Default path
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        add_caller: config.add_caller.unwrap_or(defaults.add_caller),
        function_snippet_length: config
            .function_snippet_length
            .unwrap_or(defaults.function_snippet_length),
        legacy_function_names: config
            .legacy_function_names
            .unwrap_or(defaults.legacy_function_names),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `HISTORICAL_CONSOLE_ADD_CALLER`: `true`/`false`/`1`/`0`
/// - `HISTORICAL_CONSOLE_SNIPPET_LENGTH`: positive integer
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(ADD_CALLER_ENV) {
        match parse_flag(&raw) {
            Some(add_caller) => config.add_caller = add_caller,
            None => tracing::warn!(var = ADD_CALLER_ENV, value = %raw, "ignoring invalid boolean"),
        }
    }

    if let Ok(raw) = std::env::var(SNIPPET_LENGTH_ENV) {
        match raw.trim().parse::<usize>() {
            Ok(length) if length > 0 => config.function_snippet_length = length,
            _ => tracing::warn!(var = SNIPPET_LENGTH_ENV, value = %raw, "ignoring invalid snippet length"),
        }
    }

    config
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    add_caller_override: Option<bool>,
    snippet_length_override: Option<usize>,
    log_file_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(add_caller) = add_caller_override {
        config.add_caller = add_caller;
    }

    if let Some(length) = snippet_length_override {
        config.function_snippet_length = length;
    }

    if let Some(path) = log_file_override {
        config.log_file_path = path;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_log_file_name() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("historical-console.log"),
            "Default log path should end with 'historical-console.log', got: {:?}",
            path
        );
    }

    #[test]
    fn resolved_config_default_includes_log_path() {
        let config = ResolvedConfig::default();
        assert!(
            !config.log_file_path.as_os_str().is_empty(),
            "Default config should have non-empty log_file_path"
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/console.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(
            resolved.log_file_path, custom_path,
            "Config file log_file_path should override default"
        );
    }
}
