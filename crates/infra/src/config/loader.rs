//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. If no file is found either, falls back to the built-in defaults
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LAUNCHBI_DB_PATH`: State database file path
//! - `LAUNCHBI_DB_POOL_SIZE`: Connection pool size (optional, default 4)
//! - `LAUNCHBI_WEBHOOK_BASE_URL`: Lead webhook base URL
//! - `LAUNCHBI_WEBHOOK_TIMEOUT`: Webhook timeout in seconds (optional, default 30)
//! - `LAUNCHBI_INVESTMENT`: Campaign investment for the cost-per-lead card
//!   (optional, default 1500)
//!
//! ## File Locations
//! The loader probes `config.json` / `config.toml` and `launchbi.json` /
//! `launchbi.toml` in the working directory, its parents (2 levels), and
//! next to the executable.

use std::path::{Path, PathBuf};

use launchbi_domain::{Config, LaunchBiError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file; if no
/// file exists either, the built-in defaults are used.
pub fn load() -> Config {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(env_err) => match load_from_file(None) {
            Ok(config) => config,
            Err(file_err) => {
                tracing::debug!(
                    env = ?env_err,
                    file = ?file_err,
                    "no configuration source found; using defaults"
                );
                Config::default()
            }
        },
    }
}

/// Load configuration from environment variables
///
/// `LAUNCHBI_DB_PATH` and `LAUNCHBI_WEBHOOK_BASE_URL` must be present; the
/// remaining variables fall back to the built-in defaults.
///
/// # Errors
/// Returns `LaunchBiError::Config` if a required variable is missing or a
/// value fails to parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("LAUNCHBI_DB_PATH")?;
    if let Some(raw) = optional_env("LAUNCHBI_DB_POOL_SIZE") {
        config.database.pool_size = raw
            .parse::<u32>()
            .map_err(|e| LaunchBiError::Config(format!("Invalid pool size: {e}")))?;
    }

    config.webhook.base_url = env_var("LAUNCHBI_WEBHOOK_BASE_URL")?;
    if let Some(raw) = optional_env("LAUNCHBI_WEBHOOK_TIMEOUT") {
        config.webhook.timeout_seconds = raw
            .parse::<u64>()
            .map_err(|e| LaunchBiError::Config(format!("Invalid webhook timeout: {e}")))?;
    }

    if let Some(raw) = optional_env("LAUNCHBI_INVESTMENT") {
        config.dashboard.investment = raw
            .parse::<f64>()
            .map_err(|e| LaunchBiError::Config(format!("Invalid investment: {e}")))?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LaunchBiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LaunchBiError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LaunchBiError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LaunchBiError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LaunchBiError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LaunchBiError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(LaunchBiError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("launchbi.json"),
            cwd.join("launchbi.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("launchbi.json"),
                exe_dir.join("launchbi.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        LaunchBiError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Get optional environment variable, empty treated as unset
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [
            "LAUNCHBI_DB_PATH",
            "LAUNCHBI_DB_POOL_SIZE",
            "LAUNCHBI_WEBHOOK_BASE_URL",
            "LAUNCHBI_WEBHOOK_TIMEOUT",
            "LAUNCHBI_INVESTMENT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LAUNCHBI_DB_PATH", "/tmp/test.db");
        std::env::set_var("LAUNCHBI_DB_POOL_SIZE", "5");
        std::env::set_var("LAUNCHBI_WEBHOOK_BASE_URL", "https://hooks.example.com/webhook");
        std::env::set_var("LAUNCHBI_WEBHOOK_TIMEOUT", "15");
        std::env::set_var("LAUNCHBI_INVESTMENT", "2500");

        let config = load_from_env().expect("env config loads");
        assert_eq!(config.database.path, "/tmp/test.db");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.webhook.base_url, "https://hooks.example.com/webhook");
        assert_eq!(config.webhook.timeout_seconds, 15);
        assert_eq!(config.dashboard.investment, 2500.0);

        clear_env();
    }

    #[test]
    fn test_load_from_env_optional_vars_default() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LAUNCHBI_DB_PATH", "/tmp/test.db");
        std::env::set_var("LAUNCHBI_WEBHOOK_BASE_URL", "https://hooks.example.com/webhook");

        let config = load_from_env().expect("env config loads");
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.webhook.timeout_seconds, 30);
        assert_eq!(config.dashboard.investment, 1500.0);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_required_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with missing env var");
        assert!(matches!(result.unwrap_err(), LaunchBiError::Config(_)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LAUNCHBI_DB_PATH", "/tmp/test.db");
        std::env::set_var("LAUNCHBI_WEBHOOK_BASE_URL", "https://hooks.example.com/webhook");
        std::env::set_var("LAUNCHBI_DB_POOL_SIZE", "not-a-number");

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with invalid pool size");
        assert!(matches!(result.unwrap_err(), LaunchBiError::Config(_)));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "database": { "path": "test.db", "pool_size": 4 },
            "webhook": { "base_url": "https://hooks.example.com/webhook", "timeout_seconds": 20 },
            "dashboard": { "investment": 1800.0 }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("json config loads");
        assert_eq!(config.database.path, "test.db");
        assert_eq!(config.webhook.timeout_seconds, 20);
        assert_eq!(config.dashboard.investment, 1800.0);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[database]
path = "test.db"
pool_size = 6

[webhook]
base_url = "https://hooks.example.com/webhook"
timeout_seconds = 25

[dashboard]
investment = 900.0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("toml config loads");
        assert_eq!(config.database.pool_size, 6);
        assert_eq!(config.webhook.timeout_seconds, 25);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(result.is_err(), "Should fail when file not found");
        assert!(matches!(result.unwrap_err(), LaunchBiError::Config(_)));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
