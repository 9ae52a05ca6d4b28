//! Application configuration structures
//!
//! Deserialized by `launchbi-infra`'s config loader from environment
//! variables or a JSON/TOML file.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_WEBHOOK_BASE_URL;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub webhook: WebhookConfig,
    pub dashboard: DashboardConfig,
}

/// Local state-store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite state database
    pub path: String,
    /// Connection pool size
    pub pool_size: u32,
}

/// Lead webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Base URL of the lead webhook (no trailing slash)
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// Dashboard presentation inputs that are not derived from leads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Campaign investment used for the cost-per-lead card
    pub investment: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: "launchbi.db".to_string(), pool_size: 4 },
            webhook: WebhookConfig {
                base_url: DEFAULT_WEBHOOK_BASE_URL.to_string(),
                timeout_seconds: 30,
            },
            dashboard: DashboardConfig { investment: 1500.0 },
        }
    }
}
