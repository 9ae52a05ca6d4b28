//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Persistence keys (one logical value each, last write wins)
pub const KEY_PROJECTS: &str = "launchbi.projects";
pub const KEY_ACTIVE_PROJECT: &str = "launchbi.active_project";
pub const KEY_ACTIVE_CAMPAIGN: &str = "launchbi.active_campaign";

// Selection defaults
pub const DEFAULT_CAMPAIGN: &str = "Geral";
pub const DEFAULT_PROJECT_NAME: &str = "Meu Projeto";
pub const DEFAULT_PROJECT_ID: i64 = 1;

// Lead field vocabulary (exact values used by the upstream capture flow)
pub const GENDER_MALE: &str = "Masculino";
pub const GENDER_FEMALE: &str = "Feminino";
pub const INCOME_TARGET_RANGE: &str = "2 a 5";
pub const SRC_ADS: &str = "ADS";
pub const SRC_PLAYER: &str = "Player";
pub const DEVICE_DESKTOP: &str = "desktop";

// Webhook endpoint
pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://n8n.rulianmedeiros.com/webhook";
pub const LEADS_PATH: &str = "/busca-leads";
pub const NO_DATA_CODE: i64 = 0;
