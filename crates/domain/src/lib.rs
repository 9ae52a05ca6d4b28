//! # LaunchBI Domain
//!
//! Business domain types and models for LaunchBI.
//!
//! This crate contains:
//! - Domain data types (Project, Lead, SelectionState, DashboardMetrics)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other LaunchBI crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{Config, DashboardConfig, DatabaseConfig, WebhookConfig};
pub use errors::{LaunchBiError, Result};
pub use types::lead::Lead;
pub use types::metrics::{
    DashboardMetrics, DeviceSplit, GenderBreakdown, IncomeBreakdown, TrafficSplit,
};
pub use types::project::{parse_campaign_list, Project, SelectionKey, SelectionState};
