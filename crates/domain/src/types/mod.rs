//! Domain types and models

pub mod lead;
pub mod metrics;
pub mod project;

pub use lead::Lead;
pub use metrics::{DashboardMetrics, DeviceSplit, GenderBreakdown, IncomeBreakdown, TrafficSplit};
pub use project::{parse_campaign_list, Project, SelectionKey, SelectionState};
