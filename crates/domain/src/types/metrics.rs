//! Derived dashboard metrics
//!
//! Output of the lead aggregator: a pure, deterministic function of the lead
//! list and the configured investment. Never persisted; recomputed on every
//! fetch/render cycle. Bucket order is fixed by the struct definitions, not
//! by input order, and the serde names match the chart labels the front end
//! renders.

use serde::{Deserialize, Serialize};

/* -------------------------------------------------------------------------- */
/* Breakdown buckets */
/* -------------------------------------------------------------------------- */

/// Survey gender buckets; records with any other (or absent) answer are
/// excluded from both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderBreakdown {
    #[serde(rename = "Masculino")]
    pub masculino: u32,
    #[serde(rename = "Feminino")]
    pub feminino: u32,
}

impl GenderBreakdown {
    /// Bucketed records only; at most the total lead count.
    pub fn sum(&self) -> u32 {
        self.masculino + self.feminino
    }
}

/// Monthly-income buckets; records without an answer count in neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    /// Answers containing the target range substring
    #[serde(rename = "2 a 5 Salários")]
    pub faixa_2_a_5: u32,
    /// Any other answered range
    #[serde(rename = "Outros")]
    pub outros: u32,
}

/// Paid-vs-organic traffic split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSplit {
    #[serde(rename = "ADS")]
    pub ads: u32,
    #[serde(rename = "Player")]
    pub player: u32,
}

/// Device split detected from the capture UTM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSplit {
    pub desktop: u32,
    /// Everything that is not a desktop capture
    pub mobile: u32,
}

/* -------------------------------------------------------------------------- */
/* Aggregate */
/* -------------------------------------------------------------------------- */

/// Everything the dashboard cards and charts need for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Count of all records
    pub total: u32,
    /// Records with a truthy qualification judgment
    pub qualified: u32,
    /// Records carrying an age or gender answer
    pub respondents: u32,
    /// `respondents / total * 100`, one fraction digit, 0 for no leads
    pub response_rate: f64,
    pub gender: GenderBreakdown,
    pub income: IncomeBreakdown,
    pub traffic: TrafficSplit,
    pub devices: DeviceSplit,
    /// Leads per UTC hour of capture
    pub hourly: [u32; 24],
    /// Configured campaign investment
    pub investment: f64,
    /// `investment / total`, two fraction digits; the raw investment when
    /// there are no leads
    pub cost_per_lead: f64,
}
