//! Port interface for fetching leads

use async_trait::async_trait;
use launchbi_domain::{Lead, Result};

/// Trait for fetching the lead list of one (project, campaign) pair.
///
/// The webhook adapter normalizes every failure to an empty list and never
/// returns an error; the `Result` exists for other implementations, and
/// [`super::LeadFeed`] treats an `Err` as empty anyway so callers never see
/// one.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// Fetch the leads captured for the given project and campaign.
    async fn fetch_leads(&self, project_id: i64, campaign: &str) -> Result<Vec<Lead>>;
}
