//! Lead feed with the stale-response ordering guarantee
//!
//! Selection changes can overlap an in-flight fetch. Each fetch is tagged
//! with a generation captured before the await; on completion the result is
//! applied only if no newer fetch started in the meantime. A superseded
//! request runs to completion and its response is discarded, so the snapshot
//! always reflects the most recently requested selection.

use std::sync::Arc;

use launchbi_domain::{Lead, SelectionKey};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::ports::LeadSource;

/// Read-only view of the feed for rendering.
///
/// `loading` distinguishes "fetch in flight" from "completed with zero
/// results" - an empty dashboard is only final once it clears.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub leads: Vec<Lead>,
    pub loading: bool,
}

#[derive(Default)]
struct FeedState {
    leads: Vec<Lead>,
    loading: bool,
    generation: u64,
}

/// Owns the lead list for the current selection.
pub struct LeadFeed {
    source: Arc<dyn LeadSource>,
    state: Mutex<FeedState>,
}

impl LeadFeed {
    /// Create a feed over the given source. The snapshot starts empty and
    /// not loading.
    pub fn new(source: Arc<dyn LeadSource>) -> Self {
        Self { source, state: Mutex::new(FeedState::default()) }
    }

    /// Fetch the leads for `key` and apply them unless a newer refresh
    /// started while this one was in flight.
    ///
    /// Fetch errors are normalized to an empty list; the method never fails.
    /// Returns whether the response was applied (`false` means it was
    /// discarded as stale).
    pub async fn refresh(&self, key: &SelectionKey) -> bool {
        let tag = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.loading = true;
            state.generation
        };

        let leads = match self.source.fetch_leads(key.project_id, &key.campaign).await {
            Ok(leads) => leads,
            Err(err) => {
                warn!(
                    project_id = key.project_id,
                    campaign = %key.campaign,
                    error = %err,
                    "lead fetch failed; treating as empty"
                );
                Vec::new()
            }
        };

        let mut state = self.state.lock();
        if state.generation != tag {
            debug!(
                project_id = key.project_id,
                campaign = %key.campaign,
                "stale lead response discarded"
            );
            return false;
        }
        debug!(count = leads.len(), "lead snapshot applied");
        state.leads = leads;
        state.loading = false;
        true
    }

    /// Current leads plus the loading flag.
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.lock();
        FeedSnapshot { leads: state.leads.clone(), loading: state.loading }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use launchbi_domain::{LaunchBiError, Result};
    use tokio::sync::oneshot;

    use super::*;

    fn key(campaign: &str) -> SelectionKey {
        SelectionKey { project_id: 1, campaign: campaign.to_string() }
    }

    fn lead(email: &str) -> Lead {
        Lead { email: Some(email.to_string()), ..Lead::default() }
    }

    /// Source whose responses are released by the test, one gate per
    /// campaign.
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<String, oneshot::Receiver<Vec<Lead>>>>,
    }

    impl GatedSource {
        fn gate(&self, campaign: &str) -> oneshot::Sender<Vec<Lead>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().insert(campaign.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl LeadSource for GatedSource {
        async fn fetch_leads(&self, _project_id: i64, campaign: &str) -> Result<Vec<Lead>> {
            let gate = self.gates.lock().remove(campaign);
            match gate {
                Some(rx) => rx
                    .await
                    .map_err(|_| LaunchBiError::Internal("gate dropped".into())),
                None => Ok(Vec::new()),
            }
        }
    }

    /// Source that always fails at the transport level.
    struct FailingSource;

    #[async_trait]
    impl LeadSource for FailingSource {
        async fn fetch_leads(&self, _project_id: i64, _campaign: &str) -> Result<Vec<Lead>> {
            Err(LaunchBiError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn refresh_applies_leads_and_clears_loading() {
        let source = Arc::new(GatedSource::default());
        let release = source.gate("x");
        let feed = Arc::new(LeadFeed::new(source));

        let worker = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.refresh(&key("x")).await })
        };
        tokio::task::yield_now().await;
        assert!(feed.snapshot().loading, "fetch in flight must be visible");

        release.send(vec![lead("a@b.com")]).expect("gate open");
        assert!(worker.await.expect("task finishes"), "fresh response is applied");

        let snapshot = feed.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.leads.len(), 1);
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let source = Arc::new(GatedSource::default());
        let release_a = source.gate("x");
        let release_b = source.gate("y");
        let feed = Arc::new(LeadFeed::new(source));

        // fetch A for campaign "x" starts first...
        let fetch_a = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.refresh(&key("x")).await })
        };
        tokio::task::yield_now().await;

        // ...then the selection moves to campaign "y" while A is in flight
        let fetch_b = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.refresh(&key("y")).await })
        };
        tokio::task::yield_now().await;

        // B completes first and wins
        release_b.send(vec![lead("y@leads.com")]).expect("gate open");
        assert!(fetch_b.await.expect("task finishes"));

        // A completes afterwards and must be dropped
        release_a.send(vec![lead("x@leads.com")]).expect("gate open");
        assert!(!fetch_a.await.expect("task finishes"), "stale response must be discarded");

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.leads.len(), 1);
        assert_eq!(snapshot.leads[0].email.as_deref(), Some("y@leads.com"));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn fetch_error_surfaces_as_zero_leads() {
        let feed = LeadFeed::new(Arc::new(FailingSource));
        assert!(feed.refresh(&key("x")).await, "an error result is still applied as empty");

        let snapshot = feed.snapshot();
        assert!(snapshot.leads.is_empty());
        assert!(!snapshot.loading);
    }
}
