//! Lead webhook client
//!
//! One GET per (project, campaign) against the capture webhook. The upstream
//! flow answers with either a JSON array of lead rows or a `{"code": 0}`
//! object meaning "no data for this filter". Anything else - transport
//! failures, non-2xx statuses, malformed bodies - is normalized to an empty
//! list: the dashboard shows zero leads, never an error.

use std::time::Duration;

use async_trait::async_trait;
use launchbi_core::LeadSource;
use launchbi_domain::constants::{LEADS_PATH, NO_DATA_CODE};
use launchbi_domain::{Lead, LaunchBiError, Result, WebhookConfig};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::http::HttpClient;

/// Client for the lead capture webhook.
pub struct WebhookLeadClient {
    http_client: HttpClient,
    base_url: String,
}

impl WebhookLeadClient {
    /// Create a client from the webhook configuration.
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .max_attempts(3)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and parse, reporting failures as errors.
    ///
    /// The public port method below is what normalizes these to empty.
    async fn try_fetch(&self, project_id: i64, campaign: &str) -> Result<Vec<Lead>> {
        let url = format!("{}{}", self.base_url, LEADS_PATH);

        let request = self
            .http_client
            .request(Method::GET, &url)
            .query(&[("id", project_id.to_string()), ("campaign", campaign.to_string())]);

        let response = self.http_client.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LaunchBiError::Network(format!("webhook answered HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| LaunchBiError::Network(format!("webhook body is not JSON: {err}")))?;

        Ok(parse_leads(body))
    }
}

#[async_trait]
impl LeadSource for WebhookLeadClient {
    /// Fetch the leads for one (project, campaign) pair.
    ///
    /// Never fails: any error is logged and surfaced as zero leads.
    #[instrument(skip(self))]
    async fn fetch_leads(&self, project_id: i64, campaign: &str) -> Result<Vec<Lead>> {
        match self.try_fetch(project_id, campaign).await {
            Ok(leads) => {
                debug!(count = leads.len(), "leads fetched");
                Ok(leads)
            }
            Err(err) => {
                warn!(error = %err, "lead fetch failed; returning empty list");
                Ok(Vec::new())
            }
        }
    }
}

/// Apply the webhook response normalization rules.
///
/// - array → one lead per element (a non-object element still counts as a
///   record, with every field absent, matching how the front end counted
///   rows);
/// - object with `code == 0` → no data, empty list;
/// - any other shape → empty list.
fn parse_leads(body: Value) -> Vec<Lead> {
    match body {
        Value::Array(rows) => rows
            .into_iter()
            .map(|row| serde_json::from_value(row).unwrap_or_default())
            .collect(),
        Value::Object(fields) => {
            if fields.get("code").and_then(Value::as_i64) == Some(NO_DATA_CODE) {
                debug!("webhook signalled no data for this filter");
            } else {
                warn!("webhook answered a non-array body; treating as empty");
            }
            Vec::new()
        }
        _ => {
            warn!("webhook answered a non-array body; treating as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn array_body_parses_each_record() {
        let leads = parse_leads(json!([
            {"email": "a@b.com", "qualificado": true},
            {"email": "c@d.com"}
        ]));
        assert_eq!(leads.len(), 2);
        assert!(leads[0].qualificado);
    }

    #[test]
    fn no_data_sentinel_is_empty() {
        assert!(parse_leads(json!({"code": 0, "message": "no rows"})).is_empty());
    }

    #[test]
    fn other_object_bodies_are_empty() {
        assert!(parse_leads(json!({"error": "boom"})).is_empty());
    }

    #[test]
    fn scalar_bodies_are_empty() {
        assert!(parse_leads(json!("unexpected")).is_empty());
        assert!(parse_leads(json!(42)).is_empty());
    }

    #[test]
    fn non_object_array_elements_count_as_blank_records() {
        let leads = parse_leads(json!([{"email": "a@b.com"}, "junk", 7]));
        assert_eq!(leads.len(), 3);
        assert!(!leads[1].qualificado);
        assert_eq!(leads[2].email, None);
    }
}
