//! Project and selection-state types
//!
//! A project groups campaigns and the (optional) ad-platform credentials a
//! future traffic integration will consume. The selection state is the one
//! piece of UI state this core persists across restarts.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CAMPAIGN, DEFAULT_PROJECT_ID, DEFAULT_PROJECT_NAME,
};

/// Top-level grouping of campaigns and ad-platform credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier, immutable after creation
    pub id: i64,
    /// Non-empty display name
    pub name: String,
    /// Ordered, distinct campaign names; always at least one entry
    pub campaigns: Vec<String>,
    /// Meta Ads account id, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_account_id: Option<String>,
    /// Meta Ads access token, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Project {
    /// First campaign of the project.
    ///
    /// Every project carries at least one campaign; the default sentinel is
    /// returned only if a deserialized project violated that invariant.
    pub fn first_campaign(&self) -> &str {
        self.campaigns.first().map_or(DEFAULT_CAMPAIGN, String::as_str)
    }

    /// Whether a campaign with this name exists on the project.
    pub fn has_campaign(&self, name: &str) -> bool {
        self.campaigns.iter().any(|c| c == name)
    }

    /// Whether both ad-platform credentials are configured.
    ///
    /// The traffic view keys its empty state on this.
    pub fn has_ad_credentials(&self) -> bool {
        self.ad_account_id.is_some() && self.access_token.is_some()
    }
}

/// Parse a raw comma-separated campaign list.
///
/// Entries are trimmed, empties dropped, and duplicates removed (first
/// occurrence wins). An empty result is substituted with the default
/// campaign so the ≥1-campaign invariant holds for every caller.
pub fn parse_campaign_list(raw: &str) -> Vec<String> {
    let mut campaigns: Vec<String> = Vec::new();
    for entry in raw.split(',') {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        if campaigns.iter().any(|c| c == trimmed) {
            continue;
        }
        campaigns.push(trimmed.to_string());
    }
    if campaigns.is_empty() {
        campaigns.push(DEFAULT_CAMPAIGN.to_string());
    }
    campaigns
}

/// The (project, campaign) pair a fetch is issued for.
///
/// Used to tag in-flight lead fetches so a stale response can be matched
/// against the selection it was requested under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub project_id: i64,
    pub campaign: String,
}

/// The persisted selection: all projects plus the active project/campaign
/// pair.
///
/// Invariant after any mutation settles: `current_project_id` names an
/// element of `projects` and `active_campaign` is one of that project's
/// campaigns. [`SelectionState::repair`] restores the invariant for state
/// loaded from an untrusted store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub projects: Vec<Project>,
    pub current_project_id: i64,
    pub active_campaign: String,
}

impl SelectionState {
    /// Seed state used when the store holds nothing usable.
    pub fn seed() -> Self {
        let project = Project {
            id: DEFAULT_PROJECT_ID,
            name: DEFAULT_PROJECT_NAME.to_string(),
            campaigns: vec![DEFAULT_CAMPAIGN.to_string()],
            ad_account_id: None,
            access_token: None,
        };
        Self {
            current_project_id: project.id,
            active_campaign: project.first_campaign().to_string(),
            projects: vec![project],
        }
    }

    /// The currently selected project.
    pub fn current_project(&self) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == self.current_project_id)
    }

    /// Look up a project by id.
    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Next free project id.
    pub fn next_project_id(&self) -> i64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Restore the selection invariants in place.
    ///
    /// - an empty project list is reseeded;
    /// - a project without campaigns gets the default campaign;
    /// - an unknown `current_project_id` falls back to the first project;
    /// - an `active_campaign` missing from the current project falls back to
    ///   that project's first campaign.
    ///
    /// Returns `true` if anything had to change.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;

        if self.projects.is_empty() {
            *self = Self::seed();
            return true;
        }

        for project in &mut self.projects {
            if project.campaigns.is_empty() {
                project.campaigns.push(DEFAULT_CAMPAIGN.to_string());
                changed = true;
            }
        }

        if self.current_project().is_none() {
            self.current_project_id = self.projects[0].id;
            changed = true;
        }

        let idx =
            self.projects.iter().position(|p| p.id == self.current_project_id).unwrap_or(0);
        let current = &self.projects[idx];
        if !current.has_campaign(&self.active_campaign) {
            self.active_campaign = current.first_campaign().to_string();
            changed = true;
        }

        changed
    }
}
