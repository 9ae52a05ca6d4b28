//! Selection service - owns the project list and the active pair
//!
//! One controller owns the `SelectionState`; the presentation layer gets
//! read-only snapshots and drives mutations through the methods here. Every
//! successful mutation persists through the [`StateStore`] port before
//! returning, so the store never lags the in-memory state.

use std::sync::Arc;

use launchbi_domain::constants::{KEY_ACTIVE_CAMPAIGN, KEY_ACTIVE_PROJECT, KEY_PROJECTS};
use launchbi_domain::{
    parse_campaign_list, LaunchBiError, Project, Result, SelectionKey, SelectionState,
};
use serde_json::json;
use tracing::{debug, info, warn};

use super::ports::StateStore;

/// Controller for the persisted project/campaign selection.
pub struct SelectionService {
    store: Arc<dyn StateStore>,
    state: SelectionState,
}

impl SelectionService {
    /// Build the selection from the store, seeding defaults when the store
    /// holds nothing usable.
    ///
    /// A corrupt or partial store never fails startup: unreadable values are
    /// treated as absent and the resulting state is repaired to satisfy the
    /// selection invariants, then written back so the store settles
    /// consistent.
    pub async fn load(store: Arc<dyn StateStore>) -> Result<Self> {
        let projects: Vec<Project> = match store.load(KEY_PROJECTS).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                warn!(error = %err, "stored project list is unreadable; reseeding");
                Vec::new()
            }),
            None => Vec::new(),
        };
        let current_project_id = match store.load(KEY_ACTIVE_PROJECT).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => 0,
        };
        let active_campaign = match store.load(KEY_ACTIVE_CAMPAIGN).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => String::new(),
        };

        let mut state = SelectionState { projects, current_project_id, active_campaign };
        let repaired = state.repair();

        let service = Self { store, state };
        if repaired {
            debug!("selection state repaired on load");
            service.persist().await?;
        }
        Ok(service)
    }

    /// Read-only view of the current selection.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The (project, campaign) pair lead fetches should be issued for.
    pub fn selection_key(&self) -> SelectionKey {
        SelectionKey {
            project_id: self.state.current_project_id,
            campaign: self.state.active_campaign.clone(),
        }
    }

    /// Create a project from a display name and a raw comma-separated
    /// campaign list, select it, and persist.
    ///
    /// Returns the new project's id. An empty or whitespace-only name is a
    /// validation rejection: no state changes and the caller keeps whatever
    /// UI state it had.
    pub async fn create_project(&mut self, name: &str, campaigns_raw: &str) -> Result<i64> {
        let name = validated_name(name)?;
        let campaigns = parse_campaign_list(campaigns_raw);

        let id = self.state.next_project_id();
        let project =
            Project { id, name, campaigns, ad_account_id: None, access_token: None };
        self.state.active_campaign = project.first_campaign().to_string();
        self.state.current_project_id = id;
        self.state.projects.push(project);

        self.persist().await?;
        info!(project_id = id, "project created");
        Ok(id)
    }

    /// Rename a project and replace its campaign list, preserving its id and
    /// ad-platform credentials.
    ///
    /// If the edit drops the campaign that is currently active, the active
    /// campaign falls back to the new list's first entry so it never
    /// dangles.
    pub async fn edit_project(&mut self, id: i64, name: &str, campaigns_raw: &str) -> Result<()> {
        let name = validated_name(name)?;
        let campaigns = parse_campaign_list(campaigns_raw);

        let active = self.state.active_campaign.clone();
        let project = self
            .state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LaunchBiError::NotFound(format!("project {id} does not exist")))?;
        project.name = name;
        project.campaigns = campaigns;
        let fallback = project.first_campaign().to_string();
        let dropped_active = !project.has_campaign(&active);

        if self.state.current_project_id == id && dropped_active {
            self.state.active_campaign = fallback;
            debug!(
                campaign = %self.state.active_campaign,
                "active campaign fell back to first entry after edit"
            );
        }

        self.persist().await?;
        info!(project_id = id, "project edited");
        Ok(())
    }

    /// Store or clear the ad-platform credentials of a project.
    ///
    /// The credentials are carried for the traffic integration; this core
    /// never sends them anywhere.
    pub async fn set_ad_credentials(
        &mut self,
        id: i64,
        ad_account_id: Option<String>,
        access_token: Option<String>,
    ) -> Result<()> {
        let project = self
            .state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LaunchBiError::NotFound(format!("project {id} does not exist")))?;
        project.ad_account_id = ad_account_id.filter(|s| !s.trim().is_empty());
        project.access_token = access_token.filter(|s| !s.trim().is_empty());

        self.persist().await?;
        Ok(())
    }

    /// Switch to another project; its first campaign becomes active.
    ///
    /// An unknown id is a `NotFound` error, never a silent fallback.
    pub async fn select_project(&mut self, id: i64) -> Result<()> {
        let first_campaign = self
            .state
            .project(id)
            .map(|p| p.first_campaign().to_string())
            .ok_or_else(|| LaunchBiError::NotFound(format!("project {id} does not exist")))?;

        self.state.current_project_id = id;
        self.state.active_campaign = first_campaign;

        self.persist().await?;
        debug!(project_id = id, "project selected");
        Ok(())
    }

    /// Switch the active campaign within the current project.
    ///
    /// The name must be one of the current project's campaigns; anything
    /// else is a validation rejection with no state change.
    pub async fn select_campaign(&mut self, name: &str) -> Result<()> {
        let known = self.state.current_project().is_some_and(|p| p.has_campaign(name));
        if !known {
            return Err(LaunchBiError::Validation(format!(
                "campaign '{name}' is not part of the current project"
            )));
        }

        self.state.active_campaign = name.to_string();
        self.persist().await?;
        debug!(campaign = %name, "campaign selected");
        Ok(())
    }

    /// Write the full selection to the store (three keys, last write wins).
    async fn persist(&self) -> Result<()> {
        let projects = serde_json::to_value(&self.state.projects)
            .map_err(|err| LaunchBiError::Internal(format!("selection not serializable: {err}")))?;
        self.store.save(KEY_PROJECTS, &projects).await?;
        self.store.save(KEY_ACTIVE_PROJECT, &json!(self.state.current_project_id)).await?;
        self.store.save(KEY_ACTIVE_CAMPAIGN, &json!(self.state.active_campaign)).await?;
        Ok(())
    }
}

/// Trimmed, non-empty project name or a validation rejection.
fn validated_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LaunchBiError::Validation("project name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}
