//! Selection state round-trip through the real SQLite store.

use std::sync::Arc;

use launchbi_core::{SelectionService, StateStore};
use launchbi_infra::{DbManager, StateRepository};
use tempfile::TempDir;

fn store(dir: &TempDir) -> Arc<dyn StateStore> {
    let mgr =
        Arc::new(DbManager::new(dir.path().join("state.db"), 4).expect("db manager created"));
    mgr.run_migrations().expect("migrations run");
    Arc::new(StateRepository::new(mgr))
}

#[tokio::test(flavor = "multi_thread")]
async fn selection_survives_a_restart() {
    let dir = TempDir::new().expect("temp dir created");

    // first "process": mutate the selection
    let saved = {
        let mut service = SelectionService::load(store(&dir)).await.expect("first load");
        let id = service.create_project("Lançamento 03", "captacao, remarketing")
            .await
            .expect("project created");
        service.select_campaign("remarketing").await.expect("campaign selected");
        assert_eq!(service.state().current_project_id, id);
        service.state().clone()
    };

    // second "process": a fresh service over the same database file
    let reloaded = SelectionService::load(store(&dir)).await.expect("second load");
    assert_eq!(reloaded.state(), &saved);
    assert_eq!(reloaded.state().active_campaign, "remarketing");
}

#[tokio::test(flavor = "multi_thread")]
async fn ad_credentials_survive_a_restart() {
    let dir = TempDir::new().expect("temp dir created");

    let id = {
        let mut service = SelectionService::load(store(&dir)).await.expect("first load");
        let id = service.create_project("Traffic", "ads").await.expect("project created");
        service
            .set_ad_credentials(id, Some("act_8841".into()), Some("EAAB...".into()))
            .await
            .expect("credentials stored");
        id
    };

    let reloaded = SelectionService::load(store(&dir)).await.expect("second load");
    let project = reloaded.state().project(id).expect("project exists");
    assert!(project.has_ad_credentials());
    assert_eq!(project.ad_account_id.as_deref(), Some("act_8841"));
}

#[tokio::test(flavor = "multi_thread")]
async fn fresh_database_seeds_a_default_selection() {
    let dir = TempDir::new().expect("temp dir created");

    let service = SelectionService::load(store(&dir)).await.expect("load");
    let state = service.state();
    assert_eq!(state.projects.len(), 1);
    assert!(state.current_project().is_some());
    assert!(state.current_project().expect("present").has_campaign(&state.active_campaign));

    // the seed is persisted, so a second load sees identical state
    let again = SelectionService::load(store(&dir)).await.expect("reload");
    assert_eq!(again.state(), state);
}
