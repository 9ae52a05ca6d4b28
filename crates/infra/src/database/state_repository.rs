//! SQLite-backed selection state store.
//!
//! Implements the `StateStore` trait over the `app_state` key-value table.
//! All database operations run in `spawn_blocking` to avoid blocking the
//! async runtime.

use std::sync::Arc;

use async_trait::async_trait;
use launchbi_core::StateStore;
use launchbi_domain::{LaunchBiError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tokio::task;
use tracing::warn;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite-backed key-value store for selection state.
///
/// Upsert semantics, last write wins. A stored value that no longer parses
/// as JSON is reported as absent - the dashboard reseeds rather than failing
/// startup over a corrupt row.
pub struct StateRepository {
    db: Arc<DbManager>,
}

impl StateRepository {
    /// Create a new repository with the given database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StateStore for StateRepository {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<Option<Value>> {
            let conn = db.get_connection()?;
            query_value(&conn, &key)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save(&self, key: &str, value: &Value) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        let serialized = value.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            upsert_value(&conn, &key, &serialized)
        })
        .await
        .map_err(map_join_error)?
    }
}

/* -------------------------------------------------------------------------- */
/* Synchronous SQL Operations (called inside spawn_blocking) */
/* -------------------------------------------------------------------------- */

/// Read the JSON value stored under `key`, treating unparsable content as
/// absent.
fn query_value(conn: &Connection, key: &str) -> Result<Option<Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM app_state WHERE key = ?1", params![key], |row| row.get(0))
        .optional()
        .map_err(|e| InfraError::from(e).0)?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(key, error = %err, "stored value is not valid JSON; treating as absent");
            Ok(None)
        }
    }
}

/// Write `value` under `key` (upsert, SQLite 3.24.0+).
fn upsert_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO app_state (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        params![key, value, now],
    )
    .map_err(|e| InfraError::from(e).0)?;
    Ok(())
}

/* -------------------------------------------------------------------------- */
/* Error Mapping */
/* -------------------------------------------------------------------------- */

/// Map JoinError from spawn_blocking to LaunchBiError.
fn map_join_error(err: task::JoinError) -> LaunchBiError {
    if err.is_cancelled() {
        LaunchBiError::Internal("blocking task cancelled".into())
    } else {
        LaunchBiError::Internal(format!("blocking task failed: {err}"))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn load_returns_none_for_missing_key() {
        let (repo, _mgr, _dir) = setup();

        let value = repo.load("never_written").await.expect("query succeeded");
        assert!(value.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn save_then_load_round_trips() {
        let (repo, _mgr, _dir) = setup();

        let value = json!({"projects": [1, 2, 3]});
        repo.save("launchbi.projects", &value).await.expect("save succeeded");

        let loaded = repo.load("launchbi.projects").await.expect("load succeeded");
        assert_eq!(loaded, Some(value));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn save_overwrites_previous_value() {
        let (repo, _mgr, _dir) = setup();

        repo.save("k", &json!(1)).await.expect("first write");
        repo.save("k", &json!(2)).await.expect("second write");

        let loaded = repo.load("k").await.expect("load succeeded");
        assert_eq!(loaded, Some(json!(2)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn corrupt_stored_value_is_treated_as_absent() {
        let (repo, mgr, _dir) = setup();

        let conn = mgr.get_connection().expect("connection acquired");
        conn.execute(
            "INSERT INTO app_state (key, value, updated_at) VALUES ('bad', '{not json', 0)",
            params![],
        )
        .expect("raw insert");
        drop(conn);

        let loaded = repo.load("bad").await.expect("load must not error");
        assert!(loaded.is_none());
    }

    /// Set up a test repository with a fresh database.
    fn setup() -> (StateRepository, Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("state.db");

        let mgr = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        mgr.run_migrations().expect("migrations run");

        let repo = StateRepository::new(mgr.clone());
        (repo, mgr, temp_dir)
    }
}
