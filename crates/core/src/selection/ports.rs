//! Port interface for selection-state persistence
//!
//! The trait defines the boundary between the selection model and the
//! infrastructure implementation that actually stores the values.

use async_trait::async_trait;
use launchbi_domain::Result;
use serde_json::Value;

/// Synchronous-in-spirit key-value store for selection state.
///
/// Three logical keys are in use (see `launchbi_domain::constants`): the
/// project list, the active project id and the active campaign. Writes are
/// last-write-wins.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key was never written, and also when the
    /// stored content fails to deserialize: a corrupt value is reported to
    /// the caller as absent, never as an error.
    async fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Serialize `value` and write it under `key`, overwriting any previous
    /// value.
    async fn save(&self, key: &str, value: &Value) -> Result<()>;
}
