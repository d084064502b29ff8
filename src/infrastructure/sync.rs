//! Inventory sync adapters
//!
//! The external channel manager is not wired yet; `LoggingInventorySync`
//! emits the payload as a structured log record so it can be replayed.

use async_trait::async_trait;
use tracing::info;

use crate::domain::availability::{InventorySync, SyncPayload};
use crate::shared::errors::InfraError;

/// Writes every payload to the log as JSON.
pub struct LoggingInventorySync;

#[async_trait]
impl InventorySync for LoggingInventorySync {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn push(&self, payload: &SyncPayload) -> Result<(), InfraError> {
        let body = serde_json::to_string(payload)?;
        info!(
            room_id = payload.room_id,
            entries = payload.entries.len(),
            payload = %body,
            "Inventory sync payload"
        );
        Ok(())
    }
}

/// Used when sync is disabled in the configuration.
pub struct NoopInventorySync;

#[async_trait]
impl InventorySync for NoopInventorySync {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn push(&self, _payload: &SyncPayload) -> Result<(), InfraError> {
        Ok(())
    }
}
