//! Room availability service
//!
//! Owns the block/unblock use cases: request validation, room lookup,
//! per-room locking, the reconciliation transaction and inventory sync.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::locks::RoomLocks;
use crate::domain::availability::{
    plan_reconciliation, AvailabilityTransaction, BlockRequest, BlockedRange, DateRange,
    InventorySync, ReconcileAction, ReconcilePlan, SyncPayload,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// How inventory sync failures affect the local write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Push after commit; a failed push is logged and ignored.
    #[default]
    BestEffort,
    /// Push before commit; a failed push rolls the reconciliation back.
    Strict,
}

/// Result of one reconciliation.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub room_id: i32,
    pub action: ReconcileAction,
    pub requested: DateRange,
    /// Rows removed (fully or to be replaced by residual fragments)
    pub deleted: Vec<BlockedRange>,
    /// Rows created
    pub inserted: Vec<BlockedRange>,
    /// Whether the inventory collaborator accepted the payload
    pub synced: bool,
}

impl ReconcileOutcome {
    fn unchanged(room_id: i32, action: ReconcileAction, requested: DateRange) -> Self {
        Self {
            room_id,
            action,
            requested,
            deleted: Vec::new(),
            inserted: Vec::new(),
            synced: false,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.inserted.is_empty()
    }
}

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    sync: Arc<dyn InventorySync>,
    sync_mode: SyncMode,
    locks: RoomLocks,
}

impl AvailabilityService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        sync: Arc<dyn InventorySync>,
        sync_mode: SyncMode,
    ) -> Self {
        Self {
            repos,
            sync,
            sync_mode,
            locks: RoomLocks::new(),
        }
    }

    /// Block `[start, end]` for a room, reconciling against stored ranges.
    pub async fn reconcile_block(
        &self,
        room_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<ReconcileOutcome> {
        self.reconcile(ReconcileAction::Block, room_id, start, end)
            .await
    }

    /// Release `[start, end]` for a room, keeping blocked days outside it.
    pub async fn reconcile_unblock(
        &self,
        room_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<ReconcileOutcome> {
        self.reconcile(ReconcileAction::Unblock, room_id, start, end)
            .await
    }

    /// All blocked ranges of a room, sorted by start date
    pub async fn blocked_ranges(&self, room_id: i32) -> DomainResult<Vec<BlockedRange>> {
        if self.repos.rooms().find_by_id(room_id).await?.is_none() {
            return Err(DomainError::room_not_found(room_id));
        }
        self.repos.availability().find_for_room(room_id).await
    }

    async fn reconcile(
        &self,
        action: ReconcileAction,
        room_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<ReconcileOutcome> {
        let started = Instant::now();
        let result = self.run(action, room_id, start, end).await;

        let outcome = match &result {
            Ok(o) if o.is_noop() => "noop",
            Ok(_) => "ok",
            Err(DomainError::InvalidArgument(_)) => "invalid_argument",
            Err(DomainError::NotFound { .. }) => "not_found",
            Err(DomainError::Internal(_)) => "internal",
        };
        metrics::counter!(
            "availability_reconciliations_total",
            "action" => action.as_str(),
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!(
            "availability_reconciliation_duration_seconds",
            "action" => action.as_str()
        )
        .record(started.elapsed().as_secs_f64());

        result
    }

    async fn run(
        &self,
        action: ReconcileAction,
        room_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<ReconcileOutcome> {
        let requested = DateRange::new(start, end)?;
        let request = self.load_request(room_id, requested).await?;

        let _guard = self.locks.acquire(room_id).await;
        let mut txn = self.repos.availability().begin().await?;

        let overlapping = txn.find_overlapping(room_id, requested).await?;
        let plan = plan_reconciliation(action, requested, &overlapping);
        debug!(
            room_id,
            %action,
            %requested,
            overlapping = overlapping.len(),
            delete = plan.delete.len(),
            insert = plan.insert.len(),
            "Planned reconciliation"
        );

        if plan.is_noop() {
            txn.rollback().await?;
            info!(room_id, %action, %requested, "Availability already up to date");
            return Ok(ReconcileOutcome::unchanged(room_id, action, requested));
        }

        let applied = apply_plan(txn.as_mut(), room_id, &plan).await;
        let inserted = match applied {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!(room_id, %action, %requested, error = %e, "Reconciliation write failed");
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(room_id, error = %rollback_err, "Rollback failed");
                }
                return Err(into_internal(e));
            }
        };

        let payload = SyncPayload::from_plan(&request, &plan);
        let synced = match self.sync_mode {
            SyncMode::Strict => {
                if let Err(e) = self.sync.push(&payload).await {
                    warn!(
                        room_id,
                        sync = self.sync.name(),
                        error = %e,
                        "Inventory sync failed, rolling back"
                    );
                    if let Err(rollback_err) = txn.rollback().await {
                        warn!(room_id, error = %rollback_err, "Rollback failed");
                    }
                    return Err(DomainError::Internal(e.to_string()));
                }
                txn.commit().await.map_err(into_internal)?;
                true
            }
            SyncMode::BestEffort => {
                txn.commit().await.map_err(into_internal)?;
                match self.sync.push(&payload).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(
                            room_id,
                            sync = self.sync.name(),
                            error = %e,
                            "Inventory sync failed, local change kept"
                        );
                        false
                    }
                }
            }
        };

        info!(
            room_id,
            %action,
            %requested,
            deleted = plan.delete.len(),
            inserted = inserted.len(),
            synced,
            "Availability reconciled"
        );

        Ok(ReconcileOutcome {
            room_id,
            action,
            requested,
            deleted: plan.delete,
            inserted,
            synced,
        })
    }

    async fn load_request(&self, room_id: i32, range: DateRange) -> DomainResult<BlockRequest> {
        if self.repos.rooms().find_by_id(room_id).await?.is_none() {
            return Err(DomainError::room_not_found(room_id));
        }

        let rate_plan_codes = self.repos.rooms().rate_plan_codes(room_id).await?;
        if rate_plan_codes.is_empty() {
            return Err(DomainError::NotFound {
                entity: "RatePlan",
                field: "room_id",
                value: room_id.to_string(),
            });
        }

        Ok(BlockRequest {
            room_id,
            range,
            rate_plan_codes,
        })
    }
}

async fn apply_plan(
    txn: &mut dyn AvailabilityTransaction,
    room_id: i32,
    plan: &ReconcilePlan,
) -> DomainResult<Vec<BlockedRange>> {
    txn.delete_ranges(&plan.deleted_ids()).await?;
    txn.insert_ranges(room_id, &plan.insert).await
}

fn into_internal(e: DomainError) -> DomainError {
    match e {
        DomainError::Internal(_) => e,
        other => DomainError::Internal(other.to_string()),
    }
}

// ── Tests ──────────────────────────────────────────────────────
