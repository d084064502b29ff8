//! Inventory sync port
//!
//! After a reconciliation the external inventory (channel manager) is told
//! which dates opened and which closed, per rate plan.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::model::BlockRequest;
use super::reconcile::ReconcilePlan;
use crate::shared::errors::InfraError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEntry {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rate_plan_code: String,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPayload {
    pub room_id: i32,
    pub entries: Vec<SyncEntry>,
}

impl SyncPayload {
    /// Deleted ranges are reopened first, then inserted ranges are closed,
    /// so applying entries in order yields the final state.
    pub fn from_plan(request: &BlockRequest, plan: &ReconcilePlan) -> Self {
        let opened = plan.delete.iter().map(|r| (r.range, false));
        let closed = plan.insert.iter().map(|r| (*r, true));

        let entries = opened
            .chain(closed)
            .flat_map(|(range, closed)| {
                request.rate_plan_codes.iter().map(move |code| SyncEntry {
                    from: range.start(),
                    to: range.end(),
                    rate_plan_code: code.clone(),
                    closed,
                })
            })
            .collect();

        Self {
            room_id: request.room_id,
            entries,
        }
    }
}

#[async_trait]
pub trait InventorySync: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn push(&self, payload: &SyncPayload) -> Result<(), InfraError>;
}
