//! Availability aggregate
//!
//! Blocked date ranges of a room, the pure reconciliation planner, the
//! transactional repository port and the inventory sync port.

pub mod model;
pub mod reconcile;
pub mod repository;
pub mod sync;

pub use model::{BlockRequest, BlockedRange, DateRange};
pub use reconcile::{plan_reconciliation, ReconcileAction, ReconcilePlan};
pub use repository::{AvailabilityRepository, AvailabilityTransaction};
pub use sync::{InventorySync, SyncEntry, SyncPayload};
