//! Application layer: use cases over the domain ports.

pub mod availability;

pub use availability::{AvailabilityService, ReconcileOutcome, RoomLocks, SyncMode};
