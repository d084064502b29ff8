//! Room availability use cases

pub mod locks;
pub mod service;

pub use locks::RoomLocks;
pub use service::{AvailabilityService, ReconcileOutcome, SyncMode};
