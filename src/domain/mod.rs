//! Domain layer: rooms, blocked date ranges and the reconciliation rules.

pub mod availability;
pub mod repositories;
pub mod room;

pub use availability::{BlockRequest, BlockedRange, DateRange, ReconcileAction, ReconcilePlan};
pub use repositories::{DomainResult, RepositoryProvider};
pub use room::{RatePlan, Room};

pub use crate::shared::errors::DomainError;
