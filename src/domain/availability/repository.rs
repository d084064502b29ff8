//! Availability repository interface
//!
//! Range mutations only happen through an [`AvailabilityTransaction`]:
//! dropping one without `commit` discards its changes.

use async_trait::async_trait;

use super::model::{BlockedRange, DateRange};
use crate::domain::DomainResult;

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Open a transactional scope for one reconciliation
    async fn begin(&self) -> DomainResult<Box<dyn AvailabilityTransaction>>;

    /// All blocked ranges of a room, sorted by start date
    async fn find_for_room(&self, room_id: i32) -> DomainResult<Vec<BlockedRange>>;
}

#[async_trait]
pub trait AvailabilityTransaction: Send {
    /// Ranges of `room_id` with `start <= range.end AND end >= range.start`
    async fn find_overlapping(
        &mut self,
        room_id: i32,
        range: DateRange,
    ) -> DomainResult<Vec<BlockedRange>>;

    async fn delete_ranges(&mut self, ids: &[i32]) -> DomainResult<()>;

    /// Insert new ranges for a room, returning the stored rows
    async fn insert_ranges(
        &mut self,
        room_id: i32,
        ranges: &[DateRange],
    ) -> DomainResult<Vec<BlockedRange>>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}
