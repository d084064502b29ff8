//! Room repository interface

use async_trait::async_trait;

use super::model::{RatePlan, Room};
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert a room, returning it with its assigned ID
    async fn create(&self, room: Room) -> DomainResult<Room>;

    /// Find room by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Attach a rate plan to a room, returning it with its assigned ID
    async fn add_rate_plan(&self, rate_plan: RatePlan) -> DomainResult<RatePlan>;

    /// Rate-plan codes of a room, sorted
    async fn rate_plan_codes(&self, room_id: i32) -> DomainResult<Vec<String>>;
}
