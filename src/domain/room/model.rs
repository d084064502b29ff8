//! Room domain entity

use chrono::{DateTime, Utc};

/// A rentable unit whose availability is tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// A room that has not been persisted yet (`id` is assigned on insert).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Sellable price plan of a room. Only `code` matters for availability:
/// it keys the entries of the inventory sync payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatePlan {
    pub id: i32,
    pub room_id: i32,
    pub code: String,
    pub name: String,
}

impl RatePlan {
    pub fn new(room_id: i32, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            room_id,
            code: code.into(),
            name: name.into(),
        }
    }
}
