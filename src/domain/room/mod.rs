//! Room aggregate
//!
//! Rooms and their rate plans are only looked up here: the reconciler
//! needs to know that a room exists and which rate-plan codes it sells.

pub mod model;
pub mod repository;

pub use model::{RatePlan, Room};
pub use repository::RoomRepository;
