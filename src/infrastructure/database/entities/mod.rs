//! Database entities module

pub mod blocked_range;
pub mod rate_plan;
pub mod room;

pub use blocked_range::Entity as BlockedRange;
pub use rate_plan::Entity as RatePlan;
pub use room::Entity as Room;
