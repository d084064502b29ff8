//! Room availability endpoints (block / unblock / list)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
