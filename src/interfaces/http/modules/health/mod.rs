//! Liveness / database health check

mod handlers;

pub use handlers::*;
