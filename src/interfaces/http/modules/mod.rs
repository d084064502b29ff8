pub mod availability;
pub mod health;
pub mod metrics;
pub mod request_id;
