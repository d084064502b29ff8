//! # Room Availability
//!
//! Blocked date ranges of hotel rooms, kept pairwise disjoint per room.
//! A block or unblock request is reconciled against the stored ranges into
//! a minimal delete set and insert set, applied in one transaction.
//!
//! ## Architecture
//!
//! - **domain**: date ranges, the reconciliation planner, repository and sync ports
//! - **application**: `AvailabilityService` (locking, transactions, sync emission)
//! - **infrastructure**: SeaORM persistence, in-memory repositories, sync adapters
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: errors, retry, graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::database::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositoryProvider};

pub use application::{AvailabilityService, ReconcileOutcome, SyncMode};

pub use interfaces::http::create_api_router;
