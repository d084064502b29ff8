//! Infrastructure layer - external concerns

pub mod database;
pub mod memory;
pub mod sync;

pub use database::{init_database, DatabaseConfig};
pub use memory::InMemoryRepositoryProvider;
