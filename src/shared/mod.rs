//! Cross-cutting helpers: errors, retry, graceful shutdown.

pub mod errors;
pub mod retry;
pub mod shutdown;

pub use errors::{ConfigError, DomainError, InfraError};
pub use retry::{retry_with_backoff, RetryConfig};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
