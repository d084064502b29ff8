use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn room_not_found(room_id: i32) -> Self {
        DomainError::NotFound {
            entity: "Room",
            field: "id",
            value: room_id.to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost,
    /// torn write) and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Internal(_))
    }
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        InfraError::Database(e).into()
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Inventory sync failed: {0}")]
    Sync(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_errors_are_transient() {
        assert!(DomainError::Internal("boom".into()).is_transient());
        assert!(!DomainError::InvalidArgument("bad".into()).is_transient());
        assert!(!DomainError::room_not_found(7).is_transient());
    }

    #[test]
    fn db_errors_become_internal() {
        let err: DomainError = sea_orm::DbErr::Custom("disk full".into()).into();
        assert!(matches!(err, DomainError::Internal(ref msg) if msg.contains("disk full")));
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let msg = DomainError::room_not_found(42).to_string();
        assert_eq!(msg, "Not found: Room with id=42");
    }
}
