//! Core domain logic for the Postbox message store.
//! This crate owns message validation, persistence and request handling.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::message::{validate_content, Message, MessageId, MessageValidationError};
pub use repo::message_repo::{MessageRepository, RepoError, RepoResult, SqliteMessageRepository};
pub use service::message_service::{
    CreateMessageRequest, ErrorBody, MessageResponse, MessageService, Reply, ReplyStatus,
    ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
