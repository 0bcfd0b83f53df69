//! Message request handler.
//!
//! # Responsibility
//! - Provide create/list/get entry points for transport layers.
//! - Convert between the persisted `Message` and request/response shapes.
//!
//! # Invariants
//! - Create validates content before touching storage.
//! - Not-found is reported distinctly from storage failures.
//! - Service layer remains storage-agnostic.

use crate::model::message::{validate_content, Message, MessageId, MessageValidationError};
use crate::repo::message_repo::{MessageRepository, RepoError};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Inbound payload for message creation.
///
/// `content` is optional on the wire so a missing field surfaces as a
/// validation failure instead of a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

impl CreateMessageRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}

/// Outbound message representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: MessageId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            content: message.content,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

/// Success category of a handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    /// A new resource was stored.
    Created,
    /// Plain successful read.
    Ok,
}

impl ReplyStatus {
    /// HTTP-style status code for this outcome.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Created => 201,
            Self::Ok => 200,
        }
    }
}

/// Successful handler result paired with its outcome category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub status: ReplyStatus,
    pub body: T,
}

impl<T> Reply<T> {
    fn created(body: T) -> Self {
        Self {
            status: ReplyStatus::Created,
            body,
        }
    }

    fn ok(body: T) -> Self {
        Self {
            status: ReplyStatus::Ok,
            body,
        }
    }
}

/// Failure category of a handled request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Inbound payload violates a precondition; nothing was stored.
    #[error(transparent)]
    Validation(MessageValidationError),
    #[error("message not found with id: {0}")]
    NotFound(MessageId),
    /// Opaque storage failure.
    #[error("storage failure: {0}")]
    Storage(RepoError),
}

impl ServiceError {
    /// HTTP-style status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failure",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "internal_error",
        }
    }

    /// Wire payload for this failure.
    ///
    /// Storage details stay in the logs; callers only see a generic message.
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            Self::Storage(_) => "internal storage error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            error: self.code().to_string(),
            message,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

/// Outbound failure representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Request handler for message use-cases.
pub struct MessageService<R: MessageRepository> {
    repo: R,
}

impl<R: MessageRepository> MessageService<R> {
    /// Creates a handler over the provided repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new message.
    ///
    /// # Contract
    /// - Missing or blank content fails with `ServiceError::Validation` and
    ///   performs no storage access.
    /// - Success carries `ReplyStatus::Created`.
    pub fn create_message(
        &self,
        request: &CreateMessageRequest,
    ) -> ServiceResult<Reply<MessageResponse>> {
        let content = request.content.as_deref().unwrap_or_default();
        if let Err(err) = validate_content(content) {
            warn!("event=message_create module=service status=rejected reason=blank_content");
            return Err(ServiceError::Validation(err));
        }

        info!(
            "event=message_create module=service status=start content_len={}",
            content.len()
        );
        let message = self
            .repo
            .create_message(content)
            .map_err(|err| log_failure("message_create", err))?;
        info!(
            "event=message_create module=service status=ok id={}",
            message.id
        );

        Ok(Reply::created(message.into()))
    }

    /// Lists every stored message in insertion order.
    ///
    /// An empty store yields an empty list, never an error.
    pub fn list_messages(&self) -> ServiceResult<Reply<Vec<MessageResponse>>> {
        info!("event=message_list module=service status=start");
        let messages = self
            .repo
            .list_messages()
            .map_err(|err| log_failure("message_list", err))?;
        info!(
            "event=message_list module=service status=ok count={}",
            messages.len()
        );

        Ok(Reply::ok(
            messages.into_iter().map(MessageResponse::from).collect(),
        ))
    }

    /// Fetches one message by id.
    ///
    /// Unknown ids fail with `ServiceError::NotFound`.
    pub fn get_message(&self, id: MessageId) -> ServiceResult<Reply<MessageResponse>> {
        info!("event=message_get module=service status=start id={id}");
        let message = self
            .repo
            .get_message(id)
            .map_err(|err| log_failure("message_get", err))?;
        info!("event=message_get module=service status=ok id={id}");

        Ok(Reply::ok(message.into()))
    }
}

fn log_failure(event: &str, err: RepoError) -> ServiceError {
    let err = ServiceError::from(err);
    match &err {
        ServiceError::NotFound(id) => {
            info!("event={event} module=service status=not_found id={id}");
        }
        ServiceError::Validation(_) => {
            warn!("event={event} module=service status=rejected error={err}");
        }
        ServiceError::Storage(inner) => {
            error!(
                "event={event} module=service status=error error_code={} error={inner}",
                err.code()
            );
        }
    }
    err
}

#[cfg(test)]
mod tests {
    use super::{CreateMessageRequest, MessageService, ReplyStatus, ServiceError};
    use crate::db::DbError;
    use crate::model::message::{Message, MessageId};
    use crate::repo::message_repo::{MessageRepository, RepoError, RepoResult};
    use chrono::{TimeZone, Utc};
    use std::cell::{Cell, RefCell};

    /// In-memory repository double that records storage access.
    #[derive(Default)]
    struct RecordingRepo {
        messages: RefCell<Vec<Message>>,
        calls: Cell<usize>,
        fail_with_storage_error: bool,
    }

    impl MessageRepository for RecordingRepo {
        fn create_message(&self, content: &str) -> RepoResult<Message> {
            self.calls.set(self.calls.get() + 1);
            if self.fail_with_storage_error {
                return Err(RepoError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery)));
            }
            let mut messages = self.messages.borrow_mut();
            let stamped_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
            let message = Message {
                id: messages.len() as MessageId + 1,
                content: content.to_string(),
                created_at: stamped_at,
                updated_at: stamped_at,
            };
            messages.push(message.clone());
            Ok(message)
        }

        fn list_messages(&self) -> RepoResult<Vec<Message>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.messages.borrow().clone())
        }

        fn get_message(&self, id: MessageId) -> RepoResult<Message> {
            self.calls.set(self.calls.get() + 1);
            self.messages
                .borrow()
                .iter()
                .find(|message| message.id == id)
                .cloned()
                .ok_or(RepoError::NotFound(id))
        }

        fn count_messages(&self) -> RepoResult<u64> {
            Ok(self.messages.borrow().len() as u64)
        }
    }

    #[test]
    fn blank_content_is_rejected_before_storage_access() {
        let service = MessageService::new(RecordingRepo::default());

        for request in [
            CreateMessageRequest::default(),
            CreateMessageRequest::new(""),
            CreateMessageRequest::new("   "),
        ] {
            let err = service.create_message(&request).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
            assert_eq!(err.status_code(), 400);
        }

        assert_eq!(service.repo.calls.get(), 0);
    }

    #[test]
    fn create_reports_created_status() {
        let service = MessageService::new(RecordingRepo::default());

        let reply = service
            .create_message(&CreateMessageRequest::new("hello"))
            .unwrap();
        assert_eq!(reply.status, ReplyStatus::Created);
        assert_eq!(reply.status.status_code(), 201);
        assert_eq!(reply.body.id, 1);
        assert_eq!(reply.body.content, "hello");
        assert_eq!(reply.body.created_at, reply.body.updated_at);
    }

    #[test]
    fn storage_failure_is_opaque_to_callers() {
        let repo = RecordingRepo {
            fail_with_storage_error: true,
            ..RecordingRepo::default()
        };
        let service = MessageService::new(repo);

        let err = service
            .create_message(&CreateMessageRequest::new("hello"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(err.status_code(), 500);

        let body = err.to_body();
        assert_eq!(body.error, "internal_error");
        assert_eq!(body.message, "internal storage error");
    }

    #[test]
    fn missing_id_maps_to_not_found() {
        let service = MessageService::new(RecordingRepo::default());

        let err = service.get_message(99).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(99)));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_body().message, "message not found with id: 99");
    }
}
