//! Message domain model.
//!
//! # Responsibility
//! - Define the persisted message record and its field semantics.
//! - Provide content validation shared by the request and storage layers.
//!
//! # Invariants
//! - `content` is never empty or whitespace-only.
//! - `id` is assigned by storage and is always positive.
//! - `updated_at` is stamped together with `created_at` and never earlier.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage-assigned message identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MessageId = i64;

/// Validation failure for message content or loaded message state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageValidationError {
    /// Content is missing, empty, or whitespace-only.
    #[error("content cannot be empty")]
    BlankContent,
    /// Identifier is zero or negative.
    #[error("message id must be positive, got {0}")]
    NonPositiveId(MessageId),
    /// Update stamp precedes creation stamp.
    #[error("updated_at ({updated_at}) must be >= created_at ({created_at})")]
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

/// Durable message record.
///
/// Plain holder; wire shapes live in the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    /// Text exactly as submitted.
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Reserved for mutation tracking; equals `created_at` today.
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Checks the record invariants for a message read back from storage.
    pub fn validate(&self) -> Result<(), MessageValidationError> {
        if self.id <= 0 {
            return Err(MessageValidationError::NonPositiveId(self.id));
        }
        validate_content(&self.content)?;
        if self.updated_at < self.created_at {
            return Err(MessageValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// Rejects empty and whitespace-only content.
pub fn validate_content(content: &str) -> Result<(), MessageValidationError> {
    if content.trim().is_empty() {
        return Err(MessageValidationError::BlankContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_content, Message, MessageValidationError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn validate_content_rejects_blank_values() {
        for value in ["", " ", "\t\n", "\u{3000}"] {
            assert_eq!(
                validate_content(value),
                Err(MessageValidationError::BlankContent),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn validate_content_accepts_padded_text() {
        assert!(validate_content("  hello  ").is_ok());
    }

    #[test]
    fn validate_rejects_reversed_timestamps() {
        let created_at = Utc.timestamp_millis_opt(2_000).unwrap();
        let updated_at = Utc.timestamp_millis_opt(1_000).unwrap();
        let message = Message {
            id: 1,
            content: "hello".to_string(),
            created_at,
            updated_at,
        };

        assert_eq!(
            message.validate(),
            Err(MessageValidationError::UpdatedBeforeCreated {
                created_at,
                updated_at,
            })
        );
    }

    #[test]
    fn validate_rejects_non_positive_id() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let message = Message {
            id: 0,
            content: "hello".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(
            message.validate(),
            Err(MessageValidationError::NonPositiveId(0))
        );
    }
}
