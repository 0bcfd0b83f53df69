//! Message repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Assign identifiers and timestamps for new messages.
//! - Provide create/list/get over canonical `messages` storage.
//!
//! # Invariants
//! - Write paths call `validate_content` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Transactions commit on success and roll back on drop for every error.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::message::{validate_content, Message, MessageId, MessageValidationError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use thiserror::Error;

const MESSAGE_TABLE: &str = "messages";
const MESSAGE_COLUMNS: [&str; 4] = ["id", "content", "created_at", "updated_at"];

const MESSAGE_SELECT_SQL: &str = "SELECT
    id,
    content,
    created_at,
    updated_at
FROM messages";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for message persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] MessageValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("message not found: {0}")]
    NotFound(MessageId),
    /// Connection schema is not at the expected migrated version.
    #[error("message repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("message repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("message repository requires column `{column}` in table `{table}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be mapped back to a valid `Message`.
    #[error("invalid persisted message data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable message storage operations.
pub trait MessageRepository {
    /// Persists `content` and returns the stored record with its new id.
    fn create_message(&self, content: &str) -> RepoResult<Message>;
    /// Returns every message in ascending id order.
    fn list_messages(&self) -> RepoResult<Vec<Message>>;
    /// Returns the message with `id`, or `RepoError::NotFound`.
    fn get_message(&self, id: MessageId) -> RepoResult<Message>;
    /// Returns the number of stored messages.
    fn count_messages(&self) -> RepoResult<u64>;
}

/// SQLite-backed message repository.
pub struct SqliteMessageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMessageRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_message_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn read_transaction(&self) -> RepoResult<Transaction<'conn>> {
        // Deferred: takes only a shared lock and never writes.
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Deferred,
        )?)
    }
}

/// Raw column values before timestamp conversion.
struct MessageRow {
    id: MessageId,
    content: String,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl MessageRepository for SqliteMessageRepository<'_> {
    fn create_message(&self, content: &str) -> RepoResult<Message> {
        validate_content(content)?;

        let stamped_at = Utc::now().timestamp_millis();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let row = tx.query_row(
            "INSERT INTO messages (content, created_at, updated_at)
             VALUES (?1, ?2, ?2)
             RETURNING id, content, created_at, updated_at;",
            params![content, stamped_at],
            read_message_row,
        )?;
        tx.commit()?;

        parse_message_row(row)
    }

    fn list_messages(&self) -> RepoResult<Vec<Message>> {
        let tx = self.read_transaction()?;
        let rows = {
            let mut stmt = tx.prepare(&format!("{MESSAGE_SELECT_SQL} ORDER BY id ASC;"))?;
            let rows = stmt
                .query_map([], read_message_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        tx.commit()?;

        rows.into_iter().map(parse_message_row).collect()
    }

    fn get_message(&self, id: MessageId) -> RepoResult<Message> {
        let tx = self.read_transaction()?;
        let row = tx
            .query_row(
                &format!("{MESSAGE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_message_row,
            )
            .optional()?;
        tx.commit()?;

        match row {
            Some(row) => parse_message_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn count_messages(&self) -> RepoResult<u64> {
        let tx = self.read_transaction()?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM messages;", [], |row| row.get(0))?;
        tx.commit()?;

        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative message count `{count}`")))
    }
}

fn read_message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get("id")?,
        content: row.get("content")?,
        created_at_ms: row.get("created_at")?,
        updated_at_ms: row.get("updated_at")?,
    })
}

fn parse_message_row(row: MessageRow) -> RepoResult<Message> {
    let message = Message {
        id: row.id,
        content: row.content,
        created_at: parse_epoch_ms(row.created_at_ms, "created_at")?,
        updated_at: parse_epoch_ms(row.updated_at_ms, "updated_at")?,
    };
    message.validate().map_err(|err| {
        RepoError::InvalidData(format!("message {} failed validation: {err}", message.id))
    })?;
    Ok(message)
}

fn parse_epoch_ms(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in messages.{column}"))
    })
}

fn ensure_message_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, MESSAGE_TABLE)? {
        return Err(RepoError::MissingRequiredTable(MESSAGE_TABLE));
    }

    for column in MESSAGE_COLUMNS {
        if !table_has_column(conn, MESSAGE_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: MESSAGE_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
