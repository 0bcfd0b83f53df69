//! Persistence gateway contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the only data access contract for messages.
//! - Isolate SQLite query details from request handling.
//!
//! # Invariants
//! - Repository writes must enforce `validate_content` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Each operation is one scoped transaction.

pub mod message_repo;
