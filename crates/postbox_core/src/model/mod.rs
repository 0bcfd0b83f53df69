//! Domain model for persisted messages.
//!
//! # Responsibility
//! - Define the canonical record shared by storage and request handling.
//!
//! # Invariants
//! - Every stored message has a unique, storage-assigned `MessageId`.
//! - Messages are append-only: no update or delete path exists.

pub mod message;
