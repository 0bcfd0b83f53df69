//! Request handling services.
//!
//! # Responsibility
//! - Validate inbound request shapes before any storage access.
//! - Orchestrate repository calls and shape outbound responses.
//! - Map outcomes to transport-neutral status categories.

pub mod message_service;
