//! Persistence slot abstractions and implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the store persists through.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Slots store opaque payloads; they never inspect snapshot contents.

pub mod slot_repo;
