//! Domain model for tasks, mind maps and focus tracking.
//!
//! # Responsibility
//! - Define canonical data structures owned by the store.
//! - Keep partial-update merge rules next to the records they touch.
//!
//! # Invariants
//! - Every entity is identified by a v4 `Uuid` generated at creation.
//! - Timestamps are Unix epoch milliseconds.

pub mod float;
pub mod focus;
pub mod mindmap;
pub mod task;
