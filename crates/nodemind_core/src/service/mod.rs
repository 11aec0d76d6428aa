//! Read projections and view-facing helpers over store state.
//!
//! # Responsibility
//! - Derive agenda, analytics and canvas views without owning data.
//! - Keep view layers decoupled from the raw store collections.

pub mod agenda;
pub mod analytics;
pub mod canvas;
