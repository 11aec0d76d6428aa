//! Core domain logic for NodeMind: tasks, mind maps and focus tracking.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{day_of, Clock, ManualClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LogLevel};
pub use model::focus::{
    ActiveFocus, FocusSession, FocusState, NewSession, SessionId, SessionPatch, SessionType,
    Settings, SettingsPatch,
};
pub use model::mindmap::{
    Edge, EdgeId, EdgePatch, MapId, MapPatch, MindMap, NewEdge, NewNode, Node, NodeId, NodePatch,
    Position, Viewport,
};
pub use model::task::{NewTask, Priority, RepeatType, Task, TaskId, TaskPatch};
pub use repo::slot_repo::{MemorySlot, SlotError, SlotResult, SnapshotSlot, SqliteSlotRepository};
pub use service::agenda::{day_progress, focus_candidates, tasks_for_day, DayProgress};
pub use service::analytics::{daily_stats, summary, weekly_stats, AnalyticsSummary, DailyStats};
pub use service::canvas::{
    apply_canvas_event, canvas_view, CanvasEdge, CanvasEvent, CanvasNode, CanvasOutcome,
    CanvasView,
};
pub use store::observer::{ChangeSet, Interest, Slice, SubscriptionId};
pub use store::snapshot::{AppState, SnapshotError, SNAPSHOT_VERSION};
pub use store::{
    Store, StoreError, StoreOptions, StoreResult, TickOutcome, DEFAULT_SLOT_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
