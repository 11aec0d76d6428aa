//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-wide store and serialize access to it.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Ids cross the boundary as UUID strings; days as `YYYY-MM-DD`.
//! - The store is opened lazily on first use and reused afterwards.

use chrono::NaiveDate;
use log::warn;
use nodemind_core::{
    core_version as core_version_inner, day_of, init_logging as init_logging_inner,
    ping as ping_inner, summary, tasks_for_day as tasks_for_day_inner, FocusState, NewEdge,
    NewNode, NewTask, NodePatch, Position, Priority, SessionType, SettingsPatch, Store, Task,
    TickOutcome,
};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

const STORE_DB_FILE_NAME: &str = "nodemind.sqlite3";
const DAY_FORMAT: &str = "%Y-%m-%d";

static STORE: Mutex<Option<Store>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for command calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or affected record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<Uuid>) -> Self {
        Self {
            ok: true,
            id: id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Task row for agenda screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    /// `low|medium|high`.
    pub priority: String,
    pub date: String,
}

/// Snapshot of the focus timer as of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusStatus {
    /// `idle|running|paused`.
    pub state: String,
    /// `focus|short_break|long_break`.
    pub session_type: String,
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub task_id: Option<String>,
    /// Set when this call completed a session.
    pub completed_session_id: Option<String>,
}

/// Totals for the analytics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsResponse {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub total_focus_minutes: f64,
    pub total_focus_hours: f64,
    pub total_nodes: u32,
}

/// Creates a task. `date` is `YYYY-MM-DD`; `None` means today.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String, priority: Option<String>, date: Option<String>) -> ActionResponse {
    let priority = match priority.as_deref().map(parse_priority).transpose() {
        Ok(priority) => priority.unwrap_or_default(),
        Err(err) => return ActionResponse::failure(format!("task_add failed: {err}")),
    };
    let date = match date.as_deref().map(parse_day).transpose() {
        Ok(date) => date,
        Err(err) => return ActionResponse::failure(format!("task_add failed: {err}")),
    };
    let input = NewTask {
        title: title.trim().to_string(),
        priority,
        date,
        ..NewTask::default()
    };
    match with_store(|store| Ok(store.add_task(input))) {
        Ok(id) => ActionResponse::success("Task created.", Some(id)),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Flips completion of a task; unknown ids are accepted as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(task_id: String) -> ActionResponse {
    run_action("task_toggle", "Task toggled.", |store| {
        let id = parse_id(&task_id)?;
        store.toggle_task(id);
        Ok(Some(id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> ActionResponse {
    run_action("task_delete", "Task deleted.", |store| {
        let id = parse_id(&task_id)?;
        store.delete_task(id);
        Ok(Some(id))
    })
}

/// Tasks dated `day`, incomplete first. Empty on invalid input.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_for_day(day: String) -> Vec<TaskItem> {
    let result = with_store(|store| {
        let day = parse_day(&day)?;
        Ok(tasks_for_day_inner(store.state(), day)
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>())
    });
    result.unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call=tasks_for_day error={err}");
        Vec::new()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn map_add(title: String) -> ActionResponse {
    run_action("map_add", "Map created.", |store| {
        Ok(Some(store.add_map(title.trim())))
    })
}

/// Deletes a map with all of its nodes and edges.
#[flutter_rust_bridge::frb(sync)]
pub fn map_delete(map_id: String) -> ActionResponse {
    run_action("map_delete", "Map deleted.", |store| {
        let id = parse_id(&map_id)?;
        store.delete_map(id);
        Ok(Some(id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn node_add(map_id: String, title: String, x: f64, y: f64) -> ActionResponse {
    run_action("node_add", "Node created.", |store| {
        let map_id = parse_id(&map_id)?;
        let id = store
            .add_node(NewNode::new(map_id, title.trim(), Position::new(x, y)))
            .map_err(|err| err.to_string())?;
        Ok(Some(id))
    })
}

/// Commits a drag-end position.
#[flutter_rust_bridge::frb(sync)]
pub fn node_move(node_id: String, x: f64, y: f64) -> ActionResponse {
    run_action("node_move", "Node moved.", |store| {
        let id = parse_id(&node_id)?;
        store.update_node(
            id,
            NodePatch {
                position: Some(Position::new(x, y)),
                ..NodePatch::default()
            },
        );
        Ok(Some(id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn node_delete(node_id: String) -> ActionResponse {
    run_action("node_delete", "Node deleted.", |store| {
        let id = parse_id(&node_id)?;
        store.delete_node(id);
        Ok(Some(id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn edge_add(map_id: String, source_id: String, target_id: String) -> ActionResponse {
    run_action("edge_add", "Edge created.", |store| {
        let input = NewEdge {
            map_id: parse_id(&map_id)?,
            source: parse_id(&source_id)?,
            target: parse_id(&target_id)?,
        };
        let id = store.add_edge(input).map_err(|err| err.to_string())?;
        Ok(Some(id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn edge_delete(edge_id: String) -> ActionResponse {
    run_action("edge_delete", "Edge deleted.", |store| {
        let id = parse_id(&edge_id)?;
        store.delete_edge(id);
        Ok(Some(id))
    })
}

/// Starts a session sized by current settings.
///
/// `session_type` is `focus|short_break|long_break`.
#[flutter_rust_bridge::frb(sync)]
pub fn focus_start(session_type: String, task_id: Option<String>) -> ActionResponse {
    run_action("focus_start", "Timer started.", |store| {
        let session_type = parse_session_type(&session_type)?;
        let task_id = task_id.as_deref().map(parse_id).transpose()?;
        store.start_focus_for(session_type, task_id);
        Ok(None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn focus_pause() -> FocusStatus {
    focus_call("focus_pause", |store| {
        store.pause_focus();
        None
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn focus_resume() -> FocusStatus {
    focus_call("focus_resume", |store| {
        store.resume_focus();
        None
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn focus_stop() -> FocusStatus {
    focus_call("focus_stop", |store| {
        store.stop_focus();
        None
    })
}

/// Refreshes the timer; completes and logs the session when due.
///
/// # FFI contract
/// - Intended for a once-per-second UI ticker.
/// - `completed_session_id` is set on the one call that completes a session.
#[flutter_rust_bridge::frb(sync)]
pub fn focus_tick() -> FocusStatus {
    focus_call("focus_tick", |store| match store.tick() {
        TickOutcome::Completed(session) => Some(session.id),
        TickOutcome::Idle | TickOutcome::Paused { .. } | TickOutcome::Running { .. } => None,
    })
}

/// Sets the focus length in minutes. Zero is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_focus_duration(minutes: u32) -> ActionResponse {
    if minutes == 0 {
        return ActionResponse::failure(
            "settings_set_focus_duration failed: minutes must be positive",
        );
    }
    run_action("settings_set_focus_duration", "Settings saved.", |store| {
        store.update_settings(SettingsPatch {
            focus_duration: Some(minutes),
        });
        Ok(None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn analytics_summary() -> AnalyticsResponse {
    let result = with_store(|store| {
        let totals = summary(store.state());
        Ok(AnalyticsResponse {
            total_tasks: to_u32(totals.total_tasks),
            completed_tasks: to_u32(totals.completed_tasks),
            total_focus_minutes: totals.total_focus_minutes,
            total_focus_hours: totals.total_focus_hours,
            total_nodes: to_u32(totals.total_nodes),
        })
    });
    result.unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call=analytics_summary error={err}");
        AnalyticsResponse {
            total_tasks: 0,
            completed_tasks: 0,
            total_focus_minutes: 0.0,
            total_focus_hours: 0.0,
            total_nodes: 0,
        }
    })
}

/// Today's day string according to the store clock.
#[flutter_rust_bridge::frb(sync)]
pub fn today() -> String {
    with_store(|store| Ok(day_of(store.now_ms()).format(DAY_FORMAT).to_string()))
        .unwrap_or_default()
}

fn run_action(
    call: &str,
    message: &str,
    f: impl FnOnce(&mut Store) -> Result<Option<Uuid>, String>,
) -> ActionResponse {
    match with_store(f) {
        Ok(id) => ActionResponse::success(message, id),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call={call} error={err}");
            ActionResponse::failure(format!("{call} failed: {err}"))
        }
    }
}

fn focus_call(call: &str, f: impl FnOnce(&mut Store) -> Option<Uuid>) -> FocusStatus {
    let result = with_store(|store| {
        let completed = f(store);
        Ok(to_focus_status(store, completed))
    });
    result.unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call={call} error={err}");
        FocusStatus {
            state: "idle".to_string(),
            session_type: "focus".to_string(),
            remaining_secs: 0,
            duration_secs: 0,
            task_id: None,
            completed_session_id: None,
        }
    })
}

/// Runs `f` against the process store, opening it on first use.
fn with_store<T>(f: impl FnOnce(&mut Store) -> Result<T, String>) -> Result<T, String> {
    let mut guard = STORE.lock().unwrap_or_else(PoisonError::into_inner);
    if guard.is_none() {
        let path = resolve_store_db_path();
        let store =
            Store::open_sqlite(&path).map_err(|err| format!("store open failed: {err}"))?;
        *guard = Some(store);
    }
    match guard.as_mut() {
        Some(store) => f(store),
        None => Err("store unavailable".to_string()),
    }
}

fn resolve_store_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var("NODEMIND_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(STORE_DB_FILE_NAME)
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid id `{raw}`: {err}"))
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DAY_FORMAT)
        .map_err(|err| format!("invalid day `{raw}`: {err}"))
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(format!("unsupported priority `{other}`")),
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn parse_session_type(raw: &str) -> Result<SessionType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "focus" => Ok(SessionType::Focus),
        "short_break" => Ok(SessionType::ShortBreak),
        "long_break" => Ok(SessionType::LongBreak),
        other => Err(format!("unsupported session type `{other}`")),
    }
}

fn session_type_label(session_type: SessionType) -> &'static str {
    match session_type {
        SessionType::Focus => "focus",
        SessionType::ShortBreak => "short_break",
        SessionType::LongBreak => "long_break",
    }
}

fn focus_state_label(state: FocusState) -> &'static str {
    match state {
        FocusState::Idle => "idle",
        FocusState::Running => "running",
        FocusState::Paused => "paused",
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        is_completed: task.is_completed,
        priority: priority_label(task.priority).to_string(),
        date: task.date.format(DAY_FORMAT).to_string(),
    }
}

fn to_focus_status(store: &Store, completed: Option<Uuid>) -> FocusStatus {
    let focus = store.active_focus();
    FocusStatus {
        state: focus_state_label(store.focus_state()).to_string(),
        session_type: session_type_label(focus.session_type).to_string(),
        remaining_secs: store.remaining_secs(),
        duration_secs: focus.duration,
        task_id: focus.task_id.map(|id| id.to_string()),
        completed_session_id: completed.map(|id| id.to_string()),
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        analytics_summary, core_version, edge_add, focus_start, focus_stop, focus_tick,
        init_logging, map_add, map_delete, node_add, node_delete, node_move, ping,
        settings_set_focus_duration, task_add, task_delete, task_toggle, tasks_for_day, today,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn task_add_then_listed_for_its_day() {
        let day = "2031-03-14".to_string();
        let created = task_add(
            "ffi task".to_string(),
            Some("HIGH".to_string()),
            Some(day.clone()),
        );
        assert!(created.ok, "{}", created.message);
        let id = created.id.clone().expect("task_add should return id");

        let listed = tasks_for_day(day.clone());
        let item = listed
            .iter()
            .find(|item| item.id == id)
            .expect("created task should be listed");
        assert_eq!(item.priority, "high");
        assert_eq!(item.date, day);

        assert!(task_toggle(id.clone()).ok);
        let listed = tasks_for_day(day.clone());
        assert!(listed.iter().any(|item| item.id == id && item.is_completed));

        assert!(task_delete(id.clone()).ok);
        assert!(!tasks_for_day(day).iter().any(|item| item.id == id));
    }

    #[test]
    fn task_add_rejects_bad_inputs() {
        let bad_priority = task_add("x".to_string(), Some("urgent".to_string()), None);
        assert!(!bad_priority.ok);
        assert!(bad_priority.message.contains("priority"));

        let bad_day = task_add("x".to_string(), None, Some("14/03/2031".to_string()));
        assert!(!bad_day.ok);
        assert!(tasks_for_day("not a day".to_string()).is_empty());
    }

    #[test]
    fn invalid_ids_are_reported_not_panicked() {
        let response = task_toggle("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid id"));
    }

    #[test]
    fn map_graph_round_trip_through_ffi() {
        let map = map_add("ffi map".to_string());
        assert!(map.ok, "{}", map.message);
        let map_id = map.id.expect("map id");

        let first = node_add(map_id.clone(), "a".to_string(), 0.0, 0.0);
        let second = node_add(map_id.clone(), "b".to_string(), 0.0, 100.0);
        let (first_id, second_id) = (first.id.expect("node id"), second.id.expect("node id"));

        let edge = edge_add(map_id.clone(), first_id.clone(), second_id.clone());
        assert!(edge.ok, "{}", edge.message);
        assert!(node_move(first_id.clone(), 5.0, 6.0).ok);
        assert!(node_delete(first_id).ok);

        let orphan = node_add(
            "00000000-0000-0000-0000-000000000000".to_string(),
            "orphan".to_string(),
            0.0,
            0.0,
        );
        assert!(!orphan.ok);

        assert!(map_delete(map_id).ok);
    }

    #[test]
    fn focus_flow_through_ffi() {
        assert!(!settings_set_focus_duration(0).ok);

        let started = focus_start("short_break".to_string(), None);
        assert!(started.ok, "{}", started.message);
        let status = focus_tick();
        assert_eq!(status.state, "running");
        assert_eq!(status.session_type, "short_break");
        assert_eq!(status.duration_secs, 300);

        let stopped = focus_stop();
        assert_eq!(stopped.state, "idle");
        assert_eq!(stopped.completed_session_id, None);

        assert!(!focus_start("nap".to_string(), None).ok);
    }

    #[test]
    fn analytics_and_today_are_available() {
        assert!(task_add("counted".to_string(), None, None).ok);
        assert!(analytics_summary().total_tasks >= 1);
        assert_eq!(today().len(), 10);
    }
}
