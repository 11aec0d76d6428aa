//! Focus timer, focus session log and settings model.
//!
//! # Responsibility
//! - Hold the active focus snapshot and its pure state transitions.
//! - Define the focus session log entry and user settings.
//!
//! # Invariants
//! - `ActiveFocus.start_time` is an absolute epoch-ms instant; remaining time
//!   is always derived as `duration - floor((now - start) / 1000)`.
//! - State is derived, never stored: see [`ActiveFocus::state`].
//! - A paused snapshot has `start_time == None` and `remaining < duration`.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = Uuid;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const SHORT_BREAK_SECS: u32 = 5 * 60;
pub const LONG_BREAK_SECS: u32 = 15 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    #[default]
    Focus,
    #[serde(rename = "Short Break")]
    ShortBreak,
    #[serde(rename = "Long Break")]
    LongBreak,
}

/// Process-wide user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Focus session length in minutes.
    pub focus_duration: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: DEFAULT_FOCUS_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub focus_duration: Option<u32>,
}

impl Settings {
    /// Canonical length in seconds for a session of `session_type`.
    pub fn duration_for(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Focus => self.focus_duration.saturating_mul(60),
            SessionType::ShortBreak => SHORT_BREAK_SECS,
            SessionType::LongBreak => LONG_BREAK_SECS,
        }
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(focus_duration) = patch.focus_duration {
            self.focus_duration = focus_duration;
        }
    }
}

/// Logged focus or break interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: SessionId,
    #[serde(with = "crate::model::float")]
    pub duration_minutes: f64,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub is_completed: bool,
    pub session_type: SessionType,
    pub task_id: Option<TaskId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSession {
    pub duration_minutes: f64,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub is_completed: bool,
    pub session_type: SessionType,
    pub task_id: Option<TaskId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub duration_minutes: Option<f64>,
    pub end_time: Option<Option<i64>>,
    pub is_completed: Option<bool>,
    pub task_id: Option<Option<TaskId>>,
    pub notes: Option<Option<String>>,
}

impl FocusSession {
    pub fn create(input: NewSession) -> Self {
        Self {
            id: Uuid::new_v4(),
            duration_minutes: input.duration_minutes,
            start_time: input.start_time,
            end_time: input.end_time,
            is_completed: input.is_completed,
            session_type: input.session_type,
            task_id: input.task_id,
            notes: input.notes,
        }
    }

    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(duration_minutes) = patch.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(task_id) = patch.task_id {
            self.task_id = task_id;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

/// Derived timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Idle,
    Running,
    Paused,
}

/// The single in-progress (or most recently paused) timed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFocus {
    pub is_active: bool,
    /// Epoch ms; effective start while running, `None` otherwise.
    pub start_time: Option<i64>,
    /// Total length in seconds.
    pub duration: u32,
    /// Epoch ms of the last pause.
    pub paused_at: Option<i64>,
    /// Seconds left as of the last pause (or `duration` when fresh).
    pub remaining: u32,
    pub session_type: SessionType,
    pub task_id: Option<TaskId>,
}

impl Default for ActiveFocus {
    fn default() -> Self {
        Self::idle(&Settings::default())
    }
}

impl ActiveFocus {
    /// Idle snapshot sized by the current focus-duration setting.
    pub fn idle(settings: &Settings) -> Self {
        let duration = settings.duration_for(SessionType::Focus);
        Self {
            is_active: false,
            start_time: None,
            duration,
            paused_at: None,
            remaining: duration,
            session_type: SessionType::Focus,
            task_id: None,
        }
    }

    /// Running snapshot starting at `now_ms`.
    pub fn running(
        session_type: SessionType,
        duration: u32,
        task_id: Option<TaskId>,
        now_ms: i64,
    ) -> Self {
        Self {
            is_active: true,
            start_time: Some(now_ms),
            duration,
            paused_at: None,
            remaining: duration,
            session_type,
            task_id,
        }
    }

    pub fn state(&self) -> FocusState {
        if self.is_active && self.start_time.is_some() {
            FocusState::Running
        } else if !self.is_active && self.remaining < self.duration {
            FocusState::Paused
        } else {
            FocusState::Idle
        }
    }

    /// Remaining budget at `now_ms`, never negative.
    pub fn remaining_at(&self, now_ms: i64) -> u32 {
        match (self.is_active, self.start_time) {
            (true, Some(start)) => {
                let left = i64::from(self.duration) - elapsed_secs(start, now_ms);
                left.max(0) as u32
            }
            _ => self.remaining,
        }
    }

    /// Whether a running session has used its whole budget at `now_ms`.
    pub fn is_finished_at(&self, now_ms: i64) -> bool {
        match (self.is_active, self.start_time) {
            (true, Some(start)) => i64::from(self.duration) - elapsed_secs(start, now_ms) <= 0,
            _ => false,
        }
    }

    /// Running -> Paused. Returns `false` (no-op) unless running.
    pub fn pause(&mut self, now_ms: i64) -> bool {
        if self.state() != FocusState::Running {
            return false;
        }
        self.remaining = self.remaining_at(now_ms);
        self.is_active = false;
        self.paused_at = Some(now_ms);
        self.start_time = None;
        true
    }

    /// Not running -> Running. Returns `false` (no-op) when already active.
    ///
    /// The effective start is shifted back by the consumed budget so elapsed
    /// accounting stays continuous across the pause.
    pub fn resume(&mut self, now_ms: i64) -> bool {
        if self.is_active {
            return false;
        }
        let consumed_secs = i64::from(self.duration) - i64::from(self.remaining);
        self.start_time = Some(now_ms - consumed_secs * 1000);
        self.is_active = true;
        self.paused_at = None;
        true
    }
}

fn elapsed_secs(start_ms: i64, now_ms: i64) -> i64 {
    (now_ms - start_ms).max(0) / 1000
}
