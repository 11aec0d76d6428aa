//! Focus timer transitions, focus session log and settings operations.
//!
//! The timer stores an absolute start instant, so remaining time is always
//! recoverable from `now - start` after suspension or reload. `tick` exists
//! only to refresh a display and to detect completion; it is never the
//! source of truth.

use super::observer::{ChangeSet, Slice};
use super::Store;
use crate::model::focus::{
    ActiveFocus, FocusSession, FocusState, NewSession, SessionId, SessionPatch, SessionType,
    Settings, SettingsPatch,
};
use crate::model::task::TaskId;
use log::{debug, info};

/// Result of one periodic timer tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Idle,
    Paused { remaining: u32 },
    Running { remaining: u32 },
    /// The running session used its whole budget; the timer is back to Idle
    /// and this session was appended to the log.
    Completed(FocusSession),
}

impl Store {
    pub fn sessions(&self) -> &[FocusSession] {
        &self.state.sessions
    }

    /// Appends one entry to the session log and returns its id.
    pub fn add_session(&mut self, input: NewSession) -> SessionId {
        let session = FocusSession::create(input);
        let id = session.id;
        self.state.sessions.push(session);
        debug!("event=session_add module=store status=ok session_id={id}");
        self.commit(ChangeSet::of(Slice::Sessions));
        id
    }

    pub fn update_session(&mut self, id: SessionId, patch: SessionPatch) {
        let Some(session) = self.state.sessions.iter_mut().find(|s| s.id == id) else {
            debug!("event=session_update module=store status=noop reason=not_found session_id={id}");
            return;
        };
        session.apply(patch);
        debug!("event=session_update module=store status=ok session_id={id}");
        self.commit(ChangeSet::of(Slice::Sessions));
    }

    pub fn delete_session(&mut self, id: SessionId) {
        let before = self.state.sessions.len();
        self.state.sessions.retain(|session| session.id != id);
        if self.state.sessions.len() == before {
            debug!("event=session_delete module=store status=noop reason=not_found session_id={id}");
            return;
        }
        debug!("event=session_delete module=store status=ok session_id={id}");
        self.commit(ChangeSet::of(Slice::Sessions));
    }

    pub fn settings(&self) -> Settings {
        self.state.settings
    }

    /// Merges settings. An Idle timer is resized to the new focus length;
    /// a running or paused session keeps its own duration.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.state.settings.apply(patch);
        let mut changes = ChangeSet::of(Slice::Settings);
        if self.focus_state() == FocusState::Idle {
            self.reset_focus();
            changes.insert(Slice::ActiveFocus);
        }
        debug!(
            "event=settings_update module=store status=ok focus_duration={} idle_resized={}",
            self.state.settings.focus_duration,
            changes.contains(Slice::ActiveFocus)
        );
        self.commit(changes);
    }

    pub fn active_focus(&self) -> &ActiveFocus {
        &self.state.active_focus
    }

    pub fn focus_state(&self) -> FocusState {
        self.state.active_focus.state()
    }

    /// Seconds left on the timer right now.
    pub fn remaining_secs(&self) -> u32 {
        self.state.active_focus.remaining_at(self.clock.now_ms())
    }

    /// Starts a session of `duration_secs`, replacing whatever was set up.
    pub fn start_focus(
        &mut self,
        session_type: SessionType,
        duration_secs: u32,
        task_id: Option<TaskId>,
    ) {
        let now_ms = self.clock.now_ms();
        self.state.active_focus = ActiveFocus::running(session_type, duration_secs, task_id, now_ms);
        info!(
            "event=focus_start module=store status=ok session_type={:?} duration_s={} has_task={}",
            session_type,
            duration_secs,
            task_id.is_some()
        );
        self.commit(ChangeSet::of(Slice::ActiveFocus));
    }

    /// Starts a session sized by the current settings for `session_type`.
    pub fn start_focus_for(&mut self, session_type: SessionType, task_id: Option<TaskId>) {
        let duration_secs = self.state.settings.duration_for(session_type);
        self.start_focus(session_type, duration_secs, task_id);
    }

    /// Running -> Paused; a no-op in any other state.
    pub fn pause_focus(&mut self) {
        let now_ms = self.clock.now_ms();
        if !self.state.active_focus.pause(now_ms) {
            debug!("event=focus_pause module=store status=noop reason=not_running");
            return;
        }
        info!(
            "event=focus_pause module=store status=ok remaining_s={}",
            self.state.active_focus.remaining
        );
        self.commit(ChangeSet::of(Slice::ActiveFocus));
    }

    /// Resumes the stored session; a no-op when already running.
    pub fn resume_focus(&mut self) {
        let now_ms = self.clock.now_ms();
        if !self.state.active_focus.resume(now_ms) {
            debug!("event=focus_resume module=store status=noop reason=already_running");
            return;
        }
        info!(
            "event=focus_resume module=store status=ok remaining_s={}",
            self.state.active_focus.remaining
        );
        self.commit(ChangeSet::of(Slice::ActiveFocus));
    }

    /// Unconditionally resets the timer to Idle, sized by current settings.
    pub fn stop_focus(&mut self) {
        self.reset_focus();
        info!("event=focus_stop module=store status=ok");
        self.commit(ChangeSet::of(Slice::ActiveFocus));
    }

    /// Recomputes the timer against the clock and completes it when due.
    ///
    /// Completion stops the timer and logs a completed session in one
    /// snapshot write. A later tick (or a manual stop) finds Idle, so both
    /// paths are safe to run in either order.
    pub fn tick(&mut self) -> TickOutcome {
        let now_ms = self.clock.now_ms();
        let focus = &self.state.active_focus;
        match focus.state() {
            FocusState::Idle => TickOutcome::Idle,
            FocusState::Paused => TickOutcome::Paused {
                remaining: focus.remaining,
            },
            FocusState::Running if !focus.is_finished_at(now_ms) => TickOutcome::Running {
                remaining: focus.remaining_at(now_ms),
            },
            FocusState::Running => {
                let finished = focus.clone();
                let session = FocusSession::create(NewSession {
                    duration_minutes: f64::from(finished.duration) / 60.0,
                    start_time: finished.start_time.unwrap_or(now_ms),
                    end_time: Some(now_ms),
                    is_completed: true,
                    session_type: finished.session_type,
                    task_id: finished.task_id,
                    notes: None,
                });
                self.reset_focus();
                self.state.sessions.push(session.clone());
                info!(
                    "event=focus_complete module=store status=ok session_id={} session_type={:?} duration_s={}",
                    session.id, session.session_type, finished.duration
                );
                self.commit(ChangeSet::of(Slice::ActiveFocus).with(Slice::Sessions));
                TickOutcome::Completed(session)
            }
        }
    }

    pub(super) fn reset_focus(&mut self) {
        self.state.active_focus = ActiveFocus::idle(&self.state.settings);
    }
}
