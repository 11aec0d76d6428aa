use nodemind_core::{
    ActiveFocus, FocusState, ManualClock, MemorySlot, NewTask, SessionType, Settings,
    SettingsPatch, Store, StoreOptions, TickOutcome,
};
use std::sync::Arc;

const START_MS: i64 = 1_717_232_400_000;

fn setup() -> (Store, ManualClock) {
    let clock = ManualClock::new(START_MS);
    let store = Store::open(
        MemorySlot::new(),
        Arc::new(clock.clone()),
        StoreOptions::default(),
    );
    (store, clock)
}

#[test]
fn fresh_store_is_idle_with_default_duration() {
    let (store, _) = setup();
    assert_eq!(store.focus_state(), FocusState::Idle);
    assert_eq!(store.active_focus(), &ActiveFocus::idle(&Settings::default()));
    assert_eq!(store.remaining_secs(), 25 * 60);
}

#[test]
fn pause_then_resume_preserves_remaining_budget() {
    let (mut store, clock) = setup();
    store.start_focus(SessionType::Focus, 1500, None);
    assert_eq!(store.focus_state(), FocusState::Running);

    clock.advance_secs(400);
    store.pause_focus();
    assert_eq!(store.focus_state(), FocusState::Paused);
    assert_eq!(store.active_focus().remaining, 1100);
    assert_eq!(store.active_focus().start_time, None);
    assert_eq!(store.active_focus().paused_at, Some(START_MS + 400_000));

    // Time spent paused does not consume budget.
    clock.advance_secs(3_600);
    assert_eq!(store.remaining_secs(), 1100);

    store.resume_focus();
    assert_eq!(store.focus_state(), FocusState::Running);
    assert_eq!(store.active_focus().paused_at, None);
    let remaining = store.remaining_secs();
    assert!((1099..=1101).contains(&remaining), "remaining={remaining}");

    clock.advance_secs(100);
    assert_eq!(store.remaining_secs(), 1000);
}

#[test]
fn pause_and_resume_in_target_state_are_noops() {
    let (mut store, clock) = setup();

    store.pause_focus();
    assert_eq!(store.focus_state(), FocusState::Idle);

    store.start_focus(SessionType::ShortBreak, 300, None);
    let running = store.active_focus().clone();
    clock.advance_secs(10);
    store.resume_focus();
    assert_eq!(store.active_focus(), &running);

    store.pause_focus();
    let paused = store.active_focus().clone();
    clock.advance_secs(10);
    store.pause_focus();
    assert_eq!(store.active_focus(), &paused);
}

#[test]
fn stop_twice_matches_stop_once() {
    let (mut store, clock) = setup();
    store.start_focus(SessionType::LongBreak, 900, None);
    clock.advance_secs(42);

    store.stop_focus();
    let once = store.active_focus().clone();
    store.stop_focus();

    assert_eq!(store.active_focus(), &once);
    assert_eq!(once, ActiveFocus::idle(&Settings::default()));
    assert_eq!(store.focus_state(), FocusState::Idle);
}

#[test]
fn stop_uses_current_setting_not_started_duration() {
    let (mut store, _) = setup();
    store.start_focus(SessionType::Focus, 1500, None);
    store.update_settings(SettingsPatch {
        focus_duration: Some(50),
    });

    store.stop_focus();
    assert_eq!(store.active_focus().duration, 3000);
    assert_eq!(store.active_focus().remaining, 3000);
    assert_eq!(store.active_focus().session_type, SessionType::Focus);
}

#[test]
fn completion_logs_exactly_one_session_and_resets() {
    let (mut store, clock) = setup();
    let task_id = store.add_task(NewTask::new("deep work"));
    store.start_focus(SessionType::Focus, 5, Some(task_id));

    clock.advance_secs(4);
    assert_eq!(store.tick(), TickOutcome::Running { remaining: 1 });
    assert!(store.sessions().is_empty());

    clock.advance_secs(1);
    let session = match store.tick() {
        TickOutcome::Completed(session) => session,
        other => panic!("expected completion, got {other:?}"),
    };

    assert_eq!(store.sessions().len(), 1);
    assert_eq!(store.sessions()[0], session);
    assert!(session.is_completed);
    assert!((session.duration_minutes - 5.0 / 60.0).abs() < 1e-12);
    assert_eq!(session.start_time, START_MS);
    assert_eq!(session.end_time, Some(START_MS + 5_000));
    assert_eq!(session.session_type, SessionType::Focus);
    assert_eq!(session.task_id, Some(task_id));
    assert_eq!(store.focus_state(), FocusState::Idle);
    assert_eq!(store.active_focus(), &ActiveFocus::idle(&Settings::default()));

    // Completion followed by a tick or a manual stop changes nothing more.
    clock.advance_secs(5);
    assert_eq!(store.tick(), TickOutcome::Idle);
    store.stop_focus();
    assert_eq!(store.sessions().len(), 1);
}

#[test]
fn completion_after_long_suspension_is_detected_on_next_tick() {
    let (mut store, clock) = setup();
    store.start_focus_for(SessionType::ShortBreak, None);
    assert_eq!(store.active_focus().duration, 300);

    clock.advance_secs(10_000);
    assert_eq!(store.remaining_secs(), 0);
    assert!(matches!(store.tick(), TickOutcome::Completed(_)));
    assert_eq!(store.sessions()[0].session_type, SessionType::ShortBreak);
    assert_eq!(store.sessions()[0].duration_minutes, 5.0);
}

#[test]
fn paused_tick_reports_frozen_remaining() {
    let (mut store, clock) = setup();
    store.start_focus(SessionType::Focus, 60, None);
    clock.advance_secs(20);
    store.pause_focus();
    clock.advance_secs(500);

    assert_eq!(store.tick(), TickOutcome::Paused { remaining: 40 });
    assert!(store.sessions().is_empty());
}

#[test]
fn resume_from_idle_runs_the_stored_snapshot() {
    let (mut store, clock) = setup();
    store.resume_focus();
    assert_eq!(store.focus_state(), FocusState::Running);
    assert_eq!(store.active_focus().start_time, Some(START_MS));

    clock.advance_secs(60);
    assert_eq!(store.remaining_secs(), 25 * 60 - 60);
}

#[test]
fn start_focus_for_uses_settings() {
    let (mut store, _) = setup();
    store.update_settings(SettingsPatch {
        focus_duration: Some(45),
    });
    store.start_focus_for(SessionType::Focus, None);
    assert_eq!(store.active_focus().duration, 45 * 60);
    store.start_focus_for(SessionType::LongBreak, None);
    assert_eq!(store.active_focus().duration, 15 * 60);
}

#[test]
fn settings_change_resizes_idle_timer_only() {
    let (mut store, clock) = setup();
    store.update_settings(SettingsPatch {
        focus_duration: Some(50),
    });
    assert_eq!(store.focus_state(), FocusState::Idle);
    assert_eq!(store.active_focus().duration, 50 * 60);
    assert_eq!(store.remaining_secs(), 50 * 60);

    store.resume_focus();
    assert_eq!(store.active_focus().duration, 50 * 60);
    clock.advance_secs(60);
    assert_eq!(store.remaining_secs(), 49 * 60);

    store.update_settings(SettingsPatch {
        focus_duration: Some(10),
    });
    assert_eq!(store.focus_state(), FocusState::Running);
    assert_eq!(store.active_focus().duration, 50 * 60);

    store.pause_focus();
    store.update_settings(SettingsPatch {
        focus_duration: Some(15),
    });
    assert_eq!(store.focus_state(), FocusState::Paused);
    assert_eq!(store.active_focus().remaining, 49 * 60);
}
