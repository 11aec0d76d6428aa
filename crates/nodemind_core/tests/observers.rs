use nodemind_core::{
    AppState, ChangeSet, Interest, ManualClock, MemorySlot, NewNode, NewTask, Position,
    SessionType, Slice, Store, StoreOptions,
};
use std::sync::{Arc, Mutex};

fn setup() -> (Store, ManualClock) {
    let clock = ManualClock::new(1_717_232_400_000);
    let store = Store::open(
        MemorySlot::new(),
        Arc::new(clock.clone()),
        StoreOptions::default(),
    );
    (store, clock)
}

type Events = Arc<Mutex<Vec<Vec<Slice>>>>;

/// Listener that records the slices of every notification it receives.
fn recorder() -> (Events, impl FnMut(&AppState, &ChangeSet) + Send + 'static) {
    let seen = Events::default();
    let sink = Arc::clone(&seen);
    let listener = move |_: &AppState, changes: &ChangeSet| {
        sink.lock().unwrap().push(changes.iter().collect::<Vec<_>>());
    };
    (seen, listener)
}

#[test]
fn subscribers_only_hear_about_their_slices() {
    let (mut store, _) = setup();
    let (task_events, task_listener) = recorder();
    let (map_events, map_listener) = recorder();
    store.subscribe(Interest::slices([Slice::Tasks]), task_listener);
    store.subscribe(Interest::slices([Slice::Maps, Slice::Nodes]), map_listener);

    store.add_task(NewTask::new("a"));
    let map_id = store.add_map("m");
    store
        .add_node(NewNode::new(map_id, "n", Position::default()))
        .unwrap();

    assert_eq!(*task_events.lock().unwrap(), vec![vec![Slice::Tasks]]);
    assert_eq!(
        *map_events.lock().unwrap(),
        vec![vec![Slice::Maps], vec![Slice::Nodes]]
    );
}

#[test]
fn listener_sees_state_after_the_mutation() {
    let (mut store, _) = setup();
    let counts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&counts);
    store.subscribe(Interest::All, move |state, _| {
        sink.lock().unwrap().push(state.tasks.len());
    });

    store.add_task(NewTask::new("first"));
    store.add_task(NewTask::new("second"));

    assert_eq!(*counts.lock().unwrap(), vec![1, 2]);
}

#[test]
fn noop_mutations_do_not_notify() {
    let (mut store, _) = setup();
    let (events, listener) = recorder();
    store.subscribe(Interest::All, listener);

    let unknown = uuid::Uuid::new_v4();
    store.delete_task(unknown);
    store.delete_map(unknown);
    store.pause_focus();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn focus_completion_reports_timer_and_session_slices_together() {
    let (mut store, clock) = setup();
    let (events, listener) = recorder();
    store.subscribe(Interest::slices([Slice::Sessions]), listener);

    store.start_focus(SessionType::Focus, 5, None);
    clock.advance_secs(5);
    store.tick();

    assert_eq!(
        *events.lock().unwrap(),
        vec![vec![Slice::Sessions, Slice::ActiveFocus]]
    );
}

#[test]
fn unsubscribe_stops_notifications() {
    let (mut store, _) = setup();
    let (events, listener) = recorder();
    let id = store.subscribe(Interest::All, listener);
    assert_eq!(store.subscriber_count(), 1);

    store.add_map("before");
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.add_map("after");

    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(store.subscriber_count(), 0);
}
