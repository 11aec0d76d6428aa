//! Domain store: the single owner of application state.
//!
//! # Responsibility
//! - Own tasks, mind maps, nodes, edges, focus sessions, settings and the
//!   active focus timer.
//! - Expose synchronous mutation operations and persist one snapshot per
//!   committed mutation.
//! - Notify subscribers after each committed mutation.
//!
//! # Invariants
//! - Update/delete on a missing id is a silent no-op: nothing is written and
//!   nobody is notified.
//! - Snapshot writes are fire-and-forget; failures are logged, never raised.
//! - A rejected or unreadable snapshot at startup yields default state.

mod focus;
mod maps;
pub mod observer;
pub mod snapshot;
mod tasks;

use crate::clock::{Clock, SystemClock};
use crate::db::open_db;
use crate::model::mindmap::{MapId, NodeId};
use crate::repo::slot_repo::{MemorySlot, SlotResult, SnapshotSlot, SqliteSlotRepository};
use log::{error, info, warn};
use observer::{ChangeSet, Interest, ObserverRegistry, SubscriptionId};
use snapshot::{decode_snapshot, encode_snapshot, AppState};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub use focus::TickOutcome;

/// Default namespaced key the snapshot is stored under.
pub const DEFAULT_SLOT_KEY: &str = "node-mind-storage";

/// Suffix of the slot that keeps a rejected snapshot for manual recovery.
const REJECTED_SLOT_SUFFIX: &str = ".rejected";

/// Store construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub slot_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

/// Referential violations rejected at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    MapNotFound(MapId),
    NodeNotFound(NodeId),
    /// Edge endpoint exists but belongs to another map.
    EndpointOutsideMap { node_id: NodeId, map_id: MapId },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapNotFound(id) => write!(f, "mind map not found: {id}"),
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::EndpointOutsideMap { node_id, map_id } => {
                write!(f, "node {node_id} does not belong to map {map_id}")
            }
        }
    }
}

impl Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owned application state plus its persistence slot and subscribers.
pub struct Store {
    state: AppState,
    options: StoreOptions,
    slot: Box<dyn SnapshotSlot + Send>,
    clock: Arc<dyn Clock>,
    observers: ObserverRegistry,
}

impl Store {
    /// Opens a store over `slot`, rehydrating any persisted snapshot.
    ///
    /// Never fails: unreadable or rejected snapshots fall back to defaults.
    pub fn open(
        slot: impl SnapshotSlot + Send + 'static,
        clock: Arc<dyn Clock>,
        options: StoreOptions,
    ) -> Self {
        let started_at = Instant::now();
        let state = rehydrate(&slot, &options.slot_key);
        info!(
            "event=store_open module=store status=ok duration_ms={} tasks={} maps={} nodes={} edges={} sessions={}",
            started_at.elapsed().as_millis(),
            state.tasks.len(),
            state.maps.len(),
            state.nodes.len(),
            state.edges.len(),
            state.sessions.len()
        );
        Self {
            state,
            options,
            slot: Box::new(slot),
            clock,
            observers: ObserverRegistry::default(),
        }
    }

    /// Opens a SQLite-backed store at `path` using the wall clock.
    pub fn open_sqlite(path: impl AsRef<Path>) -> SlotResult<Self> {
        let conn = open_db(path)?;
        let slot = SqliteSlotRepository::try_new(conn)?;
        Ok(Self::open(
            slot,
            Arc::new(SystemClock),
            StoreOptions::default(),
        ))
    }

    /// Ephemeral store with empty state and the wall clock.
    pub fn in_memory() -> Self {
        Self::open(
            MemorySlot::new(),
            Arc::new(SystemClock),
            StoreOptions::default(),
        )
    }

    /// Read-only view of the whole state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Current time according to the store clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Registers `listener` for post-mutation notifications.
    pub fn subscribe(
        &mut self,
        interest: Interest,
        listener: impl FnMut(&AppState, &ChangeSet) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(interest, Box::new(listener))
    }

    /// Removes a subscription; returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Persists the full snapshot, then notifies subscribers.
    fn commit(&mut self, changes: ChangeSet) {
        self.persist();
        self.observers.notify(&self.state, &changes);
    }

    fn persist(&self) {
        let payload = match encode_snapshot(&self.state) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=snapshot_write module=store status=error error_code=encode_failed error={err}"
                );
                return;
            }
        };
        if let Err(err) = self.slot.write(&self.options.slot_key, &payload) {
            error!(
                "event=snapshot_write module=store status=error error_code=slot_write_failed bytes={} error={err}",
                payload.len()
            );
        }
    }
}

fn rehydrate(slot: &dyn SnapshotSlot, slot_key: &str) -> AppState {
    let payload = match slot.read(slot_key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            info!("event=snapshot_load module=store status=empty");
            return AppState::default();
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=store status=error error_code=slot_read_failed error={err}"
            );
            return AppState::default();
        }
    };

    match decode_snapshot(&payload) {
        Ok(state) => state,
        Err(err) => {
            warn!(
                "event=snapshot_rejected module=store status=reset reason={} error={err}",
                err.code()
            );
            let backup_key = format!("{slot_key}{REJECTED_SLOT_SUFFIX}");
            if let Err(err) = slot.write(&backup_key, &payload) {
                error!(
                    "event=snapshot_backup module=store status=error error_code=slot_write_failed error={err}"
                );
            }
            AppState::default()
        }
    }
}
