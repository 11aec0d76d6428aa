//! Post-mutation change notification.
//!
//! # Responsibility
//! - Track subscribers and the state slices they care about.
//! - Deliver one notification per committed mutation to matching subscribers.
//!
//! # Invariants
//! - Subscribers run after the snapshot write, in subscription order.
//! - A mutation that changed nothing notifies no one.

use crate::store::snapshot::AppState;
use std::collections::{BTreeMap, BTreeSet};

/// Named part of the store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slice {
    Tasks,
    Maps,
    Nodes,
    Edges,
    Sessions,
    Settings,
    ActiveFocus,
}

/// Set of slices touched by one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    slices: BTreeSet<Slice>,
}

impl ChangeSet {
    pub fn of(slice: Slice) -> Self {
        let mut changes = Self::default();
        changes.insert(slice);
        changes
    }

    pub fn with(mut self, slice: Slice) -> Self {
        self.insert(slice);
        self
    }

    pub fn insert(&mut self, slice: Slice) {
        self.slices.insert(slice);
    }

    pub fn contains(&self, slice: Slice) -> bool {
        self.slices.contains(&slice)
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Slice> + '_ {
        self.slices.iter().copied()
    }
}

/// What a subscriber wants to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interest {
    All,
    Slices(BTreeSet<Slice>),
}

impl Interest {
    pub fn slices(slices: impl IntoIterator<Item = Slice>) -> Self {
        Self::Slices(slices.into_iter().collect())
    }

    fn matches(&self, changes: &ChangeSet) -> bool {
        match self {
            Self::All => !changes.is_empty(),
            Self::Slices(wanted) => changes.iter().any(|slice| wanted.contains(&slice)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&AppState, &ChangeSet) + Send>;

struct Subscription {
    interest: Interest,
    listener: Listener,
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_id: u64,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, interest: Interest, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions
            .insert(id, Subscription { interest, listener });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub(crate) fn notify(&mut self, state: &AppState, changes: &ChangeSet) {
        for subscription in self.subscriptions.values_mut() {
            if subscription.interest.matches(changes) {
                (subscription.listener)(state, changes);
            }
        }
    }
}
