//! Timer notifications and listener registration

use std::{fmt, sync::Arc};

use serde::Serialize;

use crate::state::{SoundType, TimerState};

/// Kinds of notification a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Tick,
    Complete,
    Alert,
}

/// Payload of an `alert` notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub remaining_seconds: i64,
    /// Threshold that was crossed
    pub seconds: u32,
    pub sound_type: SoundType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Tick(TimerState),
    Complete(TimerState),
    Alert(AlertEvent),
}

impl TimerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TimerEvent::Tick(_) => EventKind::Tick,
            TimerEvent::Complete(_) => EventKind::Complete,
            TimerEvent::Alert(_) => EventKind::Alert,
        }
    }
}

pub type Listener = Arc<dyn Fn(&TimerEvent) + Send + Sync>;

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners in subscription order
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, EventKind, Listener)>,
}

impl Listeners {
    pub fn on(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push((id, kind, listener));
        id
    }

    /// Remove a listener; returns false when the id is unknown
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Listeners for `kind`, cloned so they can be called without holding a lock
    pub fn for_kind(&self, kind: EventKind) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| Arc::clone(l))
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|(_, k, _)| *k == kind).count()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("tick", &self.count(EventKind::Tick))
            .field("complete", &self.count(EventKind::Complete))
            .field("alert", &self.count(EventKind::Alert))
            .finish()
    }
}
