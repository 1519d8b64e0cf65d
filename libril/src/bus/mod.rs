// libril/src/bus/mod.rs

pub mod registrant;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::trace;

pub use registrant::{Handler, RegistrantList, RegistrationId};

use crate::protocol::responses::DecodedValue;
use crate::types::EventKind;
use crate::utils::lock;

/// A decoded unsolicited event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub value: DecodedValue,
}

impl Event {
    pub fn new(kind: EventKind, value: DecodedValue) -> Self {
        Self { kind, value }
    }
}

/// Handle returned by `subscribe`; pass it back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    kind: EventKind,
    id: RegistrationId,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// Per-kind subscriber lists. Publishing happens on the reader thread and
/// holds no lock while handlers run.
#[derive(Default)]
pub struct EventBus {
    lists: Mutex<HashMap<EventKind, Arc<RegistrantList<Event>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn list_for(&self, kind: EventKind) -> Arc<RegistrantList<Event>> {
        lock(&self.lists)
            .entry(kind)
            .or_insert_with(|| Arc::new(RegistrantList::new()))
            .clone()
    }

    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = self.list_for(kind).add(Arc::new(handler));
        Subscription { kind, id }
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let list = lock(&self.lists).get(&subscription.kind).cloned();
        list.map(|l| l.remove(subscription.id)).unwrap_or(false)
    }

    /// Deliver to every subscriber of `event.kind`; returns how many were
    /// invoked successfully. No subscribers is not an error.
    pub fn publish(&self, event: &Event) -> usize {
        let list = lock(&self.lists).get(&event.kind).cloned();
        match list {
            Some(list) => list.notify(event),
            None => {
                trace!("no subscribers for {}", event.kind);
                0
            }
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        lock(&self.lists).get(&kind).map(|l| l.len()).unwrap_or(0)
    }
}
