// libril/src/icc/collaborators.rs

//! Outside components the card state machine drives. Every method has a
//! no-op default so embedders implement only what they use.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::utils::lock;

/// Reads the card's elementary files once the card is usable.
pub trait FileHandler: Send + Sync {
    /// Point subsequent file access at the application `aid`.
    fn select_application(&self, _aid: &str) {}

    /// Start loading the subscription records.
    fn load_records(&self) {}
}

/// Receives externally visible state changes.
pub trait StateBroadcaster: Send + Sync {
    fn broadcast(&self, _state: &str, _reason: Option<&str>) {}

    /// A card was inserted (`true`) or removed (`false`).
    fn card_swapped(&self, _added: bool) {}
}

/// System property sink.
pub trait PropertyStore: Send + Sync {
    fn set_property(&self, _key: &str, _value: &str) {}
}

/// Collaborator that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl FileHandler for Noop {}
impl StateBroadcaster for Noop {}
impl PropertyStore for Noop {}

/// Property store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn set_property(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), value.to_string());
    }
}
