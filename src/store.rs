use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::frame::Frame;

/// The Store holds the key-value pairs shared by every connection. It is
/// cheaply cloneable via reference counting; a single mutex serializes all
/// access, so no two operations can interleave their partial effects.
#[derive(Clone)]
pub struct Store {
    inner: Arc<InnerStore>,
}

impl Store {
    pub fn new() -> Store {
        let state = State {
            keys: HashMap::new(),
        };

        Store {
            inner: Arc::new(InnerStore {
                state: Mutex::new(state),
            }),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InnerStore {
    state: Mutex<State>,
}

impl InnerStore {
    pub fn lock(&self) -> StoreLocked<'_> {
        StoreLocked {
            state: self.state.lock().unwrap(),
        }
    }
}

impl Deref for Store {
    type Target = InnerStore;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

struct State {
    keys: HashMap<String, Frame>,
}

/// A locked view of the store. Holding one guard for the duration of a
/// command makes that command atomic with respect to every other connection.
pub struct StoreLocked<'a> {
    state: MutexGuard<'a, State>,
}

impl StoreLocked<'_> {
    pub fn set(&mut self, key: String, value: Frame) {
        self.state.keys.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<Frame> {
        self.state.keys.get(key).cloned()
    }

    pub fn remove(&mut self, key: &str) -> Option<Frame> {
        self.state.keys.remove(key)
    }

    /// Remove every entry, returning how many there were.
    pub fn flush(&mut self) -> usize {
        let size = self.state.keys.len();
        self.state.keys.clear();
        size
    }

    pub fn exists(&self, key: &str) -> bool {
        self.state.keys.contains_key(key)
    }

    pub fn size(&self) -> usize {
        self.state.keys.len()
    }
}
