//! Engine handles for the C ABI.
//!
//! Callers hold engines as opaque `i64` handles. Handle 0 is never issued,
//! and a closed handle is never reused.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;
use parking_lot::Mutex;

use crate::backend::{ComputeBackend, SystemBackend};
use crate::engine::Engine;
use crate::error::{FerrumError, Result};

pub type SharedEngine<B> = Arc<Mutex<Engine<B>>>;

pub struct SessionRegistry<B: ComputeBackend> {
    next_id: i64,
    engines: HashMap<i64, SharedEngine<B>>,
}

impl<B: ComputeBackend> Default for SessionRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ComputeBackend> SessionRegistry<B> {
    pub fn new() -> Self {
        SessionRegistry {
            next_id: 1,
            engines: HashMap::new(),
        }
    }

    pub fn insert(&mut self, engine: Engine<B>) -> i64 {
        let handle = self.next_id;
        self.next_id += 1;
        self.engines.insert(handle, Arc::new(Mutex::new(engine)));
        debug!("opened engine handle {}", handle);
        handle
    }

    pub fn get(&self, handle: i64) -> Result<SharedEngine<B>> {
        self.engines
            .get(&handle)
            .cloned()
            .ok_or(FerrumError::InvalidHandle(handle))
    }

    /// Forget a handle. The engine is torn down once the last in-flight
    /// call holding it returns.
    pub fn remove(&mut self, handle: i64) -> Option<SharedEngine<B>> {
        let removed = self.engines.remove(&handle);
        if removed.is_some() {
            debug!("closed engine handle {}", handle);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

lazy_static! {
    static ref SESSIONS: Mutex<SessionRegistry<SystemBackend>> = Mutex::new(SessionRegistry::new());
}

/// Process-wide registry behind the C ABI.
pub fn sessions() -> &'static Mutex<SessionRegistry<SystemBackend>> {
    &SESSIONS
}
