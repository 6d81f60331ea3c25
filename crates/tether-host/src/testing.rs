//! A [`Host`] that records everything sent to it.
//!
//! Meant for client tests: construct a wrapper against a
//! [`RecordingHost`], drive it, then inspect what reached the host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tether_core::{Atom, MemoryBuffer, SharedBuffer, Symbol};

use crate::host::{Egress, Host};

/// One call received by a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Warn(String),
    Error(String),
    Emit(Egress, Vec<Atom>),
    Touch(String),
}

/// In-memory host for tests.
#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
    buffers: Mutex<HashMap<Symbol, SharedBuffer>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `buffer` resolvable by name through [`Host::bind_buffer`].
    pub fn with_buffer(self, buffer: SharedBuffer) -> Self {
        self.buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(buffer.name().clone(), buffer);
        self
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Warn(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Payloads sent out of `egress`, oldest first.
    pub fn emitted(&self, egress: Egress) -> Vec<Vec<Atom>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Emit(target, atoms) if target == egress => Some(atoms),
                _ => None,
            })
            .collect()
    }

    pub fn touched(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Touch(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl Host for RecordingHost {
    fn warn(&self, _object: &str, message: &str) {
        self.record(HostEvent::Warn(message.to_string()));
    }

    fn error(&self, _object: &str, message: &str) {
        self.record(HostEvent::Error(message.to_string()));
    }

    fn emit(&self, egress: Egress, atoms: &[Atom]) {
        self.record(HostEvent::Emit(egress, atoms.to_vec()));
    }

    fn touch_attribute(&self, name: &str) {
        self.record(HostEvent::Touch(name.to_string()));
    }

    fn bind_buffer(&self, name: &Symbol) -> SharedBuffer {
        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        buffers
            .entry(name.clone())
            .or_insert_with(|| {
                let buffer: SharedBuffer = Arc::new(MemoryBuffer::new(name.clone(), 0, 1, 0.0));
                buffer
            })
            .clone()
    }
}
