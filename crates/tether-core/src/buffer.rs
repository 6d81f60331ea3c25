//! Narrow adaptor over host-owned buffers.
//!
//! Resource-handle parameters never own their buffer. They hold a
//! [`SharedBuffer`] produced by the host for a symbolic name, and the host
//! keeps the underlying storage alive and up to date.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::atom::Symbol;

/// Shared, reference-counted handle to a host buffer adaptor.
pub type SharedBuffer = Arc<dyn BufferAdaptor>;

/// A change notification delivered by the host.
///
/// `source` is the name of the object that changed, `message` what happened
/// (for example `"buffer_modified"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub source: Symbol,
    pub message: Symbol,
}

impl Notification {
    pub fn new(source: impl Into<Symbol>, message: impl Into<Symbol>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Access to a host-owned multichannel sample buffer.
///
/// Implementations are live bindings to a name: if the host replaces the
/// storage behind that name, the adaptor follows it.
pub trait BufferAdaptor: Send + Sync {
    /// Name this adaptor is bound to.
    fn name(&self) -> &Symbol;

    /// Whether a buffer currently exists under [`name`](Self::name).
    fn exists(&self) -> bool;

    fn num_frames(&self) -> usize;

    fn num_channels(&self) -> usize;

    fn sample_rate(&self) -> f64;

    /// Copy frames of `channel` starting at `offset` into `dest`.
    ///
    /// Returns the number of frames copied.
    fn read(&self, channel: usize, offset: usize, dest: &mut [f64]) -> usize;

    /// Copy `src` into `channel` starting at `offset`.
    ///
    /// Returns the number of frames written.
    fn write(&self, channel: usize, offset: usize, src: &[f64]) -> usize;

    /// Resize the buffer. Existing content may be discarded.
    fn resize(&self, frames: usize, channels: usize, sample_rate: f64);

    /// React to a host change notification. Default: ignore.
    fn notify(&self, _notification: &Notification) {}
}

impl fmt::Debug for dyn BufferAdaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferAdaptor")
            .field("name", self.name())
            .field("frames", &self.num_frames())
            .field("channels", &self.num_channels())
            .finish()
    }
}

struct MemoryStorage {
    channels: Vec<Vec<f64>>,
    frames: usize,
    sample_rate: f64,
    notifications: usize,
}

/// In-memory [`BufferAdaptor`], useful for hosts without native buffers and
/// for tests.
pub struct MemoryBuffer {
    name: Symbol,
    storage: RwLock<MemoryStorage>,
}

impl MemoryBuffer {
    /// Create a zeroed buffer.
    pub fn new(name: impl Into<Symbol>, frames: usize, channels: usize, sample_rate: f64) -> Self {
        Self {
            name: name.into(),
            storage: RwLock::new(MemoryStorage {
                channels: vec![vec![0.0; frames]; channels],
                frames,
                sample_rate,
                notifications: 0,
            }),
        }
    }

    /// Create a single-channel buffer holding `samples`.
    pub fn from_samples(name: impl Into<Symbol>, samples: &[f64], sample_rate: f64) -> Self {
        let buffer = Self::new(name, samples.len(), 1, sample_rate);
        buffer.write(0, 0, samples);
        buffer
    }

    /// Number of notifications received so far.
    pub fn notification_count(&self) -> usize {
        self.storage.read().map(|s| s.notifications).unwrap_or(0)
    }
}

impl BufferAdaptor for MemoryBuffer {
    fn name(&self) -> &Symbol {
        &self.name
    }

    fn exists(&self) -> bool {
        true
    }

    fn num_frames(&self) -> usize {
        self.storage.read().map(|s| s.frames).unwrap_or(0)
    }

    fn num_channels(&self) -> usize {
        self.storage.read().map(|s| s.channels.len()).unwrap_or(0)
    }

    fn sample_rate(&self) -> f64 {
        self.storage.read().map(|s| s.sample_rate).unwrap_or(0.0)
    }

    fn read(&self, channel: usize, offset: usize, dest: &mut [f64]) -> usize {
        let Ok(storage) = self.storage.read() else {
            return 0;
        };
        let Some(data) = storage.channels.get(channel).filter(|d| offset <= d.len()) else {
            return 0;
        };
        let available = data.len().saturating_sub(offset).min(dest.len());
        dest[..available].copy_from_slice(&data[offset..offset + available]);
        available
    }

    fn write(&self, channel: usize, offset: usize, src: &[f64]) -> usize {
        let Ok(mut storage) = self.storage.write() else {
            return 0;
        };
        let Some(data) = storage.channels.get_mut(channel).filter(|d| offset <= d.len()) else {
            return 0;
        };
        let available = data.len().saturating_sub(offset).min(src.len());
        data[offset..offset + available].copy_from_slice(&src[..available]);
        available
    }

    fn resize(&self, frames: usize, channels: usize, sample_rate: f64) {
        if let Ok(mut storage) = self.storage.write() {
            log::debug!(
                "Resizing buffer '{}' to {} frames x {} channels @ {} Hz",
                self.name, frames, channels, sample_rate
            );
            storage.channels = vec![vec![0.0; frames]; channels];
            storage.frames = frames;
            storage.sample_rate = sample_rate;
        }
    }

    fn notify(&self, _notification: &Notification) {
        if let Ok(mut storage) = self.storage.write() {
            storage.notifications += 1;
        }
    }
}
