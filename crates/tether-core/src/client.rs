//! Client traits.
//!
//! A client is the typed processing unit a host object wraps. Every client
//! implements [`Client`] plus at least one capability trait:
//!
//! - [`RealTime`] for per-block streaming, driven from the audio callback
//! - [`NonRealTime`] for one-shot batch runs, driven from the deferred context
//!
//! A client implementing both is run in dual mode.
//!
//! # Statelessness
//!
//! The host discards and rebuilds a real-time client each time it
//! renegotiates the audio graph, since channel counts and sample rate are
//! inputs to construction. Streaming state does not survive a renegotiation.

use crate::outcome::Outcome;
use crate::parameter_set::ParameterSet;
use crate::process_block::ProcessBlock;
use crate::descriptor::ParameterDescriptor;

/// Capabilities shared by every client.
pub trait Client: Send + Sized + 'static {
    /// The ordered parameter list. Called once per class at registration.
    fn descriptors() -> Vec<ParameterDescriptor>;

    /// Build a client from the current parameter values.
    fn new(params: &ParameterSet) -> Self;

    /// Number of audio inputs the client reads.
    fn audio_channels_in(&self) -> usize {
        0
    }

    /// Number of audio outputs the client writes.
    ///
    /// A real-time client has audio outputs or control outputs, never both.
    fn audio_channels_out(&self) -> usize {
        0
    }

    /// Number of control values the client writes per block.
    fn control_channels_out(&self) -> usize {
        0
    }

    fn set_sample_rate(&mut self, _sample_rate: f64) {}

    /// Processing latency in samples.
    fn latency(&self) -> usize {
        0
    }
}

/// Per-block streaming capability.
pub trait RealTime: Client {
    /// Process one block.
    ///
    /// Runs on the audio thread. Must not allocate, lock or block.
    fn process(&mut self, params: &ParameterSet, block: &mut ProcessBlock<'_, '_>);
}

/// Triggered batch capability.
pub trait NonRealTime: Client {
    /// Run one batch job to completion.
    fn process_batch(&mut self, params: &ParameterSet) -> Outcome;
}
