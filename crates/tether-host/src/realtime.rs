//! Per-block audio protocol.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --setup--> Configured --perform--> Running
//!        ^                     ^                      |
//!        |                     +--------setup---------+
//! ```
//!
//! [`RealTimeEngine::setup`] runs when the host negotiates the audio graph.
//! It rebuilds the client from the current parameters, records which inputs
//! are connected and allocates every buffer [`RealTimeEngine::perform`]
//! needs. Perform only binds views and calls the client.
//!
//! # Control outputs
//!
//! Control values are not emitted from the audio thread. Perform arms a
//! single-shot [`ControlClock`]; the host's deferred context fires it and
//! [`RealTimeEngine::emit_control`] sends the last block's values.

use tether_core::{Atom, Client, ParameterSet, ProcessBlock};

use crate::host::{Egress, Host};

/// Streaming entry point of a client type.
pub type StreamFn<C> = fn(&mut C, &ParameterSet, &mut ProcessBlock<'_, '_>);

/// State of the audio protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealTimeState {
    Uninitialized,
    Configured,
    Running,
}

// =========================================================================
// ControlClock
// =========================================================================

/// Single-shot, zero-delay trigger for control emission.
///
/// Arming an armed clock does nothing; firing disarms it.
#[derive(Debug, Default)]
pub struct ControlClock {
    armed: bool,
}

impl ControlClock {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Disarm, returning whether the clock was armed.
    pub fn fire(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

// =========================================================================
// ChannelStorage
// =========================================================================

/// Buffers allocated at setup and reused by every block.
#[derive(Debug, Default)]
pub struct ChannelStorage {
    /// Connection flag per client input.
    pub connected: Vec<bool>,
    /// Last block's value per control channel.
    pub control_values: Vec<f64>,
    /// Emission staging, one atom per control channel.
    pub control_atoms: Vec<Atom>,
    pub audio_outputs: usize,
}

impl ChannelStorage {
    /// Allocate for a client's channel layout.
    ///
    /// `connections` holds the host's flags for the client inputs; missing
    /// entries count as unconnected.
    pub fn allocate(inputs: usize, audio_outputs: usize, control_outputs: usize, connections: &[bool]) -> Self {
        let connected = (0..inputs)
            .map(|i| connections.get(i).copied().unwrap_or(false))
            .collect();
        Self {
            connected,
            control_values: vec![0.0; control_outputs],
            control_atoms: vec![Atom::Float(0.0); control_outputs],
            audio_outputs,
        }
    }

    pub fn control_outputs(&self) -> usize {
        self.control_values.len()
    }
}

// =========================================================================
// RealTimeEngine
// =========================================================================

/// Drives a client's streaming capability.
pub struct RealTimeEngine<C: Client> {
    process: StreamFn<C>,
    state: RealTimeState,
    storage: ChannelStorage,
    clock: Option<ControlClock>,
    /// Number of declared control egress points; channels past it are not emitted.
    control_egress: usize,
    sample_rate: f64,
}

impl<C: Client> RealTimeEngine<C> {
    pub fn new(process: StreamFn<C>) -> Self {
        Self {
            process,
            state: RealTimeState::Uninitialized,
            storage: ChannelStorage::default(),
            clock: None,
            control_egress: usize::MAX,
            sample_rate: 0.0,
        }
    }

    /// Cap emission to the control egress points the host object declared.
    pub fn limit_control_egress(&mut self, count: usize) {
        self.control_egress = count;
    }

    pub fn state(&self) -> RealTimeState {
        self.state
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn storage(&self) -> &ChannelStorage {
        &self.storage
    }

    pub fn clock(&self) -> Option<&ControlClock> {
        self.clock.as_ref()
    }

    /// Negotiate the audio graph.
    ///
    /// Replaces `client` with a fresh instance built from `params`.
    ///
    /// # Panics
    ///
    /// Panics if the new client has both audio and control outputs, or
    /// neither.
    pub fn setup(&mut self, client: &mut C, params: &ParameterSet, sample_rate: f64, connections: &[bool]) {
        *client = C::new(params);
        client.set_sample_rate(sample_rate);

        let inputs = client.audio_channels_in();
        let audio_outputs = client.audio_channels_out();
        let control_outputs = client.control_channels_out();

        assert!(
            (audio_outputs > 0) != (control_outputs > 0),
            "client must have either audio outputs or control outputs, got {} audio and {} control",
            audio_outputs,
            control_outputs
        );

        log::debug!(
            "Audio setup @ {} Hz: {} in, {} audio out, {} control out",
            sample_rate,
            inputs,
            audio_outputs,
            control_outputs
        );

        self.storage = ChannelStorage::allocate(inputs, audio_outputs, control_outputs, connections);
        // Values of the previous graph are gone; a pending emission must not send them.
        match self.clock.as_mut() {
            Some(clock) => {
                clock.fire();
            }
            None if control_outputs > 0 => self.clock = Some(ControlClock::default()),
            None => {}
        }
        self.sample_rate = sample_rate;
        self.state = RealTimeState::Configured;
    }

    /// Process one block on the audio thread.
    ///
    /// Unconnected inputs are hidden from the client. Before the first
    /// setup, audio outputs are silenced and the client is not called.
    pub fn perform(
        &mut self,
        client: &mut C,
        params: &ParameterSet,
        inputs: &[&[f64]],
        outputs: &mut [&mut [f64]],
        frames: usize,
    ) {
        if self.state == RealTimeState::Uninitialized {
            for output in outputs.iter_mut() {
                output.fill(0.0);
            }
            return;
        }

        let inputs = &inputs[..inputs.len().min(self.storage.connected.len())];
        if self.storage.control_outputs() > 0 {
            let mut block = ProcessBlock::control(
                inputs,
                &self.storage.connected,
                &mut self.storage.control_values,
                frames,
            );
            (self.process)(client, params, &mut block);
            if let Some(clock) = self.clock.as_mut() {
                clock.arm();
            }
        } else {
            let count = outputs.len().min(self.storage.audio_outputs);
            let mut block =
                ProcessBlock::audio(inputs, &self.storage.connected, &mut outputs[..count], frames);
            (self.process)(client, params, &mut block);
        }
        self.state = RealTimeState::Running;
    }

    /// Fire the control clock from the deferred context.
    ///
    /// Emits one value per control channel on its [`Egress::Control`].
    /// Returns whether anything was emitted.
    pub fn emit_control(&mut self, host: &dyn Host) -> bool {
        let fired = self.clock.as_mut().is_some_and(ControlClock::fire);
        if !fired || self.storage.control_outputs() == 0 {
            return false;
        }
        log::trace!("Emitting {} control values", self.storage.control_outputs());

        let storage = &mut self.storage;
        for (i, (atom, value)) in storage
            .control_atoms
            .iter_mut()
            .zip(storage.control_values.iter())
            .enumerate()
            .take(self.control_egress)
        {
            *atom = Atom::Float(*value);
            host.emit(Egress::Control(i), std::slice::from_ref(atom));
        }
        true
    }
}
