//! Engine composition.

use tether_core::Client;

use crate::non_realtime::NonRealTimeEngine;
use crate::realtime::RealTimeEngine;

/// Both engines for a client with both capabilities.
///
/// The engines share nothing but the client and its parameters, which the
/// wrapper lends to whichever protocol the host is driving.
pub struct DualModeEngine<C: Client> {
    pub real_time: RealTimeEngine<C>,
    pub non_real_time: NonRealTimeEngine<C>,
}

/// The engines attached to one wrapper.
pub enum Engine<C: Client> {
    RealTime(RealTimeEngine<C>),
    NonRealTime(NonRealTimeEngine<C>),
    Dual(DualModeEngine<C>),
}

impl<C: Client> Engine<C> {
    pub fn real_time(&self) -> Option<&RealTimeEngine<C>> {
        match self {
            Engine::RealTime(engine) => Some(engine),
            Engine::Dual(dual) => Some(&dual.real_time),
            Engine::NonRealTime(_) => None,
        }
    }

    pub fn real_time_mut(&mut self) -> Option<&mut RealTimeEngine<C>> {
        match self {
            Engine::RealTime(engine) => Some(engine),
            Engine::Dual(dual) => Some(&mut dual.real_time),
            Engine::NonRealTime(_) => None,
        }
    }

    pub fn non_real_time(&self) -> Option<&NonRealTimeEngine<C>> {
        match self {
            Engine::NonRealTime(engine) => Some(engine),
            Engine::Dual(dual) => Some(&dual.non_real_time),
            Engine::RealTime(_) => None,
        }
    }

    pub fn non_real_time_mut(&mut self) -> Option<&mut NonRealTimeEngine<C>> {
        match self {
            Engine::NonRealTime(engine) => Some(engine),
            Engine::Dual(dual) => Some(&mut dual.non_real_time),
            Engine::RealTime(_) => None,
        }
    }

    pub fn is_real_time(&self) -> bool {
        self.real_time().is_some()
    }

    pub fn is_non_real_time(&self) -> bool {
        self.non_real_time().is_some()
    }
}
