//! Per-class registration data.

use std::sync::Arc;

use tether_core::{Atom, ClassConfig, Client, NonRealTime, ParameterDescriptor, RealTime};

use crate::attribute::AttributeTable;
use crate::dual::{DualModeEngine, Engine};
use crate::host::Host;
use crate::non_realtime::{BatchFn, NonRealTimeEngine};
use crate::realtime::{RealTimeEngine, StreamFn};
use crate::wrapper::Wrapper;

/// Everything shared by the instances of one host class.
///
/// Built once at registration: the descriptor list, the attribute table
/// derived from it, and the capability entry points. Which constructor is
/// used decides the protocols the class takes part in.
///
/// ```ignore
/// let class = ClientClass::<PeakFollower>::dual(CONFIG);
/// ```
pub struct ClientClass<C: Client> {
    config: ClassConfig,
    descriptors: Arc<[ParameterDescriptor]>,
    attributes: AttributeTable,
    stream: Option<StreamFn<C>>,
    batch: Option<BatchFn<C>>,
}

impl<C: Client> ClientClass<C> {
    /// Class driven by the audio callback only.
    pub fn real_time(config: ClassConfig) -> Self
    where
        C: RealTime,
    {
        Self::build(config, Some(<C as RealTime>::process), None)
    }

    /// Class driven by batch triggers only.
    pub fn non_real_time(config: ClassConfig) -> Self
    where
        C: NonRealTime,
    {
        Self::build(config, None, Some(<C as NonRealTime>::process_batch))
    }

    /// Class taking part in both protocols.
    pub fn dual(config: ClassConfig) -> Self
    where
        C: RealTime + NonRealTime,
    {
        Self::build(
            config,
            Some(<C as RealTime>::process),
            Some(<C as NonRealTime>::process_batch),
        )
    }

    fn build(config: ClassConfig, stream: Option<StreamFn<C>>, batch: Option<BatchFn<C>>) -> Self {
        let descriptors: Arc<[ParameterDescriptor]> = C::descriptors().into();
        let attributes = AttributeTable::build(&descriptors, stream.is_some());
        log::debug!(
            "Class '{}' built: {} parameters, real-time: {}, batch: {}",
            config.name,
            descriptors.len(),
            stream.is_some(),
            batch.is_some()
        );
        Self {
            config,
            descriptors,
            attributes,
            stream,
            batch,
        }
    }

    pub fn config(&self) -> &ClassConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn descriptors(&self) -> &Arc<[ParameterDescriptor]> {
        &self.descriptors
    }

    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    pub fn is_real_time(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_non_real_time(&self) -> bool {
        self.batch.is_some()
    }

    /// Fresh engines for a new instance.
    pub(crate) fn engine(&self) -> Engine<C> {
        match (self.stream, self.batch) {
            (Some(stream), Some(batch)) => Engine::Dual(DualModeEngine {
                real_time: RealTimeEngine::new(stream),
                non_real_time: NonRealTimeEngine::new(batch),
            }),
            (Some(stream), None) => Engine::RealTime(RealTimeEngine::new(stream)),
            (None, Some(batch)) => Engine::NonRealTime(NonRealTimeEngine::new(batch)),
            // Every constructor sets at least one entry point
            (None, None) => unreachable!("class '{}' has no capability", self.config.name),
        }
    }

    /// Create an instance from host construction arguments.
    pub fn instantiate(self: &Arc<Self>, host: Arc<dyn Host>, args: &[Atom]) -> Wrapper<C> {
        Wrapper::new(Arc::clone(self), host, args)
    }
}
