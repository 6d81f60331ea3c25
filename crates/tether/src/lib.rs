//! # Tether
//!
//! Wraps typed processing clients as host objects.
//!
//! A client declares an ordered list of typed parameters and implements
//! real-time streaming, triggered batch processing, or both. Tether turns
//! it into a host object whose parameters are attributes, whose positional
//! construction arguments bind fixed parameters, and whose processing is
//! driven by the host's audio callback and deferred context.
//!
//! ## Architecture
//!
//! ```text
//! Your client (implements Client + RealTime and/or NonRealTime)
//!        ↓
//! ClientClass<C> (descriptors, attribute table, entry points)
//!        ↓
//! Wrapper<C> (live + snapshot parameters, engines, reporter)
//!        ↓
//! Host (diagnostics, egress, buffers)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tether::prelude::*;
//!
//! struct Peak { channels: usize }
//!
//! impl Client for Peak {
//!     fn descriptors() -> Vec<ParameterDescriptor> {
//!         vec![ParameterDescriptor::float("decay", "Decay", 0.99).with_min(0.0).with_max(1.0)]
//!     }
//!     fn new(_params: &ParameterSet) -> Self { Self { channels: 1 } }
//!     fn audio_channels_in(&self) -> usize { 1 }
//!     fn control_channels_out(&self) -> usize { 1 }
//! }
//!
//! impl RealTime for Peak {
//!     fn process(&mut self, params: &ParameterSet, block: &mut ProcessBlock<'_, '_>) {
//!         // Your DSP here
//!     }
//! }
//!
//! static CONFIG: ClassConfig = ClassConfig::new("peak~");
//!
//! ClassRegistry::builder()
//!     .register(ClientClass::<Peak>::real_time(CONFIG))
//!     .build()?
//!     .install()?;
//! ```

// Re-export sub-crates
pub use tether_core as core;
pub use tether_host as host;

#[cfg(feature = "derive")]
pub use tether_macros::EnumChoice;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tether::prelude::*;
/// ```
pub mod prelude {
    pub use tether_core::{
        // Wire values
        Atom, Symbol,
        // Parameters
        Constraint, EnumChoice, ParameterDescriptor, ParameterKind, ParameterSet, ParameterValue,
        Scalar, ScalarKind,
        // Clients
        Client, NonRealTime, ProcessBlock, RealTime,
        // Buffers
        BufferAdaptor, MemoryBuffer, Notification, SharedBuffer,
        // Outcomes and errors
        CoreError, CoreResult, Outcome, Status,
        // Configuration
        ClassConfig,
    };

    pub use tether_host::{
        ClassRegistry, ClientClass, Egress, Host, HostObject, WrapperError, WrapperResult,
        Wrapper,
    };

    // Derive macro shares its name with the trait; they live in different namespaces
    #[cfg(feature = "derive")]
    pub use tether_macros::EnumChoice;
}
