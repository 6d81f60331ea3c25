//! Host-agnostic model for the tether client shim.
//!
//! This crate holds everything a client author touches: typed parameter
//! descriptors and values, the [`ParameterSet`] with its constraint
//! enforcement, the [`Client`] capability traits, the per-block
//! [`ProcessBlock`] view, and the [`BufferAdaptor`] interface to host-owned
//! buffers. It knows nothing about any particular host; see `tether-host`
//! for the adapter.

pub mod atom;
pub mod buffer;
pub mod choice;
pub mod client;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod outcome;
pub mod parameter_set;
pub mod process_block;
pub mod value;

pub use atom::{Atom, Symbol, NONE_SYMBOL};
pub use buffer::{BufferAdaptor, MemoryBuffer, Notification, SharedBuffer};
pub use choice::EnumChoice;
pub use client::{Client, NonRealTime, RealTime};
pub use config::ClassConfig;
pub use descriptor::{Constraint, ParameterDescriptor, ParameterKind, ScalarKind};
pub use error::{CoreError, CoreResult};
pub use outcome::{Outcome, Status};
pub use parameter_set::ParameterSet;
pub use process_block::ProcessBlock;
pub use value::{ParameterValue, Scalar};
