//! Host adapter for tether clients.
//!
//! This crate turns a typed [`Client`](tether_core::Client) into a host
//! object: parameters become attributes, construction arguments bind fixed
//! parameters, and the client's capabilities are driven through the host's
//! audio callback and deferred context.
//!
//! # Pieces
//!
//! - [`Host`]: what the surrounding environment provides
//! - [`ClientClass`]: per-class data built once at registration
//! - [`Wrapper`]: one live instance
//! - [`ClassRegistry`]: name to factory map, installable process-wide
//! - [`HostObject`]: object-safe view of a wrapper

pub mod attribute;
pub mod class;
pub mod dual;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod non_realtime;
pub mod notify;
pub mod object;
pub mod realtime;
pub mod registry;
pub mod reporter;
pub mod testing;
pub mod wrapper;

pub use attribute::{AttributeInfo, AttributeStyle, AttributeTable, AttributeTarget, AttributeType};
pub use class::ClientClass;
pub use dual::{DualModeEngine, Engine};
pub use error::{WrapperError, WrapperResult};
pub use fetcher::ParamFetcher;
pub use host::{Egress, Host};
pub use non_realtime::NonRealTimeEngine;
pub use notify::route_notification;
pub use object::HostObject;
pub use realtime::{RealTimeEngine, RealTimeState};
pub use registry::{ClassRegistry, ClassRegistryBuilder};
pub use reporter::ResultReporter;
pub use wrapper::Wrapper;
