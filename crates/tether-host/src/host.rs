//! The host side of the shim.
//!
//! [`Host`] is everything a wrapped object needs from the surrounding
//! environment: diagnostics, outlets, attribute refresh and buffer lookup.
//! A host adapter implements it once; every wrapped object shares it.

use tether_core::{Atom, SharedBuffer, Symbol};

/// Output point of a wrapped object.
///
/// The list of egress points is fixed when the object is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Egress {
    /// General result channel (attribute dumps).
    Dump,
    /// Payload-less completion signal of a batch run.
    Done,
    /// Control values of one control channel.
    Control(usize),
    /// One audio output. Carries samples, never atoms.
    Signal(usize),
}

/// Services provided by the host environment.
pub trait Host: Send + Sync {
    /// Post a non-fatal diagnostic on behalf of `object`.
    fn warn(&self, object: &str, message: &str);

    /// Post an error diagnostic on behalf of `object`.
    fn error(&self, object: &str, message: &str);

    /// Send atoms out of an egress point. [`Egress::Done`] is sent empty.
    fn emit(&self, egress: Egress, atoms: &[Atom]);

    /// Ask the host to re-read an attribute so its views refresh.
    fn touch_attribute(&self, name: &str);

    /// Create a live binding to the host buffer called `name`.
    ///
    /// The returned adaptor references the host buffer; it does not copy it.
    fn bind_buffer(&self, name: &Symbol) -> SharedBuffer;
}
