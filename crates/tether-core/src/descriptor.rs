//! Static parameter metadata.
//!
//! A client declares its parameters once as an ordered list of
//! [`ParameterDescriptor`]s. The position in that list is the parameter's
//! index for its whole lifetime.
//!
//! # Example
//!
//! ```ignore
//! fn descriptors() -> Vec<ParameterDescriptor> {
//!     vec![
//!         ParameterDescriptor::float("threshold", "Threshold", 0.1).fixed().with_min(0.0),
//!         ParameterDescriptor::long("order", "Order", 1).fixed(),
//!         ParameterDescriptor::buffer("source", "Source Buffer"),
//!         ParameterDescriptor::long_list("fftsettings", "FFT Settings", &[1024, -1, -1]),
//!     ]
//! }
//! ```

use crate::choice::EnumChoice;
use crate::value::{ParameterValue, Scalar};

/// Kind of a single value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Float,
    Long,
    Buffer,
}

/// Type tag of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Continuous numeric value.
    Float,
    /// Integer value.
    Long,
    /// Integer index into a list of named options.
    Enum { options: &'static [&'static str] },
    /// Handle to a host-owned buffer.
    Buffer,
    /// Fixed-length list of one scalar kind.
    List { element: ScalarKind, arity: usize },
}

impl ParameterKind {
    /// Number of wire slots.
    pub const fn arity(&self) -> usize {
        match self {
            ParameterKind::List { arity, .. } => *arity,
            _ => 1,
        }
    }

    /// Kind of each slot. Enumerations travel as integers.
    pub const fn scalar_kind(&self) -> ScalarKind {
        match self {
            ParameterKind::Float => ScalarKind::Float,
            ParameterKind::Long | ParameterKind::Enum { .. } => ScalarKind::Long,
            ParameterKind::Buffer => ScalarKind::Buffer,
            ParameterKind::List { element, .. } => *element,
        }
    }

    /// Option strings for enumerations, empty otherwise.
    pub const fn options(&self) -> &'static [&'static str] {
        match self {
            ParameterKind::Enum { options } => options,
            _ => &[],
        }
    }
}

/// Relation a parameter's numeric slots must satisfy.
///
/// Constraints on list parameters apply to every numeric slot. Cross-parameter
/// constraints compare against the first slot of the referenced parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Lower bound.
    Min(f64),
    /// Upper bound.
    Max(f64),
    /// Must be >= the parameter at this index.
    AtLeast(usize),
    /// Must be <= the parameter at this index.
    AtMost(usize),
}

/// Metadata describing one parameter.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// Identifier, also the attribute name once lower-cased.
    pub name: &'static str,
    /// Human-readable label.
    pub display_name: &'static str,
    pub kind: ParameterKind,
    pub default: ParameterValue,
    /// Bound from positional construction arguments.
    pub fixed: bool,
    pub constraints: Vec<Constraint>,
}

impl ParameterDescriptor {
    fn with_kind(
        name: &'static str,
        display_name: &'static str,
        kind: ParameterKind,
        default: ParameterValue,
    ) -> Self {
        Self {
            name,
            display_name,
            kind,
            default,
            fixed: false,
            constraints: Vec::new(),
        }
    }

    pub fn float(name: &'static str, display_name: &'static str, default: f64) -> Self {
        Self::with_kind(name, display_name, ParameterKind::Float, ParameterValue::Float(default))
    }

    pub fn long(name: &'static str, display_name: &'static str, default: i64) -> Self {
        Self::with_kind(name, display_name, ParameterKind::Long, ParameterValue::Long(default))
    }

    /// Enumerated parameter over `options`, defaulting to `default_index`.
    pub fn enumeration(
        name: &'static str,
        display_name: &'static str,
        default_index: usize,
        options: &'static [&'static str],
    ) -> Self {
        Self::with_kind(
            name,
            display_name,
            ParameterKind::Enum { options },
            ParameterValue::Long(default_index as i64),
        )
    }

    /// Enumerated parameter whose options come from an [`EnumChoice`] type.
    pub fn choice<E: EnumChoice>(name: &'static str, display_name: &'static str) -> Self {
        Self::enumeration(name, display_name, E::DEFAULT_INDEX, E::names())
    }

    /// Resource-handle parameter, null by default.
    pub fn buffer(name: &'static str, display_name: &'static str) -> Self {
        Self::with_kind(name, display_name, ParameterKind::Buffer, ParameterValue::Buffer(None))
    }

    /// Fixed-length float list; the arity is `defaults.len()`.
    pub fn float_list(name: &'static str, display_name: &'static str, defaults: &[f64]) -> Self {
        Self::with_kind(
            name,
            display_name,
            ParameterKind::List { element: ScalarKind::Float, arity: defaults.len() },
            ParameterValue::List(defaults.iter().map(|v| Scalar::Float(*v)).collect()),
        )
    }

    /// Fixed-length integer list; the arity is `defaults.len()`.
    pub fn long_list(name: &'static str, display_name: &'static str, defaults: &[i64]) -> Self {
        Self::with_kind(
            name,
            display_name,
            ParameterKind::List { element: ScalarKind::Long, arity: defaults.len() },
            ParameterValue::List(defaults.iter().map(|v| Scalar::Long(*v)).collect()),
        )
    }

    /// Mark as a positional construction parameter.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.constraints.push(Constraint::Min(min));
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.constraints.push(Constraint::Max(max));
        self
    }

    /// Keep this parameter >= the parameter at `index`.
    pub fn at_least(mut self, index: usize) -> Self {
        self.constraints.push(Constraint::AtLeast(index));
        self
    }

    /// Keep this parameter <= the parameter at `index`.
    pub fn at_most(mut self, index: usize) -> Self {
        self.constraints.push(Constraint::AtMost(index));
        self
    }

    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    /// Lower-cased name used for the host attribute.
    pub fn attribute_name(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_and_defaults() {
        let list = ParameterDescriptor::long_list("FFTSettings", "FFT", &[1024, -1, -1]);
        assert_eq!(list.arity(), 3);
        assert!(list.default.matches(&list.kind));
        assert_eq!(list.attribute_name(), "fftsettings");

        let buffer = ParameterDescriptor::buffer("source", "Source");
        assert_eq!(buffer.arity(), 1);
        assert_eq!(buffer.kind.scalar_kind(), ScalarKind::Buffer);
    }

    #[test]
    fn test_enumeration_options() {
        let mode = ParameterDescriptor::enumeration("mode", "Mode", 1, &["fast", "slow"]);
        assert_eq!(mode.kind.options(), &["fast", "slow"]);
        assert_eq!(mode.kind.scalar_kind(), ScalarKind::Long);
        assert_eq!(mode.default, ParameterValue::Long(1));
    }
}
