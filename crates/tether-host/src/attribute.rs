//! Host attributes generated from parameter descriptors.
//!
//! Each class builds one [`AttributeTable`] at registration. Every parameter
//! becomes an attribute named after its lower-cased identifier; the table
//! also carries the built-in `latency` (real-time classes only) and
//! `warnings` attributes.
//!
//! # Conversion
//!
//! Hosts see every parameter as a fixed-length run of atoms. Each entry
//! carries a [`SlotConverter`] chosen from the parameter's scalar kind:
//!
//! | Kind    | Atom in                           | Atom out               |
//! |---------|-----------------------------------|------------------------|
//! | Float   | any numeric atom                  | `Float`                |
//! | Long    | any numeric atom (truncated)      | `Long`                 |
//! | Buffer  | symbol, bound through the host    | buffer name or `none`  |
//!
//! Enumerations and lists reuse the converter of their slot kind.

use tether_core::config::{LATENCY_ATTRIBUTE, WARNINGS_ATTRIBUTE};
use tether_core::{
    Atom, ParameterDescriptor, ParameterKind, ParameterValue, Scalar, ScalarKind, Symbol,
};

use crate::host::Host;

// =========================================================================
// Slot conversion
// =========================================================================

/// Convert-in / convert-out pair for one slot kind.
#[derive(Debug, Clone, Copy)]
pub struct SlotConverter {
    pub from_atom: fn(&Atom, &dyn Host) -> Scalar,
    pub to_atom: fn(&Scalar) -> Atom,
}

impl SlotConverter {
    pub fn for_kind(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Float => Self {
                from_atom: float_from_atom,
                to_atom: float_to_atom,
            },
            ScalarKind::Long => Self {
                from_atom: long_from_atom,
                to_atom: long_to_atom,
            },
            ScalarKind::Buffer => Self {
                from_atom: buffer_from_atom,
                to_atom: buffer_to_atom,
            },
        }
    }
}

fn float_from_atom(atom: &Atom, _host: &dyn Host) -> Scalar {
    Scalar::Float(atom.as_float())
}

fn long_from_atom(atom: &Atom, _host: &dyn Host) -> Scalar {
    Scalar::Long(atom.as_long())
}

/// A symbol binds a fresh reference; `none` or a number clears it.
fn buffer_from_atom(atom: &Atom, host: &dyn Host) -> Scalar {
    let buffer = atom
        .as_symbol()
        .filter(|name| !name.is_none_marker())
        .map(|name| host.bind_buffer(name));
    Scalar::Buffer(buffer)
}

fn float_to_atom(scalar: &Scalar) -> Atom {
    Atom::Float(scalar.as_f64().unwrap_or(0.0))
}

fn long_to_atom(scalar: &Scalar) -> Atom {
    match scalar {
        Scalar::Long(v) => Atom::Long(*v),
        other => Atom::Long(other.as_f64().unwrap_or(0.0) as i64),
    }
}

fn buffer_to_atom(scalar: &Scalar) -> Atom {
    match scalar {
        Scalar::Buffer(Some(buffer)) => Atom::Symbol(buffer.name().clone()),
        _ => Atom::Symbol(Symbol::none()),
    }
}

// =========================================================================
// AttributeInfo
// =========================================================================

/// Value type the host declares for an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Float64,
    Long,
    Symbol,
    /// Mixed or multi-valued.
    Atom,
}

/// Display hint for host inspectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeStyle {
    Plain,
    /// Menu of option strings.
    Enum,
    /// Toggle.
    OnOff,
}

/// What an attribute reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTarget {
    Parameter(usize),
    Latency,
    Warnings,
}

/// One host-visible attribute.
#[derive(Debug, Clone)]
pub struct AttributeInfo {
    /// Lower-cased host name.
    pub name: String,
    pub label: &'static str,
    pub target: AttributeTarget,
    pub value_type: AttributeType,
    pub style: AttributeStyle,
    /// Number of atoms produced by the getter.
    pub arity: usize,
    pub read_only: bool,
    /// Option strings of enumerated parameters.
    pub options: &'static [&'static str],
    /// Inclusive range values are clipped to, if any.
    pub clip: Option<(i64, i64)>,
    converter: SlotConverter,
}

impl AttributeInfo {
    fn parameter(index: usize, descriptor: &ParameterDescriptor) -> Self {
        let (value_type, style) = match descriptor.kind {
            ParameterKind::Float => (AttributeType::Float64, AttributeStyle::Plain),
            ParameterKind::Long => (AttributeType::Long, AttributeStyle::Plain),
            ParameterKind::Enum { .. } => (AttributeType::Long, AttributeStyle::Enum),
            ParameterKind::Buffer => (AttributeType::Symbol, AttributeStyle::Plain),
            ParameterKind::List { .. } => (AttributeType::Atom, AttributeStyle::Plain),
        };
        Self {
            name: descriptor.attribute_name(),
            label: descriptor.display_name,
            target: AttributeTarget::Parameter(index),
            value_type,
            style,
            arity: descriptor.arity(),
            read_only: false,
            options: descriptor.kind.options(),
            clip: None,
            converter: SlotConverter::for_kind(descriptor.kind.scalar_kind()),
        }
    }

    fn latency() -> Self {
        Self {
            name: LATENCY_ATTRIBUTE.to_string(),
            label: "Latency",
            target: AttributeTarget::Latency,
            value_type: AttributeType::Long,
            style: AttributeStyle::Plain,
            arity: 1,
            read_only: true,
            options: &[],
            clip: None,
            converter: SlotConverter::for_kind(ScalarKind::Long),
        }
    }

    fn warnings() -> Self {
        Self {
            name: WARNINGS_ATTRIBUTE.to_string(),
            label: "Report Warnings",
            target: AttributeTarget::Warnings,
            value_type: AttributeType::Long,
            style: AttributeStyle::OnOff,
            arity: 1,
            read_only: false,
            options: &[],
            clip: Some((0, 1)),
            converter: SlotConverter::for_kind(ScalarKind::Long),
        }
    }

    /// Convert host atoms into a value for `descriptor`.
    ///
    /// Present atoms fill slots in order; missing trailing slots take the
    /// descriptor default. Atoms beyond the arity are ignored.
    pub fn decode(&self, descriptor: &ParameterDescriptor, atoms: &[Atom], host: &dyn Host) -> ParameterValue {
        let mut slots = descriptor.default.to_slots();
        for (slot, atom) in slots.iter_mut().zip(atoms) {
            *slot = (self.converter.from_atom)(atom, host);
        }
        ParameterValue::from_slots(&descriptor.kind, slots)
            .unwrap_or_else(|| descriptor.default.clone())
    }

    /// Convert a value into exactly `arity` host atoms.
    pub fn encode(&self, value: &ParameterValue) -> Vec<Atom> {
        (0..self.arity)
            .map(|i| match value.slot(i) {
                Some(slot) => (self.converter.to_atom)(&slot),
                None => Atom::Long(0),
            })
            .collect()
    }
}

// =========================================================================
// AttributeTable
// =========================================================================

/// Attribute registrations of one class, built once from its descriptors.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    entries: Vec<AttributeInfo>,
}

impl AttributeTable {
    /// Build the table: `latency` (if `real_time`), `warnings`, then one
    /// entry per parameter in descriptor order.
    pub fn build(descriptors: &[ParameterDescriptor], real_time: bool) -> Self {
        let mut entries = Vec::with_capacity(descriptors.len() + 2);
        if real_time {
            entries.push(AttributeInfo::latency());
        }
        entries.push(AttributeInfo::warnings());
        entries.extend(
            descriptors
                .iter()
                .enumerate()
                .map(|(index, descriptor)| AttributeInfo::parameter(index, descriptor)),
        );
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeInfo> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeInfo> {
        self.entries.iter()
    }

    /// Attributes backed by parameters, in descriptor order.
    pub fn parameters(&self) -> impl Iterator<Item = (usize, &AttributeInfo)> {
        self.entries.iter().filter_map(|entry| match entry.target {
            AttributeTarget::Parameter(index) => Some((index, entry)),
            _ => None,
        })
    }

    pub fn has_latency(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.target == AttributeTarget::Latency)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
