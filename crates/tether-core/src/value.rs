//! Runtime parameter values.
//!
//! Every parameter value is, from the host's point of view, a fixed-length
//! sequence of scalar slots. Scalar kinds read and write one slot; list
//! kinds carry `arity` slots of a single element kind.

use std::fmt;
use std::sync::Arc;

use crate::buffer::SharedBuffer;
use crate::descriptor::{ParameterKind, ScalarKind};

/// One slot of a parameter value.
#[derive(Clone)]
pub enum Scalar {
    Float(f64),
    Long(i64),
    /// Reference to a host buffer, or null.
    Buffer(Option<SharedBuffer>),
}

impl Scalar {
    /// Zero value for a scalar kind (null for buffers).
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Float => Scalar::Float(0.0),
            ScalarKind::Long => Scalar::Long(0),
            ScalarKind::Buffer => Scalar::Buffer(None),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Long(_) => ScalarKind::Long,
            Scalar::Buffer(_) => ScalarKind::Buffer,
        }
    }

    /// Numeric view of the slot. `None` for buffers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            Scalar::Long(v) => Some(*v as f64),
            Scalar::Buffer(_) => None,
        }
    }

    /// Clamp into `lower..=upper`, upper bound first, keeping the slot kind.
    ///
    /// Integer slots are compared in the integer domain against the
    /// innermost integers of the bounds, and are only rewritten when out of
    /// range. Buffers are left alone.
    pub(crate) fn clamp(&self, lower: Option<f64>, upper: Option<f64>) -> Self {
        match self {
            Scalar::Float(v) => {
                let mut clamped = *v;
                if let Some(upper) = upper {
                    clamped = clamped.min(upper);
                }
                if let Some(lower) = lower {
                    clamped = clamped.max(lower);
                }
                Scalar::Float(clamped)
            }
            Scalar::Long(v) => {
                let mut clamped = *v;
                if let Some(upper) = upper.filter(|u| !u.is_nan()) {
                    // `as` saturates, so infinite bounds map to i64::MIN/MAX
                    clamped = clamped.min(upper.floor() as i64);
                }
                if let Some(lower) = lower.filter(|l| !l.is_nan()) {
                    clamped = clamped.max(lower.ceil() as i64);
                }
                Scalar::Long(clamped)
            }
            Scalar::Buffer(b) => Scalar::Buffer(b.clone()),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            (Scalar::Long(a), Scalar::Long(b)) => a == b,
            (Scalar::Buffer(a), Scalar::Buffer(b)) => same_buffer(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Float(v) => write!(f, "Float({})", v),
            Scalar::Long(v) => write!(f, "Long({})", v),
            Scalar::Buffer(Some(b)) => write!(f, "Buffer({})", b.name()),
            Scalar::Buffer(None) => f.write_str("Buffer(null)"),
        }
    }
}

/// Buffers compare by identity: two values are equal only when they hold the
/// same binding.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Long(v) => write!(f, "{}", v),
            Scalar::Buffer(Some(b)) => write!(f, "{}", b.name()),
            Scalar::Buffer(None) => f.write_str(crate::atom::NONE_SYMBOL),
        }
    }
}

fn same_buffer(a: &Option<SharedBuffer>, b: &Option<SharedBuffer>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Current value of one parameter, matching its descriptor's kind.
#[derive(Clone)]
pub enum ParameterValue {
    Float(f64),
    /// Integer or enumeration index.
    Long(i64),
    Buffer(Option<SharedBuffer>),
    /// Fixed-length list of scalars.
    List(Vec<Scalar>),
}

impl ParameterValue {
    /// Whether this value has the shape required by `kind`.
    pub fn matches(&self, kind: &ParameterKind) -> bool {
        match (self, kind) {
            (ParameterValue::Float(_), ParameterKind::Float) => true,
            (ParameterValue::Long(_), ParameterKind::Long | ParameterKind::Enum { .. }) => true,
            (ParameterValue::Buffer(_), ParameterKind::Buffer) => true,
            (ParameterValue::List(items), ParameterKind::List { element, arity }) => {
                items.len() == *arity && items.iter().all(|s| s.kind() == *element)
            }
            _ => false,
        }
    }

    /// Number of slots this value occupies on the wire.
    pub fn arity(&self) -> usize {
        match self {
            ParameterValue::List(items) => items.len(),
            _ => 1,
        }
    }

    /// Slot `index`, or `None` if out of range.
    pub fn slot(&self, index: usize) -> Option<Scalar> {
        match (self, index) {
            (ParameterValue::Float(v), 0) => Some(Scalar::Float(*v)),
            (ParameterValue::Long(v), 0) => Some(Scalar::Long(*v)),
            (ParameterValue::Buffer(b), 0) => Some(Scalar::Buffer(b.clone())),
            (ParameterValue::List(items), i) => items.get(i).cloned(),
            _ => None,
        }
    }

    /// All slots in order.
    pub fn to_slots(&self) -> Vec<Scalar> {
        match self {
            ParameterValue::List(items) => items.clone(),
            _ => self.slot(0).into_iter().collect(),
        }
    }

    /// Rebuild a value of `kind` from slots.
    ///
    /// Returns `None` when the slot count or slot kinds do not fit `kind`.
    pub fn from_slots(kind: &ParameterKind, slots: Vec<Scalar>) -> Option<Self> {
        let value = match kind {
            ParameterKind::List { .. } => ParameterValue::List(slots),
            _ => {
                if slots.len() != 1 {
                    return None;
                }
                match slots.into_iter().next()? {
                    Scalar::Float(v) => ParameterValue::Float(v),
                    Scalar::Long(v) => ParameterValue::Long(v),
                    Scalar::Buffer(b) => ParameterValue::Buffer(b),
                }
            }
        };
        value.matches(kind).then_some(value)
    }

    /// Numeric view of a scalar value. `None` for buffers and lists.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ParameterValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// The referenced buffer, if this is a non-null resource handle.
    pub fn as_buffer(&self) -> Option<&SharedBuffer> {
        match self {
            ParameterValue::Buffer(b) => b.as_ref(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            ParameterValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for ParameterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParameterValue::Float(a), ParameterValue::Float(b)) => a == b,
            (ParameterValue::Long(a), ParameterValue::Long(b)) => a == b,
            (ParameterValue::Buffer(a), ParameterValue::Buffer(b)) => same_buffer(a, b),
            (ParameterValue::List(a), ParameterValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Float(v) => write!(f, "Float({})", v),
            ParameterValue::Long(v) => write!(f, "Long({})", v),
            ParameterValue::Buffer(b) => fmt::Debug::fmt(&Scalar::Buffer(b.clone()), f),
            ParameterValue::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}
