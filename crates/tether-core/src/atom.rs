//! Host wire values.
//!
//! Hosts exchange untyped [`Atom`]s: integers, floats and interned symbols.
//! Conversions follow the usual host conventions: numeric atoms convert into
//! each other, and anything that is not numeric reads as zero.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Marker emitted for a resource-handle parameter that holds no reference.
pub const NONE_SYMBOL: &str = "none";

/// Prefix that introduces a named attribute in construction arguments.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Interned host symbol.
///
/// Cloning is cheap (reference counted), equality compares the text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a symbol from text.
    pub fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    /// The canonical "no reference" marker.
    pub fn none() -> Self {
        Self::new(NONE_SYMBOL)
    }

    /// Get the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the canonical "no reference" marker.
    pub fn is_none_marker(&self) -> bool {
        &*self.0 == NONE_SYMBOL
    }

    /// Returns true if this symbol names a construction attribute (`@name`).
    pub fn is_attribute_name(&self) -> bool {
        self.0.starts_with(ATTRIBUTE_PREFIX) && self.0.len() > 1
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Symbol {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

/// A single untyped host value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Atom {
    /// Integer value.
    Long(i64),
    /// Floating point value.
    Float(f64),
    /// Symbol (text) value.
    Symbol(Symbol),
}

impl Atom {
    /// Create a symbol atom.
    pub fn symbol(text: &str) -> Self {
        Atom::Symbol(Symbol::new(text))
    }

    /// Read as a float. Symbols read as `0.0`.
    pub fn as_float(&self) -> f64 {
        match self {
            Atom::Long(v) => *v as f64,
            Atom::Float(v) => *v,
            Atom::Symbol(_) => 0.0,
        }
    }

    /// Read as an integer. Floats truncate toward zero, symbols read as `0`.
    pub fn as_long(&self) -> i64 {
        match self {
            Atom::Long(v) => *v,
            Atom::Float(v) => *v as i64,
            Atom::Symbol(_) => 0,
        }
    }

    /// Read as a symbol, if this atom is one.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Atom::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this atom introduces a named attribute (`@name`).
    pub fn is_attribute_name(&self) -> bool {
        self.as_symbol().is_some_and(Symbol::is_attribute_name)
    }
}

impl From<f64> for Atom {
    fn from(v: f64) -> Self {
        Atom::Float(v)
    }
}

impl From<i64> for Atom {
    fn from(v: i64) -> Self {
        Atom::Long(v)
    }
}

impl From<&str> for Atom {
    fn from(text: &str) -> Self {
        Atom::symbol(text)
    }
}

impl From<Symbol> for Atom {
    fn from(s: Symbol) -> Self {
        Atom::Symbol(s)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Long(v) => write!(f, "{}", v),
            Atom::Float(v) => write!(f, "{}", v),
            Atom::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// Number of leading atoms that precede the first `@name` attribute.
///
/// Everything before that index is positional; everything from it onwards is
/// a sequence of `@name values...` groups.
pub fn attribute_args_offset(args: &[Atom]) -> usize {
    args.iter()
        .position(Atom::is_attribute_name)
        .unwrap_or(args.len())
}

/// Split `@name v1 v2 @other v3` into `(name, values)` groups.
///
/// Expects `args` to start at [`attribute_args_offset`]. Leading atoms that
/// do not follow a name are skipped.
pub fn attribute_groups(args: &[Atom]) -> Vec<(&str, &[Atom])> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let Some(name) = args[i].as_symbol().filter(|s| s.is_attribute_name()) else {
            i += 1;
            continue;
        };
        let start = i + 1;
        let end = args[start..]
            .iter()
            .position(Atom::is_attribute_name)
            .map_or(args.len(), |p| start + p);
        groups.push((&name.as_str()[ATTRIBUTE_PREFIX.len_utf8()..], &args[start..end]));
        i = end;
    }
    groups
}
