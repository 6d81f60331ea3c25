//! Structured results of constraint checks and processing runs.
//!
//! An [`Outcome`] is always returned, never thrown. Only the adapter decides
//! whether and where to surface it.

use std::fmt;

/// Severity of an [`Outcome`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Error,
}

/// Tagged result: ok, warning with message, or error with message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Ok,
    /// Non-fatal: the value was applied or processing completed.
    Warning(String),
    /// Fatal for the operation: the set or run was aborted.
    Error(String),
}

impl Outcome {
    /// Create a warning outcome.
    pub fn warning(message: impl Into<String>) -> Self {
        Outcome::Warning(message.into())
    }

    /// Create an error outcome.
    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Error(message.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Ok => Status::Ok,
            Outcome::Warning(_) => Status::Warning,
            Outcome::Error(_) => Status::Error,
        }
    }

    /// Message text (empty for `Ok`).
    pub fn message(&self) -> &str {
        match self {
            Outcome::Ok => "",
            Outcome::Warning(m) | Outcome::Error(m) => m,
        }
    }

    /// Fold another outcome into this one.
    ///
    /// The more severe status wins; messages are joined with `"; "`.
    pub fn merge(&mut self, other: Outcome) {
        if other.is_ok() {
            return;
        }
        let status = self.status().max(other.status());
        let message = match (self.message(), other.message()) {
            ("", m) => m.to_string(),
            (a, b) => format!("{}; {}", a, b),
        };
        *self = match status {
            Status::Ok => Outcome::Ok,
            Status::Warning => Outcome::Warning(message),
            Status::Error => Outcome::Error(message),
        };
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => f.write_str("ok"),
            Outcome::Warning(m) => write!(f, "warning: {}", m),
            Outcome::Error(m) => write!(f, "error: {}", m),
        }
    }
}
