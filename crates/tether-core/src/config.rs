//! Class configuration.
//!
//! # Example
//!
//! ```ignore
//! use tether_core::ClassConfig;
//!
//! pub static CONFIG: ClassConfig = ClassConfig::new("peakfollow~")
//!     .with_label("Peak Follower")
//!     .with_warnings(true);
//! ```

// =========================================================================
// Built-in attribute names
// =========================================================================

/// Read-only attribute reporting the client's processing latency.
pub const LATENCY_ATTRIBUTE: &str = "latency";

/// Attribute toggling whether warnings are posted.
pub const WARNINGS_ATTRIBUTE: &str = "warnings";

/// Message restoring the construction snapshot.
pub const RESET_MESSAGE: &str = "reset";

/// Message triggering a deferred batch run.
pub const BANG_MESSAGE: &str = "bang";

/// Message emitting every attribute value on the dump egress.
pub const DUMP_MESSAGE: &str = "dump";

// =========================================================================
// ClassConfig
// =========================================================================

/// Static configuration of one host-visible class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassConfig {
    /// Name the host registers the class under.
    pub name: &'static str,
    /// Human-readable label, used in log lines.
    pub label: &'static str,
    /// Initial value of the `warnings` attribute, which gates whether
    /// diagnostics reach the host. Off unless enabled.
    pub warnings: bool,
}

impl ClassConfig {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            label: name,
            warnings: false,
        }
    }

    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub const fn with_warnings(mut self, warnings: bool) -> Self {
        self.warnings = warnings;
        self
    }
}
