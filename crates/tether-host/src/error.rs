//! Error types for host dispatch.

use tether_core::CoreError;

/// Errors returned when the host drives a wrapped object.
#[derive(Debug, Clone, PartialEq)]
pub enum WrapperError {
    /// No attribute with this name.
    UnknownAttribute(String),
    /// The attribute cannot be set.
    ReadOnlyAttribute(String),
    /// The class does not understand this message.
    UnknownMessage(String),
    /// The operation needs a capability the class does not have.
    Unsupported(&'static str),
    /// Saved state could not be written or read.
    State(String),
    /// Two classes registered under one name.
    DuplicateClass(String),
    /// No class registered under this name.
    UnknownClass(String),
    /// The process-wide registry was installed already.
    AlreadyInstalled,
    /// Misuse of the parameter model.
    Parameter(CoreError),
}

impl std::fmt::Display for WrapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAttribute(name) => write!(f, "unknown attribute '{name}'"),
            Self::ReadOnlyAttribute(name) => write!(f, "attribute '{name}' is read-only"),
            Self::UnknownMessage(name) => write!(f, "no method for '{name}'"),
            Self::Unsupported(what) => write!(f, "{what} is not supported by this class"),
            Self::State(msg) => write!(f, "state error: {msg}"),
            Self::DuplicateClass(name) => write!(f, "class '{name}' registered twice"),
            Self::UnknownClass(name) => write!(f, "no class named '{name}'"),
            Self::AlreadyInstalled => write!(f, "class registry already installed"),
            Self::Parameter(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WrapperError {}

impl From<CoreError> for WrapperError {
    fn from(err: CoreError) -> Self {
        Self::Parameter(err)
    }
}

impl From<serde_json::Error> for WrapperError {
    fn from(err: serde_json::Error) -> Self {
        Self::State(err.to_string())
    }
}

/// Result type for host dispatch.
pub type WrapperResult<T> = std::result::Result<T, WrapperError>;
