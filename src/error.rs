use std::fmt;

use crate::services::deployment::DeploymentError;
use crate::services::store::StoreError;

/// Registry-level error type
///
/// Covers the recoverable failures of agent CRUD. Rate-limit rejections and
/// stop-with-nothing-active are not errors; they come back as structured
/// results from their services.
#[derive(Debug)]
pub enum Error {
    /// Referenced agent or deployment is absent
    NotFound(String),
    /// Duplicate resource (agent name collision)
    Conflict(String),
    /// Malformed input, rejected before any mutation
    Validation(String),
}

impl Error {
    /// Stable machine-readable code for the transport layer
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NameExists(name) => {
                Self::Conflict(format!("Agent name already exists: {name}"))
            }
            StoreError::Validation(msg) => Self::Validation(msg),
        }
    }
}

impl From<DeploymentError> for Error {
    fn from(err: DeploymentError) -> Self {
        match err {
            DeploymentError::AgentNotFound(id) => {
                Self::NotFound(format!("Agent with ID '{id}' does not exist"))
            }
            conflict @ DeploymentError::AlreadyActive { .. } => {
                Self::Conflict(conflict.to_string())
            }
        }
    }
}
