//! Provisioning error types

use thiserror::Error;

/// Errors surfaced while composing or declaring stacks
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("Invalid declaration {logical_id} in stack {stack}: {reason}")]
    InvalidDeclaration {
        stack: String,
        logical_id: String,
        reason: String,
    },

    #[error("Duplicate resource {logical_id} in stack {stack}")]
    DuplicateResource { stack: String, logical_id: String },

    #[error("Duplicate stack: {0}")]
    DuplicateStack(String),

    #[error("Stack {stack} depends on undeclared stack: {dependency}")]
    MissingDependency { stack: String, dependency: String },

    #[error("Cyclic dependency among stacks: {0}")]
    CyclicDependency(String),

    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
