//! Provisioning engine trait definition

use crate::error::Result;
use crate::stack::{Stack, StackHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provisioning engine abstraction
///
/// The engine owns diffing, physical create/update/delete and rollback.
/// This repository only composes declarations and submits them: `declare`
/// records intent and never waits for physical provisioning.
#[async_trait]
pub trait ProvisionEngine: Send + Sync {
    /// Returns the engine name (e.g., "local", "aws")
    fn name(&self) -> &str;

    /// Returns the engine display name for output
    fn display_name(&self) -> &str;

    /// Check if the engine can reach its backend with valid credentials
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Look up an existing network by provider id
    async fn lookup_network(&self, vpc_id: &str) -> Result<NetworkAttributes>;

    /// Submit one stack of declarations
    async fn declare(&self, stack: &Stack) -> Result<StackHandle>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Attributes of a network found by lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttributes {
    pub vpc_id: String,

    /// CIDR block when the backend reports one
    pub cidr_block: Option<String>,
}
