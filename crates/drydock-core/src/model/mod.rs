//! Resource specification types
//!
//! Specs are fully populated before declaration and never mutated after;
//! binding between them (which network a service joins, which secret a
//! database reads) happens at composition time in `drydock-engine`.

pub mod cluster;
pub mod datastore;
pub mod network;
pub mod service;

use serde::{Deserialize, Serialize};

/// What happens to the physical resource when its declaration is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Keep the resource and orphan it.
    Retain,
    /// Delete the resource with the declaration.
    Destroy,
}

impl std::fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalPolicy::Retain => write!(f, "retain"),
            RemovalPolicy::Destroy => write!(f, "destroy"),
        }
    }
}
