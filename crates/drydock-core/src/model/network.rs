//! Shared network model
//!
//! The network is either looked up by provider id or declared fresh; every
//! downstream component receives the same opaque `NetworkRef` and may not
//! mutate the network it points at.

use crate::config::DeployConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VPC_CIDR: &str = "10.0.0.0/16";
pub const DEFAULT_VPC_MAX_AZS: u32 = 2;

/// Specification for a VPC declared by this deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcSpec {
    pub name: String,
    pub cidr: String,
    pub max_azs: u32,
}

impl VpcSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cidr: DEFAULT_VPC_CIDR.to_string(),
            max_azs: DEFAULT_VPC_MAX_AZS,
        }
    }
}

/// How the shared network is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSource {
    /// Bind to an existing VPC known to the target environment.
    Lookup { vpc_id: String },
    /// Declare a new VPC.
    Declare(VpcSpec),
}

impl NetworkSource {
    pub fn from_config(cfg: &DeployConfig) -> Self {
        if cfg.vpc_id.is_empty() {
            NetworkSource::Declare(VpcSpec::named(&cfg.vpc_name))
        } else {
            NetworkSource::Lookup {
                vpc_id: cfg.vpc_id.clone(),
            }
        }
    }
}

/// Opaque handle to the resolved network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRef {
    /// Stack that resolved or declared the network.
    pub stack: String,
    pub binding: NetworkBinding,
}

/// What the handle points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum NetworkBinding {
    /// Existing VPC found by id lookup.
    Existing { vpc_id: String },
    /// VPC declared in this deployment; the engine assigns the physical id.
    Declared { logical_id: String },
}

impl NetworkRef {
    pub fn existing(stack: impl Into<String>, vpc_id: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            binding: NetworkBinding::Existing {
                vpc_id: vpc_id.into(),
            },
        }
    }

    pub fn declared(stack: impl Into<String>, logical_id: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            binding: NetworkBinding::Declared {
                logical_id: logical_id.into(),
            },
        }
    }

    /// Provider id, when the network already exists.
    pub fn vpc_id(&self) -> Option<&str> {
        match &self.binding {
            NetworkBinding::Existing { vpc_id } => Some(vpc_id),
            NetworkBinding::Declared { .. } => None,
        }
    }
}
