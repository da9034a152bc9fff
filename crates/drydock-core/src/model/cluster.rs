//! ECS cluster model

use crate::config::DeployConfig;
use serde::{Deserialize, Serialize};

/// Specification for the shared ECS cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub name: String,
}

impl ClusterSpec {
    pub fn for_config(cfg: &DeployConfig) -> Self {
        Self {
            name: cfg.cluster_stack_name(),
        }
    }
}

/// Handle to the declared cluster, referenced by every service stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRef {
    /// Stack the cluster was declared in.
    pub stack: String,
    pub logical_id: String,
    pub name: String,
}
