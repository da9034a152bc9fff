//! Cluster provisioning

use crate::declaration::{ResourceDeclaration, ResourceKind};
use crate::error::Result;
use crate::stack::Stack;
use drydock_core::{ClusterRef, ClusterSpec, DeployConfig, NetworkRef};
use serde::{Deserialize, Serialize};

/// Properties of the declared ECS cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterProperties {
    pub name: String,
    /// Network the cluster's tasks run in
    pub network: NetworkRef,
}

/// Declare the shared ECS cluster bound to the resolved network
pub fn provision(cfg: &DeployConfig, network: &NetworkRef) -> Result<(Stack, ClusterRef)> {
    let spec = ClusterSpec::for_config(cfg);
    let stack_name = cfg.cluster_stack_name();

    let stack = Stack::new(&stack_name, cfg.tags(), cfg.placement())
        .with_dependency(&network.stack)
        .with_resource(ResourceDeclaration::new(
            ResourceKind::EcsCluster,
            "cluster",
            &ClusterProperties {
                name: spec.name.clone(),
                network: network.clone(),
            },
        )?);

    let cluster = ClusterRef {
        stack: stack_name,
        logical_id: "cluster".to_string(),
        name: spec.name,
    };
    Ok((stack, cluster))
}
