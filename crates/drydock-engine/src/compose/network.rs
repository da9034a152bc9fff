//! Network resolution
//!
//! The shared VPC is either bound by id lookup or declared fresh. Either way
//! a network stack is emitted, so every downstream stack can record its
//! dependency on the network the same way.

use crate::declaration::{ResourceDeclaration, ResourceKind};
use crate::engine::ProvisionEngine;
use crate::error::Result;
use crate::stack::Stack;
use drydock_core::{DeployConfig, NetworkRef, NetworkSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Properties of a binding to an existing VPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcLookupProperties {
    pub vpc_id: String,
    pub cidr_block: Option<String>,
}

/// Resolve the shared network
///
/// A non-empty configured VPC id is looked up through the engine; lookup
/// failure propagates unrecovered. An empty id declares a new VPC instead.
pub async fn resolve(
    cfg: &DeployConfig,
    engine: &dyn ProvisionEngine,
) -> Result<(Stack, NetworkRef)> {
    let stack_name = cfg.network_stack_name();
    let stack = Stack::new(&stack_name, cfg.tags(), cfg.placement());

    match NetworkSource::from_config(cfg) {
        NetworkSource::Lookup { vpc_id } => {
            let attrs = engine.lookup_network(&vpc_id).await?;
            debug!("Bound to existing network {}", attrs.vpc_id);
            let stack = stack.with_resource(ResourceDeclaration::new(
                ResourceKind::VpcLookup,
                "vpc-lookup",
                &VpcLookupProperties {
                    vpc_id: attrs.vpc_id.clone(),
                    cidr_block: attrs.cidr_block,
                },
            )?);
            Ok((stack, NetworkRef::existing(&stack_name, attrs.vpc_id)))
        }
        NetworkSource::Declare(spec) => {
            debug!("Declaring new network {}", spec.name);
            let stack =
                stack.with_resource(ResourceDeclaration::new(ResourceKind::Vpc, "vpc", &spec)?);
            Ok((stack, NetworkRef::declared(&stack_name, "vpc")))
        }
    }
}
