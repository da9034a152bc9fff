//! Stack composition
//!
//! Builds the five deployment stacks from one configuration record, checks
//! the dependency graph and submits the stacks in topological order.

pub mod cluster;
pub mod datastore;
pub mod network;
pub mod service;

use crate::engine::ProvisionEngine;
use crate::error::{ProvisionError, Result};
use crate::graph::DependencyGraph;
use crate::stack::{Manifest, StackHandle};
use drydock_core::{DeployConfig, NetworkRef, ServiceSpec};
use tracing::info;

/// Everything a composition run produced
#[derive(Debug)]
pub struct Deployment {
    /// The composed stacks, in composition order
    pub manifest: Manifest,

    /// Engine handle per declared stack, in declaration order
    pub handles: Vec<StackHandle>,

    /// The network every stack was bound to
    pub network: NetworkRef,
}

/// Compose all stacks and declare them through the engine
///
/// Resolution order is fixed: network, cluster, UI service, API service,
/// datastore. References only ever flow downstream, so the graph is a DAG;
/// a cycle or an unknown dependency is a composition bug and aborts the run.
pub async fn compose(cfg: &DeployConfig, engine: &dyn ProvisionEngine) -> Result<Deployment> {
    info!(
        "Composing stacks for {} via {}",
        cfg.stack_name,
        engine.display_name()
    );

    let (network_stack, network) = network::resolve(cfg, engine).await?;
    let (cluster_stack, cluster) = cluster::provision(cfg, &network)?;
    let ui_stack = service::stack(cfg, &ServiceSpec::ui(cfg), &cluster, &network)?;
    let api_stack = service::stack(cfg, &ServiceSpec::api(cfg), &cluster, &network)?;
    let db_stack = datastore::stack(cfg, &network)?;

    let mut manifest = Manifest::new(&cfg.stack_name, &cfg.environment);
    for stack in [network_stack, cluster_stack, ui_stack, api_stack, db_stack] {
        manifest.push(stack);
    }

    let graph = DependencyGraph::from_stacks(&manifest.stacks)?;
    let order = graph.topo_order()?;

    let mut handles = Vec::with_capacity(order.len());
    for name in &order {
        let stack = manifest.stack(name).ok_or_else(|| {
            ProvisionError::ManifestError(format!("Composed stack disappeared: {name}"))
        })?;
        info!(
            "Declaring stack {} ({} resources)",
            stack.name,
            stack.resources.len()
        );
        handles.push(engine.declare(stack).await?);
    }

    info!("Declared {}", manifest.summary());
    Ok(Deployment {
        manifest,
        handles,
        network,
    })
}
