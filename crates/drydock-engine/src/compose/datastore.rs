//! Datastore stack composition
//!
//! Credential secret, database security group and the MySQL instance. The
//! instance is declared after both satellites and references them by
//! logical id.

use crate::declaration::{ResourceDeclaration, ResourceKind};
use crate::error::Result;
use crate::stack::Stack;
use drydock_core::model::datastore::ANY_IPV4;
use drydock_core::{
    DataStoreSpec, DbExposure, DeployConfig, EgressRule, IngressRule, InstanceSettings, NetworkRef,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Properties of the database security group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupProperties {
    pub name: String,
    pub description: String,
    pub network: NetworkRef,
    pub ingress: Vec<IngressRule>,
    pub egress: Vec<EgressRule>,
}

/// Properties of the database instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseProperties {
    /// Environment-qualified database name
    pub db_name: String,

    #[serde(flatten)]
    pub instance: InstanceSettings,

    pub network: NetworkRef,

    /// Logical id of the security group guarding the instance
    pub security_group: String,

    /// Logical id of the credential secret
    pub credentials_secret: String,
}

/// Compose the datastore stack
pub fn stack(cfg: &DeployConfig, network: &NetworkRef) -> Result<Stack> {
    let spec = DataStoreSpec::from_config(cfg);

    if spec.exposure == DbExposure::PublicPort {
        warn!(
            "Database port {} is open to {}",
            spec.instance.port, ANY_IPV4
        );
    }

    let group_name = format!("{}-database", cfg.stack_name);
    let stack = Stack::new(cfg.datastore_stack_name(), cfg.tags(), cfg.placement())
        .with_dependency(&network.stack)
        .with_resource(ResourceDeclaration::new(
            ResourceKind::Secret,
            "db-credentials",
            &spec.credentials,
        )?)
        .with_resource(ResourceDeclaration::new(
            ResourceKind::SecurityGroup,
            "db-security-group",
            &SecurityGroupProperties {
                name: group_name.clone(),
                description: group_name,
                network: network.clone(),
                ingress: spec.ingress_rules(),
                egress: spec.egress_rules(),
            },
        )?)
        .with_resource(
            ResourceDeclaration::new(
                ResourceKind::DatabaseInstance,
                "database",
                &DatabaseProperties {
                    db_name: spec.db_name.clone(),
                    instance: spec.instance.clone(),
                    network: network.clone(),
                    security_group: "db-security-group".to_string(),
                    credentials_secret: "db-credentials".to_string(),
                },
            )?
            .with_dependency("db-credentials")
            .with_dependency("db-security-group"),
        );

    Ok(stack)
}
