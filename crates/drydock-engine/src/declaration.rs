//! Typed resource declarations
//!
//! A declaration names a resource kind, a stack-unique logical id and the
//! kind-specific properties serialized from the spec types in
//! `drydock-core`. Declarations record intent; nothing physical happens
//! until an engine accepts them.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Kinds of resources this repository declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Vpc,
    /// Binding to an existing VPC found by lookup
    VpcLookup,
    EcsCluster,
    EcrRepository,
    FargateService,
    LogBucket,
    AutoscalePolicy,
    SecurityGroup,
    Secret,
    DatabaseInstance,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::VpcLookup => "vpc-lookup",
            ResourceKind::EcsCluster => "ecs-cluster",
            ResourceKind::EcrRepository => "ecr-repository",
            ResourceKind::FargateService => "fargate-service",
            ResourceKind::LogBucket => "log-bucket",
            ResourceKind::AutoscalePolicy => "autoscale-policy",
            ResourceKind::SecurityGroup => "security-group",
            ResourceKind::Secret => "secret",
            ResourceKind::DatabaseInstance => "database-instance",
        };
        f.pad(name)
    }
}

/// One declared resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    /// Identifier unique within the enclosing stack
    pub logical_id: String,

    pub kind: ResourceKind,

    /// Kind-specific properties, serialized from the spec types
    pub properties: serde_json::Value,

    /// Logical ids this resource must be declared after, within its stack
    pub depends_on: Vec<String>,
}

impl ResourceDeclaration {
    pub fn new(
        kind: ResourceKind,
        logical_id: impl Into<String>,
        properties: &impl Serialize,
    ) -> Result<Self> {
        Ok(Self {
            logical_id: logical_id.into(),
            kind,
            properties: serde_json::to_value(properties)?,
            depends_on: Vec::new(),
        })
    }

    pub fn with_dependency(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// Deserialize the properties back into a spec type
    pub fn properties_as<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.properties.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_matches_serde() {
        for kind in [
            ResourceKind::Vpc,
            ResourceKind::VpcLookup,
            ResourceKind::EcsCluster,
            ResourceKind::EcrRepository,
            ResourceKind::FargateService,
            ResourceKind::LogBucket,
            ResourceKind::AutoscalePolicy,
            ResourceKind::SecurityGroup,
            ResourceKind::Secret,
            ResourceKind::DatabaseInstance,
        ] {
            let serialized = serde_json::to_value(kind).unwrap();
            assert_eq!(serialized, serde_json::json!(kind.to_string()));
        }
    }

    #[test]
    fn test_properties_round_trip() {
        let spec = drydock_core::VpcSpec::named("app-vpc");
        let decl = ResourceDeclaration::new(ResourceKind::Vpc, "vpc", &spec).unwrap();
        assert_eq!(decl.properties_as::<drydock_core::VpcSpec>().unwrap(), spec);
    }
}
