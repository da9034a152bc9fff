//! Service stack composition
//!
//! One stack per service: its ECR repository, the access-log bucket, the
//! load-balanced Fargate service and its autoscaling policy.

use crate::declaration::{ResourceDeclaration, ResourceKind};
use crate::error::Result;
use crate::stack::Stack;
use drydock_core::{
    AutoscalePolicy, ClusterRef, DeployConfig, EcrRepositorySpec, LogBucketSpec, NetworkRef,
    ServiceSpec,
};
use serde::{Deserialize, Serialize};

/// Properties of a load-balanced Fargate service declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProperties {
    #[serde(flatten)]
    pub spec: ServiceSpec,

    pub cluster: ClusterRef,

    pub network: NetworkRef,

    /// Logical id of the bucket receiving the load balancer's access logs
    pub access_logs_bucket: String,
}

/// Properties of a service's autoscaling declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscaleProperties {
    /// Logical id of the service being scaled
    pub service: String,

    #[serde(flatten)]
    pub policy: AutoscalePolicy,
}

/// Compose one service stack
pub fn stack(
    cfg: &DeployConfig,
    spec: &ServiceSpec,
    cluster: &ClusterRef,
    network: &NetworkRef,
) -> Result<Stack> {
    let repository = EcrRepositorySpec::for_service(spec);
    let bucket = LogBucketSpec::for_retention(spec.log_retention);

    let stack = Stack::new(
        cfg.service_stack_name(&spec.short_name),
        cfg.tags(),
        cfg.placement(),
    )
    .with_dependency(&network.stack)
    .with_dependency(&cluster.stack)
    .with_resource(ResourceDeclaration::new(
        ResourceKind::EcrRepository,
        "ecr-repo",
        &repository,
    )?)
    .with_resource(ResourceDeclaration::new(
        ResourceKind::LogBucket,
        "access-logs",
        &bucket,
    )?)
    .with_resource(
        ResourceDeclaration::new(
            ResourceKind::FargateService,
            "service",
            &ServiceProperties {
                spec: spec.clone(),
                cluster: cluster.clone(),
                network: network.clone(),
                access_logs_bucket: "access-logs".to_string(),
            },
        )?
        .with_dependency("access-logs"),
    )
    .with_resource(
        ResourceDeclaration::new(
            ResourceKind::AutoscalePolicy,
            "autoscaling",
            &AutoscaleProperties {
                service: "service".to_string(),
                policy: spec.autoscaling(),
            },
        )?
        .with_dependency("service"),
    );

    Ok(stack)
}
