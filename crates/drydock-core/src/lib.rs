//! Drydock core: deployment configuration and resource specifications
//!
//! Everything in this crate is plain data. The configuration record is read
//! once from the process environment; the specification types describe the
//! desired resources and are composed into stacks by `drydock-engine`.
//! Nothing here talks to a cloud API.

pub mod config;
pub mod model;

pub use config::{DeployConfig, Placement, StackTags};
pub use model::RemovalPolicy;
pub use model::cluster::{ClusterRef, ClusterSpec};
pub use model::datastore::{
    CredentialSpec, DataStoreSpec, DbExposure, EgressRule, IngressRule, InstanceSettings,
    SubnetPlacement,
};
pub use model::network::{NetworkBinding, NetworkRef, NetworkSource, VpcSpec};
pub use model::service::{
    AutoscalePolicy, EcrRepositorySpec, HealthCheck, ImageSource, LogBucketSpec, LogRetention,
    ServiceSpec,
};
