//! Relational datastore model
//!
//! Credential secret, database security group and the MySQL instance. Port
//! exposure is an explicit policy: `Internal` keeps the database reachable
//! only through the group itself, `PublicPort` additionally opens the MySQL
//! port to any IPv4 address.

use crate::config::DeployConfig;
use crate::model::RemovalPolicy;
use serde::{Deserialize, Serialize};

pub const MYSQL_PORT: u16 = 3306;
pub const MYSQL_ENGINE_VERSION: &str = "8.0.28";
pub const SECRET_PASSWORD_LENGTH: u32 = 30;
/// Characters the generated password may not contain.
pub const SECRET_EXCLUDE_CHARACTERS: &str = "\"@/\\ '";
pub const ANY_IPV4: &str = "0.0.0.0/0";

/// Generated credential secret for the database.
///
/// Password generation happens in the engine's secret service; locally only
/// the template and the generation parameters are declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSpec {
    pub secret_name: String,
    pub username: String,
    pub password_length: u32,
    pub exclude_characters: String,
    /// Key the generated password is stored under.
    pub generate_key: String,
    /// Fixed part of the secret string, carries the username.
    pub template: serde_json::Value,
}

impl CredentialSpec {
    pub fn for_database(cfg: &DeployConfig) -> Self {
        Self {
            secret_name: format!(
                "{}-{}-credentials",
                cfg.stack_name,
                cfg.qualified_db_name()
            ),
            username: cfg.db_user.clone(),
            password_length: SECRET_PASSWORD_LENGTH,
            exclude_characters: SECRET_EXCLUDE_CHARACTERS.to_string(),
            generate_key: "password".to_string(),
            template: serde_json::json!({ "username": cfg.db_user }),
        }
    }
}

/// How far the database port is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbExposure {
    /// Reachable only from peers in the database security group.
    Internal,
    /// Additionally admits the MySQL port from any IPv4 address.
    PublicPort,
}

/// One security-group ingress rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "peer", rename_all = "snake_case")]
pub enum IngressRule {
    /// All traffic from members of the group itself.
    FromSelf { description: String },
    /// A port range from a CIDR block.
    Cidr {
        cidr: String,
        from_port: u16,
        to_port: u16,
        description: String,
    },
}

/// One security-group egress rule; all traffic to the CIDR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressRule {
    pub cidr: String,
    pub description: String,
}

/// Which subnets the instance lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetPlacement {
    Public,
    Private,
}

/// Instance-level database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSettings {
    pub engine_version: String,
    pub port: u16,
    pub storage_gib: u32,
    pub backup_retention_days: u32,
    pub instance_class: String,
    pub monitoring_interval_secs: u32,
    pub multi_az: bool,
    pub storage_encrypted: bool,
    pub allow_major_version_upgrade: bool,
    pub auto_minor_version_upgrade: bool,
    /// Sits in public subnets yet is not publicly addressable.
    pub publicly_accessible: bool,
    pub subnet_placement: SubnetPlacement,
    pub removal_policy: RemovalPolicy,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            engine_version: MYSQL_ENGINE_VERSION.to_string(),
            port: MYSQL_PORT,
            storage_gib: 20,
            backup_retention_days: 7,
            instance_class: "db.t3.micro".to_string(),
            monitoring_interval_secs: 60,
            multi_az: true,
            storage_encrypted: true,
            allow_major_version_upgrade: true,
            auto_minor_version_upgrade: true,
            publicly_accessible: false,
            subnet_placement: SubnetPlacement::Public,
            removal_policy: RemovalPolicy::Destroy,
        }
    }
}

/// The full datastore unit: credentials, firewall rules and instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataStoreSpec {
    /// Environment-qualified database name, e.g. `dev-app-db`.
    pub db_name: String,
    pub instance: InstanceSettings,
    pub credentials: CredentialSpec,
    pub exposure: DbExposure,
}

impl DataStoreSpec {
    pub fn from_config(cfg: &DeployConfig) -> Self {
        Self {
            db_name: cfg.qualified_db_name(),
            instance: InstanceSettings::default(),
            credentials: CredentialSpec::for_database(cfg),
            exposure: if cfg.db_public_ingress {
                DbExposure::PublicPort
            } else {
                DbExposure::Internal
            },
        }
    }

    /// Ingress rule set for the database security group.
    pub fn ingress_rules(&self) -> Vec<IngressRule> {
        let mut rules = vec![IngressRule::FromSelf {
            description: "all from self".to_string(),
        }];
        if self.exposure == DbExposure::PublicPort {
            rules.push(IngressRule::Cidr {
                cidr: ANY_IPV4.to_string(),
                from_port: MYSQL_PORT,
                to_port: MYSQL_PORT,
                description: "tcp3306".to_string(),
            });
        }
        rules
    }

    pub fn egress_rules(&self) -> Vec<EgressRule> {
        vec![EgressRule {
            cidr: ANY_IPV4.to_string(),
            description: "all out".to_string(),
        }]
    }
}
