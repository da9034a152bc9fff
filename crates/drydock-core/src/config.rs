//! Environment-derived deployment configuration
//!
//! The configuration record is resolved exactly once at process start and
//! handed by reference to every composition unit. Components never consult
//! the environment themselves. Missing or unparseable values fall back to
//! their documented defaults silently; validation happens at declaration
//! time in the engine, not here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_STACK_SUFFIX: &str = "dev";
pub const DEFAULT_VPC_ID: &str = "vpc-07d74850b22a2a9e5";
pub const DEFAULT_VPC_NAME: &str = "app-vpc";
pub const DEFAULT_APP_TAG: &str = "TEST_APPLICATION_TAG";
pub const DEFAULT_TASK_CPU: u32 = 256;
pub const DEFAULT_TASK_MEMORY_MIB: u32 = 512;
pub const DEFAULT_DESIRED_COUNT: u32 = 1;
pub const DEFAULT_DB_NAME: &str = "app-db";
pub const DEFAULT_DB_USER: &str = "admin";
pub const DEFAULT_API_PROFILE: &str = "dev";
pub const DEFAULT_UI_API_URL: &str = "http://localhost:8080";

/// Deployment configuration, immutable once composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub region: String,
    pub account_id: String,
    /// Environment suffix (dev, stg, prod ...) used in tags and names.
    pub environment: String,
    /// Prefix every stack name derives from.
    pub stack_name: String,
    /// Existing VPC id to bind to. Empty means declare a new VPC.
    pub vpc_id: String,
    /// Name given to a VPC declared by this deployment.
    pub vpc_name: String,
    pub app_tag: String,
    /// Fargate task CPU units.
    pub task_cpu: u32,
    /// Fargate task memory in MiB.
    pub task_memory_mib: u32,
    pub desired_count: u32,
    /// Autoscale ceiling. Unset collapses autoscaling to the desired count.
    pub autoscale_max: Option<u32>,
    /// Month-long log retention when set, one day otherwise.
    pub retain_logs: bool,
    pub db_name: String,
    pub db_user: String,
    /// Admit the database port from any address. Off by default.
    pub db_public_ingress: bool,
    /// Runtime environment handed to the API container.
    pub api_env: HashMap<String, String>,
    /// Runtime environment handed to the UI container.
    pub ui_env: HashMap<String, String>,
}

impl DeployConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        let environment = env_or("STACK_SUFFIX", DEFAULT_STACK_SUFFIX);
        let stack_name = env_or("STACK_NAME", &format!("{environment}-app-infra"));
        debug!("Resolved configuration for stack {stack_name} ({environment})");

        let api_env = HashMap::from([(
            "SPRING_PROFILES_ACTIVE".to_string(),
            env_or("SPRING_PROFILES_ACTIVE", DEFAULT_API_PROFILE),
        )]);
        let ui_env = HashMap::from([(
            "REACT_APP_API_URL".to_string(),
            env_or("REACT_APP_API_URL", DEFAULT_UI_API_URL),
        )]);

        Self {
            region: env_or("AWS_REGION", DEFAULT_REGION),
            account_id: std::env::var("AWS_ACCOUNT_ID").unwrap_or_default(),
            environment,
            stack_name,
            // VPC_ID is the one variable where an explicitly empty value is
            // meaningful: it switches the network from lookup to creation.
            vpc_id: std::env::var("VPC_ID").unwrap_or_else(|_| DEFAULT_VPC_ID.to_string()),
            vpc_name: env_or("STACK_VPC_NAME", DEFAULT_VPC_NAME),
            app_tag: env_or("APP_TAG", DEFAULT_APP_TAG),
            task_cpu: env_u32("FARGATE_TASK_CPU", DEFAULT_TASK_CPU),
            task_memory_mib: env_u32("FARGATE_TASK_MEMORY", DEFAULT_TASK_MEMORY_MIB),
            desired_count: env_u32("FARGATE_DESIRED_COUNT", DEFAULT_DESIRED_COUNT),
            autoscale_max: env_opt_u32("AUTO_SCALE_MAX_CAP"),
            retain_logs: env_bool("RETAIN_LOGS", true),
            db_name: env_or("DB_NAME", DEFAULT_DB_NAME),
            db_user: env_or("DB_USER_NAME", DEFAULT_DB_USER),
            db_public_ingress: env_bool("DB_PUBLIC_INGRESS", false),
            api_env,
            ui_env,
        }
    }

    pub fn network_stack_name(&self) -> String {
        format!("{}-vpc", self.stack_name)
    }

    pub fn cluster_stack_name(&self) -> String {
        format!("{}-ecs-cluster", self.stack_name)
    }

    /// Stack name for one service unit, e.g. `dev-app-infra-service-api`.
    pub fn service_stack_name(&self, short_name: &str) -> String {
        format!("{}-service-{}", self.stack_name, short_name)
    }

    pub fn datastore_stack_name(&self) -> String {
        format!("{}-db", self.stack_name)
    }

    /// Database name qualified by environment, e.g. `dev-app-db`.
    pub fn qualified_db_name(&self) -> String {
        format!("{}-{}", self.environment, self.db_name)
    }

    /// Tag pair applied to every stack.
    pub fn tags(&self) -> StackTags {
        StackTags {
            app: self.app_tag.clone(),
            environment: self.environment.clone(),
        }
    }

    /// Region/account placement applied to every stack.
    pub fn placement(&self) -> Placement {
        Placement {
            region: self.region.clone(),
            account_id: self.account_id.clone(),
        }
    }
}

impl Default for DeployConfig {
    /// The documented defaults, independent of the process environment.
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            account_id: String::new(),
            environment: DEFAULT_STACK_SUFFIX.to_string(),
            stack_name: format!("{DEFAULT_STACK_SUFFIX}-app-infra"),
            vpc_id: DEFAULT_VPC_ID.to_string(),
            vpc_name: DEFAULT_VPC_NAME.to_string(),
            app_tag: DEFAULT_APP_TAG.to_string(),
            task_cpu: DEFAULT_TASK_CPU,
            task_memory_mib: DEFAULT_TASK_MEMORY_MIB,
            desired_count: DEFAULT_DESIRED_COUNT,
            autoscale_max: None,
            retain_logs: true,
            db_name: DEFAULT_DB_NAME.to_string(),
            db_user: DEFAULT_DB_USER.to_string(),
            db_public_ingress: false,
            api_env: HashMap::from([(
                "SPRING_PROFILES_ACTIVE".to_string(),
                DEFAULT_API_PROFILE.to_string(),
            )]),
            ui_env: HashMap::from([(
                "REACT_APP_API_URL".to_string(),
                DEFAULT_UI_API_URL.to_string(),
            )]),
        }
    }
}

/// Tags stamped onto each stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTags {
    pub app: String,
    pub environment: String,
}

/// Target region and account for a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub region: String,
    pub account_id: String,
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt_u32(key: &str) -> Option<u32> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Every variable the config reads, for hermetic unset tests.
    const ALL_VARS: [&str; 17] = [
        "AWS_REGION",
        "AWS_ACCOUNT_ID",
        "STACK_SUFFIX",
        "STACK_NAME",
        "VPC_ID",
        "STACK_VPC_NAME",
        "APP_TAG",
        "FARGATE_TASK_CPU",
        "FARGATE_TASK_MEMORY",
        "FARGATE_DESIRED_COUNT",
        "AUTO_SCALE_MAX_CAP",
        "RETAIN_LOGS",
        "DB_NAME",
        "DB_USER_NAME",
        "DB_PUBLIC_INGRESS",
        "SPRING_PROFILES_ACTIVE",
        "REACT_APP_API_URL",
    ];

    fn with_clean_env<F: Fn()>(overrides: &[(&str, &str)], f: F) {
        let vars: Vec<(&str, Option<&str>)> = ALL_VARS
            .iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(vars, f);
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        with_clean_env(&[], || {
            let cfg = DeployConfig::from_env();
            assert_eq!(cfg, DeployConfig::default());
            assert_eq!(cfg.region, "us-east-1");
            assert_eq!(cfg.account_id, "");
            assert_eq!(cfg.environment, "dev");
            assert_eq!(cfg.stack_name, "dev-app-infra");
            assert_eq!(cfg.vpc_id, DEFAULT_VPC_ID);
            assert_eq!(cfg.task_cpu, 256);
            assert_eq!(cfg.task_memory_mib, 512);
            assert_eq!(cfg.desired_count, 1);
            assert_eq!(cfg.autoscale_max, None);
            assert!(cfg.retain_logs);
            assert!(!cfg.db_public_ingress);
            assert_eq!(cfg.db_name, "app-db");
            assert_eq!(cfg.db_user, "admin");
            assert_eq!(cfg.api_env["SPRING_PROFILES_ACTIVE"], "dev");
            assert_eq!(cfg.ui_env["REACT_APP_API_URL"], "http://localhost:8080");
        });
    }

    #[test]
    #[serial]
    fn test_parses_overrides() {
        with_clean_env(
            &[
                ("AWS_REGION", "eu-west-1"),
                ("AWS_ACCOUNT_ID", "123456789012"),
                ("STACK_SUFFIX", "stg"),
                ("FARGATE_TASK_CPU", "1024"),
                ("FARGATE_DESIRED_COUNT", "3"),
                ("AUTO_SCALE_MAX_CAP", "6"),
                ("RETAIN_LOGS", "false"),
                ("DB_PUBLIC_INGRESS", "1"),
            ],
            || {
                let cfg = DeployConfig::from_env();
                assert_eq!(cfg.region, "eu-west-1");
                assert_eq!(cfg.account_id, "123456789012");
                assert_eq!(cfg.environment, "stg");
                assert_eq!(cfg.stack_name, "stg-app-infra");
                assert_eq!(cfg.task_cpu, 1024);
                assert_eq!(cfg.desired_count, 3);
                assert_eq!(cfg.autoscale_max, Some(6));
                assert!(!cfg.retain_logs);
                assert!(cfg.db_public_ingress);
            },
        );
    }

    #[test]
    #[serial]
    fn test_unparseable_numbers_fall_back_silently() {
        with_clean_env(
            &[
                ("FARGATE_TASK_CPU", "plenty"),
                ("FARGATE_DESIRED_COUNT", ""),
                ("AUTO_SCALE_MAX_CAP", "many"),
            ],
            || {
                let cfg = DeployConfig::from_env();
                assert_eq!(cfg.task_cpu, 256);
                assert_eq!(cfg.desired_count, 1);
                assert_eq!(cfg.autoscale_max, None);
            },
        );
    }

    #[test]
    #[serial]
    fn test_empty_strings_fall_back() {
        with_clean_env(&[("STACK_SUFFIX", ""), ("DB_NAME", "")], || {
            let cfg = DeployConfig::from_env();
            assert_eq!(cfg.environment, "dev");
            assert_eq!(cfg.db_name, "app-db");
        });
    }

    #[test]
    #[serial]
    fn test_empty_vpc_id_switches_to_creation() {
        with_clean_env(&[("VPC_ID", "")], || {
            let cfg = DeployConfig::from_env();
            assert_eq!(cfg.vpc_id, "");
        });
    }

    #[test]
    #[serial]
    fn test_stack_names_derive_from_suffix() {
        with_clean_env(&[("STACK_SUFFIX", "prod")], || {
            let cfg = DeployConfig::from_env();
            assert_eq!(cfg.stack_name, "prod-app-infra");
            assert_eq!(cfg.cluster_stack_name(), "prod-app-infra-ecs-cluster");
            assert_eq!(cfg.network_stack_name(), "prod-app-infra-vpc");
            assert_eq!(cfg.service_stack_name("ui"), "prod-app-infra-service-ui");
            assert_eq!(cfg.datastore_stack_name(), "prod-app-infra-db");
            assert_eq!(cfg.qualified_db_name(), "prod-app-db");
        });
    }

    #[test]
    #[serial]
    fn test_explicit_stack_name_wins_over_suffix() {
        with_clean_env(
            &[("STACK_SUFFIX", "prod"), ("STACK_NAME", "edge-infra")],
            || {
                let cfg = DeployConfig::from_env();
                assert_eq!(cfg.stack_name, "edge-infra");
                assert_eq!(cfg.cluster_stack_name(), "edge-infra-ecs-cluster");
                // The environment suffix still drives tags and db naming.
                assert_eq!(cfg.environment, "prod");
                assert_eq!(cfg.qualified_db_name(), "prod-app-db");
            },
        );
    }

    #[test]
    #[serial]
    fn test_composition_is_deterministic() {
        with_clean_env(&[("STACK_SUFFIX", "prod")], || {
            assert_eq!(DeployConfig::from_env(), DeployConfig::from_env());
        });
    }
}
