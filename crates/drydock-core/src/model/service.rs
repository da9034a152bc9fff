//! Load-balanced service model
//!
//! One parameterized [`ServiceSpec`] covers both application services; the
//! `ui` and `api` presets pin the identity fields (name, port, health-check
//! path, runtime environment, repository name) while sizing always comes
//! from the deployment configuration.

use crate::config::DeployConfig;
use crate::model::RemovalPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Image every service runs until a build lands in its ECR repository.
pub const SAMPLE_IMAGE: &str = "amazon/amazon-ecs-sample";
/// Stream prefix handed to the awslogs driver.
pub const LOG_STREAM_PREFIX: &str = "app";
/// CPU utilization the autoscaler steers toward.
pub const AUTOSCALE_TARGET_CPU_PERCENT: u32 = 80;

/// Where a service's container image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ImageSource {
    /// Public registry reference.
    Registry { image: String },
    /// Tagged image from the service's own ECR repository.
    Ecr { repository: String, tag: String },
}

impl ImageSource {
    pub fn sample() -> Self {
        Self::Registry {
            image: SAMPLE_IMAGE.to_string(),
        }
    }
}

/// Target-group health check attached to a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub path: String,
    pub healthy_threshold: u32,
    pub unhealthy_threshold: u32,
    pub timeout_secs: u64,
    pub interval_secs: u64,
    pub healthy_http_codes: String,
}

impl HealthCheck {
    /// Probe at `path` with the stack-wide default timings.
    pub fn at_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            healthy_threshold: 2,
            unhealthy_threshold: 2,
            timeout_secs: 100,
            interval_secs: 120,
            healthy_http_codes: "200-299".to_string(),
        }
    }
}

/// Log retention admits exactly two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRetention {
    OneDay,
    OneMonth,
}

impl LogRetention {
    pub fn for_environment(retain_logs: bool) -> Self {
        if retain_logs {
            Self::OneMonth
        } else {
            Self::OneDay
        }
    }

    /// Bucket lifecycle expiration matching the retention class.
    pub fn expiration_days(self) -> u32 {
        match self {
            Self::OneDay => 1,
            Self::OneMonth => 30,
        }
    }
}

/// Task-count bounds with a fixed CPU-utilization trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscalePolicy {
    pub min_capacity: u32,
    pub max_capacity: u32,
    pub target_cpu_percent: u32,
}

/// One externally reachable load-balanced Fargate service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Service and load-balancer name, e.g. `dev-app-ui`.
    pub name: String,
    /// Short identifier used in stack and resource names.
    pub short_name: String,
    pub container_port: u16,
    pub image: ImageSource,
    /// Runtime environment handed to the container.
    pub env: HashMap<String, String>,
    pub desired_count: u32,
    /// Task CPU units.
    pub cpu: u32,
    pub memory_mib: u32,
    /// Autoscale ceiling; unset collapses scaling to the desired count.
    pub autoscale_max: Option<u32>,
    pub health_check: HealthCheck,
    pub log_retention: LogRetention,
    pub log_stream_prefix: String,
    pub public_load_balancer: bool,
    /// ECR repository builds for this service push to.
    pub repository_name: String,
}

impl ServiceSpec {
    /// The frontend service.
    pub fn ui(cfg: &DeployConfig) -> Self {
        Self::preset(
            cfg,
            format!("{}-app-ui", cfg.environment),
            "ui",
            80,
            HealthCheck::at_path("/"),
            cfg.ui_env.clone(),
            format!("{}-repo-ui", cfg.stack_name),
        )
    }

    /// The backend API service.
    pub fn api(cfg: &DeployConfig) -> Self {
        Self::preset(
            cfg,
            format!("{}-app-api", cfg.environment),
            "api",
            8080,
            HealthCheck::at_path("/hello"),
            cfg.api_env.clone(),
            format!("{}-repo", cfg.stack_name),
        )
    }

    fn preset(
        cfg: &DeployConfig,
        name: String,
        short_name: &str,
        container_port: u16,
        health_check: HealthCheck,
        env: HashMap<String, String>,
        repository_name: String,
    ) -> Self {
        Self {
            name,
            short_name: short_name.to_string(),
            container_port,
            image: ImageSource::sample(),
            env,
            desired_count: cfg.desired_count,
            cpu: cfg.task_cpu,
            memory_mib: cfg.task_memory_mib,
            autoscale_max: cfg.autoscale_max,
            health_check,
            log_retention: LogRetention::for_environment(cfg.retain_logs),
            log_stream_prefix: LOG_STREAM_PREFIX.to_string(),
            public_load_balancer: true,
            repository_name,
        }
    }

    /// Scaling bounds: floor at the desired count, ceiling at the configured
    /// cap or the desired count when no cap is set.
    pub fn autoscaling(&self) -> AutoscalePolicy {
        AutoscalePolicy {
            min_capacity: self.desired_count,
            max_capacity: self.autoscale_max.unwrap_or(self.desired_count),
            target_cpu_percent: AUTOSCALE_TARGET_CPU_PERCENT,
        }
    }
}

/// Container registry repository owned by one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcrRepositorySpec {
    pub name: String,
    pub image_scan_on_push: bool,
    pub removal_policy: RemovalPolicy,
}

impl EcrRepositorySpec {
    pub fn for_service(spec: &ServiceSpec) -> Self {
        Self {
            name: spec.repository_name.clone(),
            image_scan_on_push: true,
            removal_policy: RemovalPolicy::Destroy,
        }
    }
}

/// Bucket receiving the load balancer's access logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBucketSpec {
    pub lifecycle_expiration_days: u32,
    pub removal_policy: RemovalPolicy,
}

impl LogBucketSpec {
    pub fn for_retention(retention: LogRetention) -> Self {
        Self {
            lifecycle_expiration_days: retention.expiration_days(),
            removal_policy: RemovalPolicy::Destroy,
        }
    }
}
