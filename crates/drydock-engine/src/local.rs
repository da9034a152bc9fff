//! Local validating engine
//!
//! Records declarations without touching any cloud API, while enforcing
//! what a real engine would reject: duplicate stacks and logical ids,
//! dependencies on undeclared stacks or resources, and a handful of
//! kind-specific property checks.

use crate::declaration::{ResourceDeclaration, ResourceKind};
use crate::engine::{AuthStatus, NetworkAttributes, ProvisionEngine};
use crate::error::{ProvisionError, Result};
use crate::stack::{ResourceHandle, Stack, StackHandle};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::debug;

/// Engine that records declarations locally
pub struct LocalEngine {
    /// Network ids `lookup_network` resolves. `None` accepts any id, so a
    /// plan can be composed offline.
    known_networks: Option<Vec<String>>,
    recorded: Mutex<Vec<Stack>>,
}

impl LocalEngine {
    pub fn new() -> Self {
        Self {
            known_networks: None,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Restrict `lookup_network` to the given ids
    pub fn with_known_networks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_networks = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Stacks accepted so far, in submission order
    pub async fn recorded(&self) -> Vec<Stack> {
        self.recorded.lock().await.clone()
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvisionEngine for LocalEngine {
    fn name(&self) -> &str {
        "local"
    }

    fn display_name(&self) -> &str {
        "Local"
    }

    async fn check_auth(&self) -> Result<AuthStatus> {
        Ok(AuthStatus::ok("local"))
    }

    async fn lookup_network(&self, vpc_id: &str) -> Result<NetworkAttributes> {
        match &self.known_networks {
            Some(ids) if !ids.iter().any(|id| id == vpc_id) => {
                Err(ProvisionError::NetworkNotFound(vpc_id.to_string()))
            }
            _ => Ok(NetworkAttributes {
                vpc_id: vpc_id.to_string(),
                cidr_block: None,
            }),
        }
    }

    async fn declare(&self, stack: &Stack) -> Result<StackHandle> {
        validate_stack(stack)?;

        let mut recorded = self.recorded.lock().await;
        if recorded.iter().any(|s| s.name == stack.name) {
            return Err(ProvisionError::DuplicateStack(stack.name.clone()));
        }
        for dependency in &stack.depends_on {
            if !recorded.iter().any(|s| &s.name == dependency) {
                return Err(ProvisionError::MissingDependency {
                    stack: stack.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }

        let handle = StackHandle {
            stack: stack.name.clone(),
            resources: stack
                .resources
                .iter()
                .map(|r| ResourceHandle {
                    stack: stack.name.clone(),
                    logical_id: r.logical_id.clone(),
                    kind: r.kind,
                })
                .collect(),
        };
        recorded.push(stack.clone());
        debug!(
            "Recorded stack {} with {} resources",
            stack.name,
            stack.resources.len()
        );
        Ok(handle)
    }
}

fn validate_stack(stack: &Stack) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for resource in &stack.resources {
        for dependency in &resource.depends_on {
            // Within a stack, resources may only depend on ids declared
            // before them.
            if !seen.contains(dependency.as_str()) {
                return Err(invalid(
                    stack,
                    resource,
                    format!("Depends on undeclared resource: {dependency}"),
                ));
            }
        }
        if !seen.insert(&resource.logical_id) {
            return Err(ProvisionError::DuplicateResource {
                stack: stack.name.clone(),
                logical_id: resource.logical_id.clone(),
            });
        }
        validate_properties(stack, resource)?;
    }
    Ok(())
}

fn validate_properties(stack: &Stack, resource: &ResourceDeclaration) -> Result<()> {
    match resource.kind {
        ResourceKind::FargateService => {
            let port = uint_property(resource, &["container_port"]);
            if port == 0 {
                return Err(invalid(stack, resource, "Container port must be non-zero"));
            }
            if resource.properties.get("image").is_none() {
                return Err(invalid(stack, resource, "Image source is required"));
            }
            for key in ["healthy_threshold", "unhealthy_threshold"] {
                if uint_property(resource, &["health_check", key]) == 0 {
                    return Err(invalid(
                        stack,
                        resource,
                        format!("Health check {key} must be at least 1"),
                    ));
                }
            }
        }
        ResourceKind::AutoscalePolicy => {
            let min = uint_property(resource, &["min_capacity"]);
            let max = uint_property(resource, &["max_capacity"]);
            if max < min {
                return Err(invalid(
                    stack,
                    resource,
                    format!("Max capacity {max} is below min capacity {min}"),
                ));
            }
        }
        ResourceKind::DatabaseInstance => {
            if uint_property(resource, &["port"]) == 0 {
                return Err(invalid(stack, resource, "Database port must be non-zero"));
            }
        }
        _ => {}
    }
    Ok(())
}

fn uint_property(resource: &ResourceDeclaration, path: &[&str]) -> u64 {
    let mut value = &resource.properties;
    for key in path {
        match value.get(key) {
            Some(next) => value = next,
            None => return 0,
        }
    }
    value.as_u64().unwrap_or(0)
}

fn invalid(
    stack: &Stack,
    resource: &ResourceDeclaration,
    reason: impl Into<String>,
) -> ProvisionError {
    ProvisionError::InvalidDeclaration {
        stack: stack.name.clone(),
        logical_id: resource.logical_id.clone(),
        reason: reason.into(),
    }
}
