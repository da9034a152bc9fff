//! Stacks and the deployment manifest
//!
//! A stack is a named bundle of declarations submitted to the engine as one
//! unit. The manifest is the versioned record of every composed stack and
//! what `dock synth` writes to disk.

use crate::declaration::{ResourceDeclaration, ResourceKind};
use crate::error::{ProvisionError, Result};
use drydock_core::{Placement, StackTags};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const MANIFEST_VERSION: u32 = 1;
pub const MANIFEST_FILE: &str = "manifest.json";

/// Named bundle of resource declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub name: String,

    /// Tags stamped onto every resource in the stack
    pub tags: StackTags,

    /// Target region and account
    pub placement: Placement,

    /// Names of stacks that must be declared before this one
    pub depends_on: Vec<String>,

    pub resources: Vec<ResourceDeclaration>,
}

impl Stack {
    pub fn new(name: impl Into<String>, tags: StackTags, placement: Placement) -> Self {
        Self {
            name: name.into(),
            tags,
            placement,
            depends_on: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, stack: impl Into<String>) -> Self {
        self.depends_on.push(stack.into());
        self
    }

    pub fn with_resource(mut self, resource: ResourceDeclaration) -> Self {
        self.resources.push(resource);
        self
    }

    /// Find a declaration by logical id
    pub fn resource(&self, logical_id: &str) -> Option<&ResourceDeclaration> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }

    pub fn resources_of_kind(&self, kind: ResourceKind) -> Vec<&ResourceDeclaration> {
        self.resources.iter().filter(|r| r.kind == kind).collect()
    }
}

/// Handle returned by the engine for a declared stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackHandle {
    pub stack: String,

    /// Handles for the declared resources, in declaration order
    pub resources: Vec<ResourceHandle>,
}

/// Handle to a single declared resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub stack: String,
    pub logical_id: String,
    pub kind: ResourceKind,
}

/// Versioned record of every composed stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version
    pub version: u32,

    /// Stack name prefix the deployment was composed under
    pub project: String,

    /// Environment suffix (dev, stg, prod ...)
    pub environment: String,

    pub stacks: Vec<Stack>,
}

impl Manifest {
    pub fn new(project: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            project: project.into(),
            environment: environment.into(),
            stacks: Vec::new(),
        }
    }

    pub fn push(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    /// Find a stack by name
    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name == name)
    }

    pub fn resource_count(&self) -> usize {
        self.stacks.iter().map(|s| s.resources.len()).sum()
    }

    pub fn summary(&self) -> ManifestSummary {
        ManifestSummary {
            stacks: self.stacks.len(),
            resources: self.resource_count(),
        }
    }

    /// Write the manifest under `dir` as pretty-printed JSON
    pub async fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).await?;
            tracing::debug!("Created output directory: {}", dir.display());
        }

        let path = dir.join(MANIFEST_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved manifest with {} stacks", self.stacks.len());
        Ok(path)
    }

    /// Load a manifest written by [`Manifest::save`]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        let manifest: Manifest = serde_json::from_str(&content)?;

        // Version check
        if manifest.version > MANIFEST_VERSION {
            return Err(ProvisionError::ManifestError(format!(
                "Manifest version {} is newer than supported version {}",
                manifest.version, MANIFEST_VERSION
            )));
        }

        tracing::debug!("Loaded manifest with {} stacks", manifest.stacks.len());
        Ok(manifest)
    }
}

/// Per-deployment totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSummary {
    pub stacks: usize,
    pub resources: usize,
}

impl std::fmt::Display for ManifestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} stacks, {} resources", self.stacks, self.resources)
    }
}
