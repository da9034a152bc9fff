//! Drydock provisioning engine interface
//!
//! This crate composes the typed resource specifications from
//! `drydock-core` into named stacks and submits them to a provisioning
//! engine. The engine owns diffing, physical create/update/delete and
//! rollback; nothing here mutates cloud resources directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    dock CLI                      │
//! │              (config/plan/synth)                 │
//! └─────────────────────┬───────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────┐
//! │                drydock-engine                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  compose: network, cluster, services,     │   │
//! │  │  datastore, in topological order          │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │  Dependency  │  │ trait ProvisionEngine │     │
//! │  │  graph       │  │ lookup/declare/auth   │     │
//! │  └──────────────┘  └──────────────────────┘     │
//! └───────┬─────────────────────┬───────────────────┘
//!         │                     │
//! ┌───────▼───────┐     ┌───────▼───────┐
//! │  LocalEngine  │     │   AwsEngine   │
//! │  (recording)  │     │ (drydock-aws) │
//! └───────────────┘     └───────────────┘
//! ```

pub mod compose;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod graph;
pub mod local;
pub mod stack;

// Re-exports
pub use compose::{Deployment, compose};
pub use declaration::{ResourceDeclaration, ResourceKind};
pub use engine::{AuthStatus, NetworkAttributes, ProvisionEngine};
pub use error::{ProvisionError, Result};
pub use graph::DependencyGraph;
pub use local::LocalEngine;
pub use stack::{MANIFEST_FILE, Manifest, ManifestSummary, ResourceHandle, Stack, StackHandle};
