//! AWS engine for drydock
//!
//! Implements the `ProvisionEngine` trait from `drydock-engine` on top of
//! the AWS SDK: real VPC lookup and credential checks against EC2, local
//! recording of declared stacks.

pub mod engine;
pub mod error;

pub use engine::AwsEngine;
pub use error::{AwsError, Result};
