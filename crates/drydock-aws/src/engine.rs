//! AWS-backed provisioning engine
//!
//! Network lookup and the auth probe hit the EC2 API; declarations are
//! recorded locally. Submitting the recorded stacks to a provisioning
//! backend happens outside this repository.

use crate::error::{AwsError, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::error::ProvideErrorMetadata;
use drydock_engine::{
    AuthStatus, LocalEngine, NetworkAttributes, ProvisionEngine, Stack, StackHandle,
};
use tracing::{debug, info};

const VPC_NOT_FOUND_CODE: &str = "InvalidVpcID.NotFound";
const FALLBACK_REGION: &str = "us-east-1";

/// Engine backed by the AWS SDK
pub struct AwsEngine {
    ec2: aws_sdk_ec2::Client,
    region: String,
    recorder: LocalEngine,
}

impl AwsEngine {
    /// Connect using the ambient credential chain
    ///
    /// Region resolution order: the explicit argument, then the SDK's
    /// default provider chain, then `us-east-1`.
    pub async fn connect(region: Option<String>) -> Self {
        let region_provider = RegionProviderChain::first_try(region.map(Region::new))
            .or_default_provider()
            .or_else(Region::new(FALLBACK_REGION));
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        Self::from_sdk_config(&sdk_config)
    }

    /// Build the engine from an already loaded SDK configuration
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| FALLBACK_REGION.to_string());
        info!("Using AWS region: {}", region);
        Self {
            ec2: aws_sdk_ec2::Client::new(sdk_config),
            region,
            recorder: LocalEngine::new(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Stacks recorded so far, in submission order
    pub async fn recorded(&self) -> Vec<Stack> {
        self.recorder.recorded().await
    }

    async fn describe_vpc(&self, vpc_id: &str) -> Result<NetworkAttributes> {
        let output = self
            .ec2
            .describe_vpcs()
            .vpc_ids(vpc_id)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.code() == Some(VPC_NOT_FOUND_CODE) {
                    AwsError::VpcNotFound(vpc_id.to_string())
                } else {
                    AwsError::Api(service_err.to_string())
                }
            })?;

        let vpc = output
            .vpcs()
            .first()
            .ok_or_else(|| AwsError::VpcNotFound(vpc_id.to_string()))?;
        debug!("Found VPC {} ({:?})", vpc_id, vpc.cidr_block());
        Ok(NetworkAttributes {
            vpc_id: vpc.vpc_id().unwrap_or(vpc_id).to_string(),
            cidr_block: vpc.cidr_block().map(str::to_string),
        })
    }
}

#[async_trait]
impl ProvisionEngine for AwsEngine {
    fn name(&self) -> &str {
        "aws"
    }

    fn display_name(&self) -> &str {
        "AWS"
    }

    async fn check_auth(&self) -> drydock_engine::Result<AuthStatus> {
        // DescribeVpcs doubles as the credential probe.
        match self.ec2.describe_vpcs().max_results(5).send().await {
            Ok(_) => Ok(AuthStatus::ok(format!("region {}", self.region))),
            Err(err) => Ok(AuthStatus::failed(err.into_service_error().to_string())),
        }
    }

    async fn lookup_network(&self, vpc_id: &str) -> drydock_engine::Result<NetworkAttributes> {
        Ok(self.describe_vpc(vpc_id).await?)
    }

    async fn declare(&self, stack: &Stack) -> drydock_engine::Result<StackHandle> {
        self.recorder.declare(stack).await
    }
}
