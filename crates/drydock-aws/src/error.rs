//! AWS engine error types

use drydock_engine::ProvisionError;
use thiserror::Error;

/// AWS engine errors
#[derive(Error, Debug)]
pub enum AwsError {
    #[error("VPC not found: {0}")]
    VpcNotFound(String),

    #[error("EC2 API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, AwsError>;

impl From<AwsError> for ProvisionError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::VpcNotFound(id) => ProvisionError::NetworkNotFound(id),
            AwsError::Api(message) => ProvisionError::ApiError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_network_not_found() {
        let err: ProvisionError = AwsError::VpcNotFound("vpc-1234".to_string()).into();
        assert!(matches!(err, ProvisionError::NetworkNotFound(id) if id == "vpc-1234"));

        let err: ProvisionError = AwsError::Api("throttled".to_string()).into();
        assert!(matches!(err, ProvisionError::ApiError(_)));
    }
}
