pub mod config;
pub mod plan;
pub mod synth;

use drydock_core::DeployConfig;
use drydock_engine::{Deployment, LocalEngine, compose};

/// Compose every stack against the engine picked on the command line.
pub async fn compose_with_engine(config: &DeployConfig, aws: bool) -> anyhow::Result<Deployment> {
    if aws {
        return compose_with_aws(config).await;
    }
    let engine = LocalEngine::new();
    Ok(compose(config, &engine).await?)
}

#[cfg(feature = "aws")]
async fn compose_with_aws(config: &DeployConfig) -> anyhow::Result<Deployment> {
    use colored::Colorize;
    use drydock_engine::{ProvisionEngine, ProvisionError};

    let engine = drydock_aws::AwsEngine::connect(Some(config.region.clone())).await;
    let auth = engine.check_auth().await?;
    if !auth.authenticated {
        let reason = auth
            .error
            .unwrap_or_else(|| "credentials unavailable".to_string());
        return Err(ProvisionError::AuthenticationFailed(reason).into());
    }
    if let Some(account) = &auth.account_info {
        println!("Authenticated: {}", account.cyan());
    }
    Ok(compose(config, &engine).await?)
}

#[cfg(not(feature = "aws"))]
async fn compose_with_aws(_config: &DeployConfig) -> anyhow::Result<Deployment> {
    anyhow::bail!(
        "This build does not include the aws feature; rebuild with `cargo build --features aws`"
    )
}
