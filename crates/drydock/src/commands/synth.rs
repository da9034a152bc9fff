use colored::Colorize;
use drydock_core::DeployConfig;
use std::path::Path;

pub async fn handle(config: &DeployConfig, out: &Path, aws: bool) -> anyhow::Result<()> {
    println!("{}", "Composing stacks...".blue());

    let deployment = super::compose_with_engine(config, aws).await?;
    let path = deployment.manifest.save(out).await?;

    println!(
        "{} {}",
        "✓ Manifest written:".green().bold(),
        path.display().to_string().cyan()
    );
    println!("  {}", deployment.manifest.summary());

    Ok(())
}
