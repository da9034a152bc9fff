use colored::Colorize;
use drydock_core::DeployConfig;

pub async fn handle(config: &DeployConfig, aws: bool) -> anyhow::Result<()> {
    println!("{}", "Composing stacks...".blue());

    let deployment = super::compose_with_engine(config, aws).await?;

    match deployment.network.vpc_id() {
        Some(id) => println!("Network: existing VPC {}", id.cyan()),
        None => println!("Network: {} will be declared", config.vpc_name.cyan()),
    }

    // Stacks in declaration order, resources in submission order.
    for handle in &deployment.handles {
        let Some(stack) = deployment.manifest.stack(&handle.stack) else {
            continue;
        };

        println!();
        if stack.depends_on.is_empty() {
            println!("{}", stack.name.cyan().bold());
        } else {
            println!(
                "{} {}",
                stack.name.cyan().bold(),
                format!("(after {})", stack.depends_on.join(", ")).dimmed()
            );
        }
        for resource in &stack.resources {
            println!("  {:<20} {}", resource.kind, resource.logical_id);
        }
    }

    println!();
    println!(
        "{}",
        format!("✓ Plan complete: {}", deployment.manifest.summary())
            .green()
            .bold()
    );

    Ok(())
}
