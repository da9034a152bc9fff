use colored::Colorize;
use drydock_core::DeployConfig;

pub fn handle(config: &DeployConfig, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("{}", "Resolved configuration:".bold());
    println!("  stack name:    {}", config.stack_name.cyan());
    println!("  environment:   {}", config.environment.cyan());
    println!("  region:        {}", config.region);
    if config.account_id.is_empty() {
        println!("  account:       {}", "(resolved by the engine)".dimmed());
    } else {
        println!("  account:       {}", config.account_id);
    }
    if config.vpc_id.is_empty() {
        println!("  network:       declare {}", config.vpc_name.cyan());
    } else {
        println!("  network:       lookup {}", config.vpc_id.cyan());
    }
    println!(
        "  tasks:         cpu {}, memory {} MiB, desired {}",
        config.task_cpu, config.task_memory_mib, config.desired_count
    );
    match config.autoscale_max {
        Some(max) => println!("  autoscale:     up to {max} tasks"),
        None => println!("  autoscale:     pinned at the desired count"),
    }
    println!(
        "  log retention: {}",
        if config.retain_logs { "30 days" } else { "1 day" }
    );
    println!(
        "  database:      {} (user {})",
        config.qualified_db_name(),
        config.db_user
    );
    if config.db_public_ingress {
        println!(
            "  {}",
            "warning: database port open to the internet".yellow().bold()
        );
    }

    println!();
    println!("{}", "Stacks:".bold());
    for name in [
        config.network_stack_name(),
        config.cluster_stack_name(),
        config.service_stack_name("ui"),
        config.service_stack_name("api"),
        config.datastore_stack_name(),
    ] {
        println!("  - {}", name.cyan());
    }

    Ok(())
}
