mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dock")]
#[command(about = "Compose and declare AWS stacks for a containerised web app", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration resolved from the environment
    Config {
        /// Emit machine-readable JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Compose every stack and print what would be declared
    Plan {
        /// Declare through the AWS engine (requires a build with `--features aws`)
        #[arg(long)]
        aws: bool,
    },
    /// Compose every stack and write the manifest to disk
    Synth {
        /// Output directory for manifest.json
        #[arg(short, long, env = "DOCK_OUT", default_value = "dock.out")]
        out: PathBuf,
        /// Declare through the AWS engine (requires a build with `--features aws`)
        #[arg(long)]
        aws: bool,
    },
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays scriptable.
    tracing_subscriber::fmt::init();

    if matches!(cli.command, Commands::Version) {
        println!("drydock {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = drydock_core::DeployConfig::from_env();

    match cli.command {
        Commands::Config { json } => {
            commands::config::handle(&config, json)?;
        }
        Commands::Plan { aws } => {
            commands::plan::handle(&config, aws).await?;
        }
        Commands::Synth { out, aws } => {
            commands::synth::handle(&config, &out, aws).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config resolution");
        }
    }

    Ok(())
}
