use anyhow::Result;
use clap::{Parser, Subcommand};
use mailrelay::config::Config;

/// mailrelay - contact form to email relay
#[derive(Parser)]
#[command(name = "mailrelay")]
#[command(about = "Relay contact form submissions to an inbox over SMTP", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Report which required settings are present, without their values
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });

    match command {
        Commands::Serve { host, port } => {
            mailrelay::observability::init_observability(&config.observability)?;
            mailrelay::server::serve(config, host, port).await
        }
        Commands::CheckConfig => check_config(&config),
    }
}

fn check_config(config: &Config) -> Result<()> {
    for (name, present) in config.presence() {
        println!("{name:<12} {}", if present { "set" } else { "missing" });
    }

    let missing = config.missing_settings();
    if !missing.is_empty() {
        anyhow::bail!("missing required settings: {}", missing.join(", "));
    }

    Ok(())
}
