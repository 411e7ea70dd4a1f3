use std::net::IpAddr;

use clap::{Parser, Subcommand};
use smartbiz_http::runtime::LogFormat;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{run_analyze, run_check_config, run_serve};

#[derive(Parser, Debug)]
#[command(name = "smartbiz", version)]
#[command(about = "SmartBiz feedback service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen address (overrides SMARTBIZ_BIND)
        #[arg(long)]
        bind: Option<IpAddr>,
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze one piece of feedback and print the result as JSON
    Analyze {
        /// Feedback text
        #[arg(long)]
        content: String,
    },
    /// Validate environment configuration
    CheckConfig,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var("SMARTBIZ_LOG_FORMAT")
        .ok()
        .and_then(|value| value.parse::<LogFormat>().ok())
        .unwrap_or_default();

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { bind, port } => run_serve(bind, port).await,
        Commands::Analyze { content } => run_analyze(&content).await,
        Commands::CheckConfig => run_check_config(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
