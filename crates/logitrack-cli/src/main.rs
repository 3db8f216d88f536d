mod locate;
mod log;
mod register;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "logitrack")]
#[command(about = "Courier package registration from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a package for delivery or pickup
    Register {
        /// Package code: starts with 6, 13 digits
        #[arg(long)]
        package_code: String,
        /// Contact phone: 9 digits, separators allowed
        #[arg(long)]
        phone: String,
        /// Collect at the pickup point instead of delivering
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        pickup: bool,
        /// Deliver to this latitude instead of resolving the device position
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Deliver to this longitude instead of resolving the device position
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Resolve the device position once and print it
    Locate,
    /// Show locally stored registrations, most recent first
    Log {
        /// Maximum rows to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Keep tracing quiet by default; the subcommands talk on stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = logitrack_core::load_app_config_from_env()?;
    tracing::debug!(
        geolocate_url = %config.geolocate_url,
        sheet_configured = config.sheet_url.is_some(),
        "resolved configuration"
    );

    let cli = Cli::parse();
    match cli.command {
        Commands::Register {
            package_code,
            phone,
            pickup,
            lat,
            lng,
        } => {
            register::run_register(
                &config,
                register::RegisterArgs {
                    package_code,
                    phone,
                    pickup,
                    lat,
                    lng,
                },
            )
            .await
        }
        Commands::Locate => locate::run_locate(&config).await,
        Commands::Log { limit } => log::run_log(&config, limit),
    }
}
