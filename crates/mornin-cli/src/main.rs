use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mornin", version, about = "Wake-up time planner")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the next wake-up with live traffic and weather
    Plan(commands::plan::PlanArgs),
    /// Compute a schedule offline from explicit travel and weather figures
    Compute(commands::compute::ComputeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Sleeper profiles
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Address lookup (autocomplete, geocoding, reverse geocoding)
    Address {
        #[command(subcommand)]
        action: commands::address::AddressAction,
    },
    /// Weather lookup
    Weather {
        #[command(subcommand)]
        action: commands::weather::WeatherAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() {
    // stdout carries results; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Compute(args) => commands::compute::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Address { action } => commands::address::run(action),
        Commands::Weather { action } => commands::weather::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
