use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use lumen_core::config::Config;
use lumen_core::LumenResult;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file. Flags and environment variables given explicitly override it.
    #[arg(global = true, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Place lamps over a drawn service area
    Optimize(cmd::optimize::OptimizeArgs),
    /// Generate a lamp catalog
    Catalog(cmd::catalog::CatalogArgs),
    /// Check that the optimizer is reachable
    Health(cmd::health::HealthArgs),
}

impl Commands {
    fn settings(&self) -> &Config {
        match self {
            Commands::Optimize(args) => &args.config,
            Commands::Catalog(args) => &args.config,
            Commands::Health(args) => &args.config,
        }
    }
}

fn resolve_config(file: Option<&Path>, cli: &Config, matches: &ArgMatches) -> LumenResult<Config> {
    match file {
        Some(path) => {
            info!("⚙️  Loading settings from {}", path.display());
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli, matches);
            config.validate()?;
            Ok(config)
        }
        None => {
            cli.validate()?;
            Ok(cli.clone())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Settings are flattened into each subcommand, so their value sources live there
    let sub_matches = matches.subcommand().map(|(_, m)| m).unwrap_or(&matches);

    let config = resolve_config(cli.config.as_deref(), cli.command.settings(), sub_matches)
        .unwrap_or_else(|e| {
            error!("❌ {}", e);
            process::exit(1);
        });

    let outcome = match cli.command {
        Commands::Optimize(args) => cmd::optimize::run(args, &config).await,
        Commands::Catalog(args) => cmd::catalog::run(args, &config),
        Commands::Health(_) => cmd::health::run(&config).await,
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
