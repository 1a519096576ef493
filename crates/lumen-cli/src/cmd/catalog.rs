use crate::reports;
use clap::Args;
use lumen_core::catalog::CatalogStore;
use lumen_core::color::ColorGenerator;
use lumen_core::config::Config;
use lumen_core::LumenResult;

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub config: Config,

    /// Number of lamp types to add
    #[arg(short = 'n', long, default_value_t = 2)]
    pub count: usize,

    /// Start from the two starter lamp types
    #[arg(long, default_value_t = false)]
    pub starter: bool,

    /// Seed for generated lamp colors
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print a table instead of JSON
    #[arg(long, default_value_t = false)]
    pub table: bool,
}

/// Prints a catalog that `optimize --catalog` accepts.
pub fn run(args: CatalogArgs, config: &Config) -> LumenResult<()> {
    let colors = args.seed.map(ColorGenerator::with_seed).unwrap_or_default();
    let mut store = if args.starter {
        CatalogStore::starter(colors)
    } else {
        CatalogStore::new(colors)
    };

    for _ in 0..args.count {
        store.add(&config.lamps);
    }

    let catalog = store.snapshot();
    if args.table {
        reports::print_catalog(&catalog);
    } else {
        println!("{}", serde_json::to_string_pretty(&catalog.to_wire())?);
    }
    Ok(())
}
