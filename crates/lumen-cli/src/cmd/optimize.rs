use crate::reports;
use clap::Args;
use lumen_client::HttpOptimizer;
use lumen_core::catalog::{CatalogStore, LampSpec};
use lumen_core::color::ColorGenerator;
use lumen_core::config::Config;
use lumen_core::drawing::StaticDrawing;
use lumen_core::surface::{MapView, MemoryMap};
use lumen_core::{LumenResult, Session};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Service area as exported by the drawing tool (GeoJSON)
    #[arg(short, long)]
    pub area: PathBuf,

    /// Lamp catalog: JSON list of lamp types. The starter catalog when omitted.
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Maximum budget, as typed into the form
    #[arg(short, long, default_value = "1000")]
    pub budget: String,

    #[arg(long)]
    pub max_lamps: Option<u32>,

    /// Write markers and coverage circles to this GeoJSON file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Seed for generated lamp colors
    #[arg(long)]
    pub seed: Option<u64>,
}

fn load_catalog(path: Option<&Path>, colors: ColorGenerator) -> LumenResult<CatalogStore> {
    let Some(path) = path else {
        return Ok(CatalogStore::starter(colors));
    };
    info!("💡 Loading lamp catalog: {}", path.display());
    let specs: Vec<LampSpec> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let mut store = CatalogStore::new(colors);
    store.import(specs)?;
    Ok(store)
}

pub async fn run(args: OptimizeArgs, config: &Config) -> LumenResult<()> {
    info!("📂 Loading service area: {}", args.area.display());
    let drawing = StaticDrawing::load_from_file(&args.area)?;

    let colors = args.seed.map(ColorGenerator::with_seed).unwrap_or_default();
    let store = load_catalog(args.catalog.as_deref(), colors)?;

    let backend = HttpOptimizer::from_settings(&config.api)?;
    info!("🔌 Optimizer: {}", backend.base_url());

    let session = Session::new(backend, config).with_catalog(store);
    session.edit_constraints(|c| {
        c.set_max_budget_text(&args.budget);
        c.set_max_lamps(args.max_lamps);
    });
    session.attach_map(MemoryMap::new(MapView::from(&config.map)));
    session.attach_drawing(drawing);

    reports::print_catalog(&session.catalog());

    let result = session.optimize().await?;

    if let Some(summary) = session.summary() {
        reports::print_summary(&summary);
    }
    reports::print_placements(&result);

    if let Some(out) = &args.out {
        let doc = session
            .with_overlay(|o| o.map().map(|m| m.to_geojson()))
            .unwrap_or_default();
        fs::write(out, serde_json::to_string_pretty(&doc)?)?;
        info!("💾 Wrote {} features to {}", doc.len(), out.display());
    }

    Ok(())
}
