use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use orbis::{
    aggregate::{compute_global_totals, compute_region_totals, GlobalTotals, RegionTotals},
    cell::CellType,
    config::ConfigLoader,
    engine::Engine,
    query::CellFilter,
    rng::normalize_seed,
    store::{slice_by_id, CellStore},
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Deterministic planetary cell generator")]
struct Cli {
    /// Planet YAML file (uses the built-in planet when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print generated cells as JSON
    Generate(GenerateArgs),
    /// Print region and planet totals as JSON
    Totals {
        #[arg(long, default_value = "")]
        seed: String,
    },
    /// Serve the read-only query API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Seed generated before the listener starts
        #[arg(long)]
        warm: Option<String>,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(long, default_value = "")]
    seed: String,
    /// First cell id (1-based, inclusive)
    #[arg(long, default_value_t = 1)]
    start: u32,
    /// Last cell id (inclusive); defaults to the whole planet
    #[arg(long)]
    end: Option<u32>,
    #[arg(long)]
    region: Option<u16>,
    #[arg(long = "type", value_parser = parse_cell_type)]
    cell_type: Option<CellType>,
    #[arg(long)]
    fertility_min: Option<f64>,
    #[arg(long)]
    fertility_max: Option<f64>,
}

#[derive(Serialize)]
struct TotalsReport<'a> {
    planet: &'a str,
    seed: &'a str,
    exported_at: DateTime<Utc>,
    regions: Vec<RegionTotals>,
    global: GlobalTotals,
}

fn parse_cell_type(value: &str) -> Result<CellType, String> {
    match value.to_ascii_lowercase().as_str() {
        "urban" => Ok(CellType::Urban),
        "rural" => Ok(CellType::Rural),
        other => Err(format!("unknown cell type '{other}' (expected urban or rural)")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let engine = match &cli.config {
        Some(path) => {
            let config = ConfigLoader::new(".").load(path)?;
            info!(planet = %config.name, path = %path.display(), "loaded planet config");
            Engine::new(&config)?
        }
        None => Engine::builtin(),
    };

    match cli.command {
        Command::Generate(args) => generate(&engine, args),
        Command::Totals { seed } => totals(&engine, &seed),
        Command::Serve { host, port, warm } => {
            let store = Arc::new(CellStore::new(engine));
            if let Some(seed) = warm {
                store.cells(&seed);
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::run(WebServerConfig { store, host, port }))
        }
    }
}

fn generate(engine: &Engine, args: GenerateArgs) -> Result<()> {
    let cells = engine.generate(&args.seed);
    let end = args.end.unwrap_or(engine.topology().total_cells());
    let filter = CellFilter {
        region_id: args.region,
        cell_type: args.cell_type,
        fertility_min: args.fertility_min,
        fertility_max: args.fertility_max,
        ..CellFilter::default()
    };
    let selected = filter.apply(slice_by_id(&cells, args.start, end));
    println!("{}", serde_json::to_string_pretty(&selected)?);
    Ok(())
}

fn totals(engine: &Engine, seed: &str) -> Result<()> {
    let cells = engine.generate(seed);
    let report = TotalsReport {
        planet: &engine.config().name,
        seed: normalize_seed(seed),
        exported_at: Utc::now(),
        regions: compute_region_totals(&cells),
        global: compute_global_totals(&cells),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
