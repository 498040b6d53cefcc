//! Structura CLI - merge nearby structures into cluster records

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use structura_algorithms::{MergeParams, MergeStrategy, SelectionOrder, StructureMerge};
use structura_core::io::{read_structures, write_clusters, WriteOptions};
use structura_core::{Algorithm, LoadOptions, StructureSet, CRS};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "structura")]
#[command(author, version, about = "Merge structures within a given radius", long_about = None)]
struct Cli {
    /// Input GeoJSON file of Point structures
    #[arg(short = 'i', long = "input_file", visible_alias = "input-file")]
    input_file: PathBuf,

    /// Output GeoJSON file for merged records (parent directories are created)
    #[arg(short = 'o', long = "output_file", visible_alias = "output-file")]
    output_file: PathBuf,

    /// Merging radius, in the linear unit of the input frame
    #[arg(short, long, default_value = "20", allow_negative_numbers = true)]
    radius: f64,

    /// Property holding the footprint area
    #[arg(long, default_value = "area_in_meters")]
    area_field: String,

    /// Property holding the region (e.g. district)
    #[arg(long, default_value = "d")]
    region_field: String,

    /// EPSG code the output is tagged with
    #[arg(long, default_value = "32636")]
    output_epsg: u32,

    /// Selection order for the greedy merger: sparsest, densest.
    /// `densest` follows the original frequency order and may merge a
    /// chain A-B-C (only adjacent pairs within the radius) into one record
    #[arg(long, default_value = "sparsest")]
    order: String,

    /// Grouping strategy: greedy, components
    #[arg(long, default_value = "greedy")]
    strategy: String,

    /// Indent the output document
    #[arg(long)]
    pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn parse_order(s: &str) -> Result<SelectionOrder> {
    match s.to_lowercase().as_str() {
        "sparsest" | "sparsest-first" | "s" => Ok(SelectionOrder::SparsestFirst),
        "densest" | "densest-first" | "d" => Ok(SelectionOrder::DensestFirst),
        _ => anyhow::bail!("Unknown order: {}. Use sparsest or densest.", s),
    }
}

fn parse_strategy(s: &str) -> Result<MergeStrategy> {
    match s.to_lowercase().as_str() {
        "greedy" | "g" => Ok(MergeStrategy::Greedy),
        "components" | "connected" | "c" => Ok(MergeStrategy::Components),
        _ => anyhow::bail!("Unknown strategy: {}. Use greedy or components.", s),
    }
}

fn load(path: &Path, options: &LoadOptions) -> Result<StructureSet> {
    let pb = spinner("Reading structures...");
    let set = read_structures(path, options);
    pb.finish_and_clear();
    let set = set.with_context(|| format!("Failed to load input {}", path.display()))?;
    if let Some(crs) = set.crs() {
        info!("Input frame: {}", crs);
    }
    Ok(set)
}

fn done(path: &Path, elapsed: Duration) {
    println!("Results saved to: {}", path.display());
    println!("Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let params = MergeParams {
        radius: cli.radius,
        order: parse_order(&cli.order)?,
        strategy: parse_strategy(&cli.strategy)?,
    };
    params.validate().context("Invalid merge parameters")?;

    let load_options = LoadOptions {
        area_field: cli.area_field,
        region_field: cli.region_field,
    };

    println!("Loading input data from: {}", cli.input_file.display());
    let set = load(&cli.input_file, &load_options)?;
    println!("Before merging: {} structures", set.len());

    let algorithm = StructureMerge;
    println!("Processing {}...", algorithm.name());
    let start = Instant::now();
    let outcome = algorithm
        .execute(set, params)
        .context("Failed to merge structures")?;
    let elapsed = start.elapsed();
    println!("After merging: {} structures", outcome.records.len());
    info!("{}", outcome.summary);

    let write_options = WriteOptions {
        crs: CRS::from_epsg(cli.output_epsg),
        pretty: cli.pretty,
    };
    let pb = spinner("Writing output...");
    let written = write_clusters(&outcome.records, &cli.output_file, &write_options);
    pb.finish_and_clear();
    written.with_context(|| format!("Failed to write output {}", cli.output_file.display()))?;

    done(&cli.output_file, elapsed);
    Ok(())
}
