//! Admin CLI for zone and catalog maintenance.
//!
//! Validates zone files, computes areas, runs point lookups, renders the
//! category tree, and applies bulk seller allocations.

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dovetail::allocation::{AllocationRequest, AllocationRun};
use dovetail::categories::{build_tree, flatten};
use dovetail::models::{CategoryRecord, DeliveryZone, ZoneDto};
use dovetail::repository::InMemoryZoneRepository;
use dovetail::zones::{geometry, ZoneLocator, ZoneSpatialIndex};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "admin")]
#[command(about = "Delivery zone admin tools")]
struct Args {
    /// Config file with default zone/category file locations
    #[arg(short, long, default_value = "dovetail.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every zone boundary in the zones file
    Validate {
        /// Zones file override
        #[arg(long)]
        zones: Option<PathBuf>,
    },

    /// Print zone areas in square kilometers
    Area {
        /// Limit to a single zone
        #[arg(long)]
        zone_id: Option<i64>,
    },

    /// List zones containing a coordinate
    Locate {
        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lng: f64,

        /// Only consider active zones
        #[arg(long)]
        active: bool,
    },

    /// Render the category tree
    Tree,

    /// Bulk-assign sellers to zones from a TOML request file
    Allocate {
        /// Request file with [[assignments]] entries
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_from_file(&args.config)?;

    match args.command {
        Command::Validate { zones } => {
            validate(zones.as_deref().unwrap_or(&config.files.zones))
        }
        Command::Area { zone_id } => area(&config.files.zones, zone_id),
        Command::Locate { lat, lng, active } => locate(&config.files.zones, lat, lng, active),
        Command::Tree => tree(&config.files.categories),
        Command::Allocate { file } => allocate(&config.files.zones, &file),
    }
}

fn read_zone_dtos(path: &Path) -> Result<Vec<ZoneDto>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read zones file {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse zones file")
}

fn read_zones(path: &Path) -> Result<Vec<DeliveryZone>> {
    let mut zones = Vec::new();
    for dto in read_zone_dtos(path)? {
        let id = dto.id;
        match DeliveryZone::try_from(dto) {
            Ok(zone) => zones.push(zone),
            Err(e) => info!("Skipping zone {}: {}", id, e),
        }
    }
    Ok(zones)
}

fn validate(path: &Path) -> Result<()> {
    let dtos = read_zone_dtos(path)?;
    let total = dtos.len();
    let mut failures = 0;

    for dto in dtos {
        let id = dto.id;
        let name = dto.name.clone();
        match DeliveryZone::try_from(dto) {
            Ok(zone) => {
                println!(
                    "ok    {:>6}  {}  ({} points, {:.3} km2)",
                    id,
                    name,
                    zone.boundary.len(),
                    geometry::area_sq_km(&zone.boundary)
                );
            }
            Err(e) => {
                failures += 1;
                println!("FAIL  {:>6}  {}  {}", id, name, e);
            }
        }
    }

    println!("{}/{} zones valid", total - failures, total);
    if failures > 0 {
        anyhow::bail!("{} zones failed validation", failures);
    }
    Ok(())
}

fn area(path: &Path, zone_id: Option<i64>) -> Result<()> {
    let zones = read_zones(path)?;

    for zone in zones
        .iter()
        .filter(|z| zone_id.is_none_or(|id| z.id == id))
    {
        println!(
            "{:>6}  {}  {:.4} km2",
            zone.id,
            zone.name,
            geometry::area_sq_km(&zone.boundary)
        );
    }
    Ok(())
}

fn locate(path: &Path, lat: f64, lng: f64, active: bool) -> Result<()> {
    let zones = read_zones(path)?;
    let locator = ZoneLocator::new(ZoneSpatialIndex::build(zones));

    let matches = if active {
        locator.locate_active(lat, lng)
    } else {
        locator.locate(lat, lng)
    };

    if matches.is_empty() {
        println!("No zones contain ({}, {})", lat, lng);
        return Ok(());
    }
    for zone in matches {
        let marker = if zone.active { "" } else { " (inactive)" };
        println!("{:>6}  {}{}", zone.id, zone.name, marker);
    }
    Ok(())
}

fn tree(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read categories file {}", path.display()))?;
    let records: Vec<CategoryRecord> =
        serde_json::from_str(&content).context("Failed to parse categories file")?;

    let forest = build_tree(&records);
    for (record, depth) in flatten(&forest) {
        println!("{}{} (#{})", "  ".repeat(depth), record.name, record.id);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct AllocationFile {
    assignments: Vec<AllocationRequest>,
}

fn allocate(zones_path: &Path, request_path: &Path) -> Result<()> {
    let zones = read_zones(zones_path)?;
    let repo = InMemoryZoneRepository::with_zones(zones);

    let content = fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read allocation file {}", request_path.display()))?;
    let requests: AllocationFile =
        toml::from_str(&content).context("Failed to parse allocation file")?;

    let total = requests.assignments.len();
    info!("Allocating {} sellers", total);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let mut run = AllocationRun::new(&repo, &[]);
    for request in requests.assignments {
        run.apply(request);
        pb.inc(1);
    }
    pb.finish();

    let report = run.finish();
    for item in report.items.iter().filter(|i| !i.outcome.is_assigned()) {
        println!(
            "FAIL  {} -> zone {}: {:?}",
            item.request.seller.name, item.request.zone_id, item.outcome
        );
    }
    println!(
        "{} assigned, {} failed of {}",
        report.assigned,
        report.failed,
        report.items.len()
    );
    Ok(())
}
