//! Seed-file loading for the zone server.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use dovetail::models::{CategoryRecord, DeliveryZone, ZoneDto};

/// Load zones from a JSON seed file.
///
/// Documents with degenerate boundaries are skipped with a warning; one
/// bad zone should not keep the server down.
pub fn load_zones(path: &Path) -> Result<Vec<DeliveryZone>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read zone seed file {}", path.display()))?;
    let dtos: Vec<ZoneDto> =
        serde_json::from_str(&content).context("Failed to parse zone seed file")?;

    let mut zones = Vec::with_capacity(dtos.len());
    for dto in dtos {
        match DeliveryZone::try_from(dto) {
            Ok(zone) => zones.push(zone),
            Err(e) => warn!("Skipping seed zone: {}", e),
        }
    }
    Ok(zones)
}

/// Load flat category records from a JSON seed file.
pub fn load_categories(path: &Path) -> Result<Vec<CategoryRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read category seed file {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse category seed file")
}
