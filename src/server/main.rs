//! Zone API server.
//!
//! HTTP surface for the admin console and storefront: zone CRUD,
//! locate-by-coordinates, and the category tree.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dovetail::categories::build_tree;
use dovetail::models::{CategoryNode, CategoryRecord, DeliveryZone, ZoneDto};
use dovetail::repository::{
    CategoryRepository, InMemoryCategoryRepository, InMemoryZoneRepository, RepositoryError,
    ZoneRepository,
};
use dovetail::zones::{ZoneLocator, ZoneSpatialIndex};

mod seed;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Delivery zone API server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Zone seed file (JSON array of zone documents)
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Category seed file (JSON array of category records)
    #[arg(long)]
    categories: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    zones: InMemoryZoneRepository,
    categories: InMemoryCategoryRepository,
    /// Swapped wholesale whenever the zone set changes.
    locator: RwLock<Arc<ZoneLocator>>,
}

impl AppState {
    fn rebuild_locator(&self) {
        let locator = Arc::new(ZoneLocator::new(ZoneSpatialIndex::build(self.zones.list())));
        *self.locator.write().expect("locator lock poisoned") = locator;
    }

    fn locator(&self) -> Arc<ZoneLocator> {
        Arc::clone(&self.locator.read().expect("locator lock poisoned"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Dovetail Zone Server");

    let zone_seed = match &args.zones {
        Some(path) => seed::load_zones(path)?,
        None => Vec::new(),
    };
    let category_seed = match &args.categories {
        Some(path) => seed::load_categories(path)?,
        None => Vec::new(),
    };
    info!(
        "Seeded {} zones, {} categories",
        zone_seed.len(),
        category_seed.len()
    );

    let locator = Arc::new(ZoneLocator::new(ZoneSpatialIndex::build(zone_seed.clone())));
    let state = Arc::new(AppState {
        zones: InMemoryZoneRepository::with_zones(zone_seed),
        categories: InMemoryCategoryRepository::with_records(category_seed),
        locator: RwLock::new(locator),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/zones", get(list_zones_handler).post(create_zone_handler))
        .route(
            "/v1/zones/{id}",
            get(get_zone_handler)
                .put(update_zone_handler)
                .delete(delete_zone_handler),
        )
        .route("/v1/zones/{id}/area", get(zone_area_handler))
        .route("/v1/locate", get(locate_handler))
        .route("/v1/categories", get(list_categories_handler))
        .route("/v1/categories/tree", get(category_tree_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        zones: state.locator().index().len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    zones: usize,
}

async fn list_zones_handler(State(state): State<Arc<AppState>>) -> Json<Vec<DeliveryZone>> {
    Json(state.zones.list())
}

async fn create_zone_handler(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<ZoneDto>,
) -> Result<(StatusCode, Json<DeliveryZone>), (StatusCode, String)> {
    let zone = DeliveryZone::try_from(dto)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    state.zones.insert(zone.clone()).map_err(repo_error)?;
    state.rebuild_locator();

    Ok((StatusCode::CREATED, Json(zone)))
}

async fn get_zone_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeliveryZone>, (StatusCode, String)> {
    state.zones.get(id).map(Json).map_err(repo_error)
}

async fn update_zone_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(mut dto): Json<ZoneDto>,
) -> Result<Json<DeliveryZone>, (StatusCode, String)> {
    // The path id wins over whatever the body claims.
    dto.id = id;
    let zone = DeliveryZone::try_from(dto)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    state.zones.update(zone.clone()).map_err(repo_error)?;
    state.rebuild_locator();

    Ok(Json(zone))
}

async fn delete_zone_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeliveryZone>, (StatusCode, String)> {
    let removed = state.zones.delete(id).map_err(repo_error)?;
    state.rebuild_locator();
    Ok(Json(removed))
}

#[derive(Serialize)]
struct ZoneAreaResponse {
    zone_id: i64,
    area_sq_km: f64,
}

async fn zone_area_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ZoneAreaResponse>, (StatusCode, String)> {
    let zone = state.zones.get(id).map_err(repo_error)?;
    Ok(Json(ZoneAreaResponse {
        zone_id: zone.id,
        area_sq_km: ZoneLocator::zone_area_sq_km(&zone),
    }))
}

#[derive(Deserialize)]
struct LocateParams {
    lat: f64,
    lng: f64,
    /// Restrict to active zones (storefront behavior)
    #[serde(default)]
    active: bool,
}

#[derive(Serialize)]
struct ZoneMatch {
    id: i64,
    name: String,
    active: bool,
}

async fn locate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocateParams>,
) -> Json<Vec<ZoneMatch>> {
    let locator = state.locator();
    let zones = if params.active {
        locator.locate_active(params.lat, params.lng)
    } else {
        locator.locate(params.lat, params.lng)
    };

    Json(
        zones
            .iter()
            .map(|z| ZoneMatch {
                id: z.id,
                name: z.name.clone(),
                active: z.active,
            })
            .collect(),
    )
}

async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<CategoryRecord>> {
    Json(state.categories.list())
}

async fn category_tree_handler(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryNode>> {
    Json(build_tree(&state.categories.list()))
}

fn repo_error(err: RepositoryError) -> (StatusCode, String) {
    let status = match err {
        RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RepositoryError::DuplicateId { .. } => StatusCode::CONFLICT,
    };
    (status, err.to_string())
}
