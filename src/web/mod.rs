use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    aggregate::{compute_global_totals, compute_region_totals, GlobalTotals, RegionTotals},
    cell::{Cell, CellType},
    query::{CellFilter, Ownership},
    resources::{get_resource_profile, ResourceNodes, ResourceProfile},
    rng::normalize_seed,
    store::{slice_by_id, CellStore},
    topology::RegionId,
};

const DEFAULT_PAGE_SIZE: u32 = 100;

pub struct WebServerConfig {
    pub store: Arc<CellStore>,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedQuery {
    pub seed: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CellsQuery {
    pub seed: Option<String>,
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub region: Option<RegionId>,
    #[serde(rename = "type")]
    pub cell_type: Option<CellType>,
    pub owner: Option<u64>,
    #[serde(default)]
    pub unowned: bool,
    pub fertility_min: Option<f64>,
    pub fertility_max: Option<f64>,
    pub min_food: Option<u32>,
    pub min_energy: Option<u32>,
    pub min_minerals: Option<u32>,
    pub min_tech: Option<u32>,
    pub min_influence: Option<u32>,
}

impl CellsQuery {
    pub fn filter(&self) -> CellFilter {
        let ownership = match (self.owner, self.unowned) {
            (Some(state), _) => Ownership::OwnedBy(state),
            (None, true) => Ownership::Unowned,
            (None, false) => Ownership::Any,
        };
        CellFilter {
            region_id: self.region,
            cell_type: self.cell_type,
            ownership,
            fertility_min: self.fertility_min,
            fertility_max: self.fertility_max,
            min_resources: ResourceNodes {
                food_capacity: self.min_food.unwrap_or(0),
                energy_capacity: self.min_energy.unwrap_or(0),
                minerals_capacity: self.min_minerals.unwrap_or(0),
                tech_capacity: self.min_tech.unwrap_or(0),
                influence_capacity: self.min_influence.unwrap_or(0),
            },
        }
    }

    /// Requested id range; defaults to the first page.
    pub fn range(&self) -> (u32, u32) {
        let start = self.start.unwrap_or(1).max(1);
        let end = self
            .end
            .unwrap_or_else(|| start.saturating_add(DEFAULT_PAGE_SIZE - 1));
        (start, end)
    }
}

#[derive(Debug, Serialize)]
pub struct CellsResponse {
    pub seed: String,
    pub total_cells: u32,
    pub start: u32,
    pub end: u32,
    pub matched: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Serialize)]
pub struct CellDetail {
    pub seed: String,
    pub cell: Cell,
    pub profile: ResourceProfile,
}

type ApiResult<T> = std::result::Result<Json<T>, StatusCode>;

pub fn router(store: Arc<CellStore>) -> Router {
    Router::new()
        .route("/api/cells", get(list_cells))
        .route("/api/cells/:id", get(cell_detail))
        .route("/api/regions", get(region_totals))
        .route("/api/global", get(global_totals))
        .with_state(store)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig { store, host, port } = config;
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!(target: "orbis::web", %addr, "planet query API listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!(target: "orbis::web", "shutting down");
}

/// Generation is CPU-bound, so misses run on the blocking pool.
async fn load_cells(
    store: &Arc<CellStore>,
    seed: &str,
) -> std::result::Result<Arc<[Cell]>, StatusCode> {
    let store = Arc::clone(store);
    let seed = seed.to_string();
    tokio::task::spawn_blocking(move || store.cells(&seed))
        .await
        .map_err(|err| {
            error!(target: "orbis::web", error = %err, "generation task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

fn seed_of(seed: &Option<String>) -> String {
    normalize_seed(seed.as_deref().unwrap_or_default()).to_string()
}

async fn list_cells(
    State(store): State<Arc<CellStore>>,
    Query(query): Query<CellsQuery>,
) -> ApiResult<CellsResponse> {
    let seed = seed_of(&query.seed);
    let cells = load_cells(&store, &seed).await?;
    let (start, end) = query.range();
    let page = slice_by_id(&cells, start, end);
    let matched: Vec<Cell> = query.filter().apply(page).into_iter().cloned().collect();
    Ok(Json(CellsResponse {
        seed,
        total_cells: cells.len() as u32,
        start,
        end,
        matched: matched.len(),
        cells: matched,
    }))
}

async fn cell_detail(
    State(store): State<Arc<CellStore>>,
    Path(id): Path<u32>,
    Query(query): Query<SeedQuery>,
) -> ApiResult<CellDetail> {
    let seed = seed_of(&query.seed);
    let cells = load_cells(&store, &seed).await?;
    let cell = slice_by_id(&cells, id, id)
        .first()
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    let profile = get_resource_profile(&cell);
    Ok(Json(CellDetail {
        seed,
        cell,
        profile,
    }))
}

async fn region_totals(
    State(store): State<Arc<CellStore>>,
    Query(query): Query<SeedQuery>,
) -> ApiResult<Vec<RegionTotals>> {
    let cells = load_cells(&store, &seed_of(&query.seed)).await?;
    Ok(Json(compute_region_totals(&cells)))
}

async fn global_totals(
    State(store): State<Arc<CellStore>>,
    Query(query): Query<SeedQuery>,
) -> ApiResult<GlobalTotals> {
    let cells = load_cells(&store, &seed_of(&query.seed)).await?;
    Ok(Json(compute_global_totals(&cells)))
}
