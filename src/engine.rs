use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::attributes::AttributeGenerator;
use crate::cell::{Cell, CellAttributes};
use crate::config::{ConfigError, PlanetConfig, Tuning};
use crate::constants::SHARE_SCALE;
use crate::population::{rebalance, split_population, urban_share_ppm, PopulationModel};
use crate::resources::ResourceNodes;
use crate::rng::{normalize_seed, SeedStream};
use crate::topology::Topology;

#[derive(Clone, Debug)]
pub struct PhaseReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct GenerationReport {
    pub seed: String,
    pub cells: usize,
    pub phases: Vec<PhaseReport>,
}

impl GenerationReport {
    pub fn total_ms(&self) -> f64 {
        self.phases.iter().map(|phase| phase.duration_ms).sum()
    }
}

/// Phase 1 output for one cell.
struct Draft {
    attributes: CellAttributes,
    raw_population: f64,
    urban_share_ppm: u64,
}

/// Deterministic cell generator for one planet configuration.
#[derive(Clone, Debug)]
pub struct Engine {
    config: Arc<PlanetConfig>,
    topology: Arc<Topology>,
    model: PopulationModel,
}

impl Engine {
    pub fn new(config: &PlanetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config.clone(), Topology::from_config(config)))
    }

    pub fn builtin() -> Self {
        Self::from_valid(PlanetConfig::builtin(), Topology::builtin().clone())
    }

    fn from_valid(config: PlanetConfig, topology: Topology) -> Self {
        Self {
            model: PopulationModel::new(&config),
            config: Arc::new(config),
            topology: Arc::new(topology),
        }
    }

    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn tuning(&self) -> &Tuning {
        &self.config.tuning
    }

    pub fn generate(&self, seed: &str) -> Vec<Cell> {
        self.generate_with_report(seed).0
    }

    pub fn generate_with_report(&self, seed: &str) -> (Vec<Cell>, GenerationReport) {
        let seed = normalize_seed(seed);
        let stream = SeedStream::new(seed);
        let mut phases = Vec::with_capacity(3);

        let start = Instant::now();
        let drafts = self.draft_cells(&stream);
        phases.push(phase("attributes", start));

        let start = Instant::now();
        let raw: Vec<f64> = drafts.iter().map(|draft| draft.raw_population).collect();
        let populations = rebalance(&raw, self.config.total_population);
        phases.push(phase("rebalance", start));

        let start = Instant::now();
        let cells: Vec<Cell> = drafts
            .into_iter()
            .zip(populations)
            .map(|(draft, population)| self.finish_cell(draft, population))
            .collect();
        phases.push(phase("resources", start));

        for report in &phases {
            debug!(
                target: "orbis::engine",
                seed,
                phase = report.name,
                duration_ms = report.duration_ms,
                "phase complete"
            );
        }
        let report = GenerationReport {
            seed: seed.to_string(),
            cells: cells.len(),
            phases,
        };
        info!(
            target: "orbis::engine",
            seed,
            cells = report.cells,
            total_ms = report.total_ms(),
            "planet generated"
        );
        (cells, report)
    }

    /// Phase 1: every cell depends only on `(seed, id, topology)`.
    fn draft_cells(&self, stream: &SeedStream) -> Vec<Draft> {
        let generator = AttributeGenerator::new(&self.topology, &self.config.tuning);
        (1..=self.topology.total_cells())
            .into_par_iter()
            .filter_map(|cell_id| {
                let attributes = generator.generate(stream, cell_id)?;
                Some(Draft {
                    raw_population: self.model.raw_population(&attributes),
                    urban_share_ppm: urban_share_ppm(stream, &attributes, &self.config.tuning),
                    attributes,
                })
            })
            .collect()
    }

    fn finish_cell(&self, draft: Draft, population_total: u64) -> Cell {
        let attributes = draft.attributes;
        let (population_urban, population_rural) =
            split_population(population_total, draft.urban_share_ppm);
        let region_name = self
            .topology
            .region(attributes.region_id)
            .map(|region| region.name.clone())
            .unwrap_or_default();
        let urban_share = draft.urban_share_ppm as f64 / SHARE_SCALE as f64;

        Cell {
            id: attributes.id,
            region_id: attributes.region_id,
            region_name,
            climate: attributes.climate,
            cell_type: attributes.cell_type,
            fertility: attributes.fertility,
            habitability: attributes.habitability,
            mineral_richness: attributes.mineral_richness,
            energy_potential: attributes.energy_potential,
            population_total,
            population_urban,
            population_rural,
            urban_share,
            rural_share: (SHARE_SCALE - draft.urban_share_ppm) as f64 / SHARE_SCALE as f64,
            resource_nodes: ResourceNodes::derive(&attributes),
            owner_state_id: None,
        }
    }
}

fn phase(name: &'static str, start: Instant) -> PhaseReport {
    PhaseReport {
        name,
        duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
    }
}

/// Full uncached generation on the built-in planet.
pub fn generate_all_cells_rebalanced(seed: &str) -> Vec<Cell> {
    Engine::builtin().generate(seed)
}
