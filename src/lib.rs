pub mod aggregate;
pub mod apportion;
pub mod attributes;
pub mod cell;
pub mod config;
pub mod constants;
pub mod engine;
pub mod population;
pub mod query;
pub mod resources;
pub mod rng;
pub mod store;
pub mod topology;
pub mod web;

pub use aggregate::{compute_global_totals, compute_region_totals, GlobalTotals, RegionTotals};
pub use cell::{Cell, CellType};
pub use config::{ConfigError, ConfigLoader, PlanetConfig};
pub use constants::{CELL_AREA_KM2, GLOBAL_DENSITY, TOTAL_CELLS, TOTAL_POPULATION};
pub use engine::{generate_all_cells_rebalanced, Engine, GenerationReport};
pub use resources::{get_resource_profile, ResourceNodes, ResourceProfile};
pub use store::CellStore;
pub use topology::{Climate, Region, Topology};
