//! Planet-wide constants shared by the generator and its consumers.

/// Number of cells covering the planet.
pub const TOTAL_CELLS: u32 = 35_900;

/// Surface area of a single cell.
pub const CELL_AREA_KM2: f64 = 7_500.0;

/// Exact planetary population every generated cell set sums to.
pub const TOTAL_POPULATION: u64 = 11_000_000_000;

/// Mean inhabitants per km² implied by the three constants above.
pub const GLOBAL_DENSITY: f64 = TOTAL_POPULATION as f64 / (TOTAL_CELLS as f64 * CELL_AREA_KM2);

/// Seed used whenever the caller hands over an empty one.
pub const DEFAULT_SEED: &str = "TOI-700";

pub const FERTILITY_MIN: f64 = 0.2;
pub const FERTILITY_MAX: f64 = 2.0;
pub const HABITABILITY_MIN: f64 = 0.1;
pub const HABITABILITY_MAX: f64 = 1.0;
pub const MINERAL_MIN: f64 = 0.0;
pub const MINERAL_MAX: f64 = 1.0;
pub const ENERGY_MIN: f64 = 0.0;
pub const ENERGY_MAX: f64 = 1.0;

/// Resolution of urban/rural shares (parts per million).
pub const SHARE_SCALE: u64 = 1_000_000;
