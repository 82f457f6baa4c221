//! Raw population weights and their exact integer rebalancing.

use tracing::warn;

use crate::apportion::largest_remainder;
use crate::cell::{CellAttributes, CellType};
use crate::config::{PlanetConfig, Tuning};
use crate::constants::SHARE_SCALE;
use crate::rng::{SeedStream, StreamTag};

/// Raw weights are rescaled so the heaviest cell maps to this integer.
const WEIGHT_RESOLUTION: f64 = (1u64 << 40) as f64;

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationModel {
    cell_area_km2: f64,
    global_density: f64,
    urban_multiplier: f64,
    rural_multiplier: f64,
}

impl PopulationModel {
    pub fn new(config: &PlanetConfig) -> Self {
        Self {
            cell_area_km2: config.cell_area_km2,
            global_density: config.global_density(),
            urban_multiplier: config.tuning.urban_multiplier,
            rural_multiplier: config.tuning.rural_multiplier,
        }
    }

    /// Unnormalized population estimate; only meaningful relative to other cells.
    pub fn raw_population(&self, cell: &CellAttributes) -> f64 {
        self.cell_area_km2
            * self.global_density
            * habitability_factor(cell.habitability)
            * fertility_factor(cell.fertility)
            * self.type_multiplier(cell.cell_type)
    }

    pub fn type_multiplier(&self, cell_type: CellType) -> f64 {
        match cell_type {
            CellType::Urban => self.urban_multiplier,
            CellType::Rural => self.rural_multiplier,
        }
    }
}

fn habitability_factor(habitability: f64) -> f64 {
    habitability
}

fn fertility_factor(fertility: f64) -> f64 {
    0.5 + 0.5 * fertility
}

/// Turns raw estimates into integers summing to exactly `total_population`.
///
/// Weights are quantized relative to the largest estimate and apportioned by
/// largest remainder, lower index first on ties. A vector without any positive
/// finite weight is split uniformly.
pub fn rebalance(raw: &[f64], total_population: u64) -> Vec<u64> {
    let max_raw = raw
        .iter()
        .copied()
        .filter(|value| value.is_finite() && *value > 0.0)
        .fold(0.0_f64, f64::max);

    if max_raw <= 0.0 {
        if !raw.is_empty() {
            warn!(
                target: "orbis::population",
                cells = raw.len(),
                "raw population has no positive weight, splitting uniformly"
            );
        }
        return largest_remainder(total_population, &vec![1; raw.len()]);
    }

    let weights: Vec<u64> = raw
        .iter()
        .map(|&value| {
            if value.is_finite() && value > 0.0 {
                (value / max_raw * WEIGHT_RESOLUTION).round() as u64
            } else {
                0
            }
        })
        .collect();
    largest_remainder(total_population, &weights)
}

/// Urban share of a cell's inhabitants in parts per [`SHARE_SCALE`].
pub fn urban_share_ppm(stream: &SeedStream, cell: &CellAttributes, tuning: &Tuning) -> u64 {
    let range = match cell.cell_type {
        CellType::Urban => tuning.urban_cell_share,
        CellType::Rural => tuning.rural_cell_share,
    };
    let share = stream.draw_range(cell.id, StreamTag::UrbanShare, range.min, range.max);
    ((share * SHARE_SCALE as f64).round() as u64).min(SHARE_SCALE)
}

/// Exact `(urban, rural)` split of one cell's population.
pub fn split_population(total: u64, urban_share_ppm: u64) -> (u64, u64) {
    let urban_ppm = urban_share_ppm.min(SHARE_SCALE);
    let parts = largest_remainder(total, &[urban_ppm, SHARE_SCALE - urban_ppm]);
    (parts[0], parts[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Climate;

    fn attributes(cell_type: CellType, fertility: f64, habitability: f64) -> CellAttributes {
        CellAttributes {
            id: 7,
            region_id: 1,
            climate: Climate::Tropical,
            cell_type,
            fertility,
            habitability,
            mineral_richness: 0.5,
            energy_potential: 0.5,
        }
    }

    #[test]
    fn urban_cells_weigh_more_than_rural_ones() {
        let model = PopulationModel::new(&PlanetConfig::builtin());
        let rural = model.raw_population(&attributes(CellType::Rural, 1.0, 0.8));
        let urban = model.raw_population(&attributes(CellType::Urban, 1.0, 0.8));
        assert!((urban / rural - 4.9).abs() < 1e-9);
    }

    #[test]
    fn rebalance_hits_the_exact_total() {
        let raw: Vec<f64> = (1..=1_000).map(|i| 1_000.0 + f64::from(i) * 0.37).collect();
        let parts = rebalance(&raw, 11_000_000_000);
        assert_eq!(parts.len(), raw.len());
        assert_eq!(parts.iter().sum::<u64>(), 11_000_000_000);
        assert!(parts.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn rebalance_preserves_proportions() {
        let parts = rebalance(&[1.0, 3.0, 6.0], 1_000);
        assert_eq!(parts, vec![100, 300, 600]);
    }

    #[test]
    fn zero_weights_fall_back_to_uniform_split() {
        let parts = rebalance(&[0.0, 0.0, 0.0, 0.0], 10);
        assert_eq!(parts, vec![3, 3, 2, 2]);
        let parts = rebalance(&[f64::NAN, -1.0], 5);
        assert_eq!(parts, vec![3, 2]);
    }

    #[test]
    fn split_is_exact() {
        assert_eq!(split_population(3, 500_000), (2, 1));
        assert_eq!(split_population(1_000_001, 800_000), (800_001, 200_000));
        for total in [0u64, 1, 7, 999_983, 4_123_456_789] {
            let (urban, rural) = split_population(total, 123_457);
            assert_eq!(urban + rural, total);
        }
    }

    #[test]
    fn urban_share_respects_type_ranges() {
        let tuning = Tuning::default();
        let stream = SeedStream::new("share");
        for id in 1..200 {
            let mut cell = attributes(CellType::Urban, 1.0, 0.5);
            cell.id = id;
            let urban = urban_share_ppm(&stream, &cell, &tuning);
            assert!((750_000..=950_000).contains(&urban));
            cell.cell_type = CellType::Rural;
            let rural = urban_share_ppm(&stream, &cell, &tuning);
            assert!((50_000..=250_000).contains(&rural));
        }
    }
}
