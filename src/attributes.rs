//! Per-cell attribute synthesis. Each cell depends only on the seed, its id
//! and the static topology.

use crate::cell::{CellAttributes, CellType};
use crate::config::Tuning;
use crate::constants::{
    ENERGY_MAX, ENERGY_MIN, FERTILITY_MAX, FERTILITY_MIN, HABITABILITY_MAX, HABITABILITY_MIN,
    MINERAL_MAX, MINERAL_MIN,
};
use crate::rng::{SeedStream, StreamTag};
use crate::topology::Topology;

pub struct AttributeGenerator<'a> {
    topology: &'a Topology,
    /// Indexed like `topology.regions()`.
    urban_probability: Vec<f64>,
}

impl<'a> AttributeGenerator<'a> {
    pub fn new(topology: &'a Topology, tuning: &Tuning) -> Self {
        Self {
            topology,
            urban_probability: urban_probabilities(topology, tuning.urban_cell_target),
        }
    }

    pub fn urban_probability(&self, region_index: usize) -> Option<f64> {
        self.urban_probability.get(region_index).copied()
    }

    /// Attributes of `cell_id`, or `None` for ids outside the planet.
    pub fn generate(&self, stream: &SeedStream, cell_id: u32) -> Option<CellAttributes> {
        let region = self.topology.region_for_cell(cell_id)?;
        let region_index = usize::from(region.id) - 1;
        let profile = region.climate.profile();

        let urban_roll = stream.draw(cell_id, StreamTag::Type);
        let cell_type = if urban_roll < self.urban_probability[region_index] {
            CellType::Urban
        } else {
            CellType::Rural
        };

        let fertility = biased(stream, cell_id, StreamTag::Fertility, profile.fertility)
            .clamp(FERTILITY_MIN, FERTILITY_MAX);
        let habitability = biased(stream, cell_id, StreamTag::Habitability, profile.habitability)
            .clamp(HABITABILITY_MIN, HABITABILITY_MAX);
        let mineral_richness = biased(stream, cell_id, StreamTag::Minerals, profile.minerals)
            .clamp(MINERAL_MIN, MINERAL_MAX);
        let energy_potential = biased(stream, cell_id, StreamTag::Energy, profile.energy)
            .clamp(ENERGY_MIN, ENERGY_MAX);

        Some(CellAttributes {
            id: cell_id,
            region_id: region.id,
            climate: region.climate,
            cell_type,
            fertility,
            habitability,
            mineral_richness,
            energy_potential,
        })
    }
}

/// Climate-weighted urban probability per region, scaled so the expected
/// planet-wide urban fraction equals `target`.
fn urban_probabilities(topology: &Topology, target: f64) -> Vec<f64> {
    let total = f64::from(topology.total_cells());
    let mean_weight = if total > 0.0 {
        topology
            .regions()
            .iter()
            .zip(topology.cell_counts())
            .map(|(region, &count)| f64::from(count) * region.climate.profile().urban_weight)
            .sum::<f64>()
            / total
    } else {
        0.0
    };

    topology
        .regions()
        .iter()
        .map(|region| {
            if mean_weight > 0.0 {
                (target * region.climate.profile().urban_weight / mean_weight).clamp(0.0, 1.0)
            } else {
                target
            }
        })
        .collect()
}

fn biased(stream: &SeedStream, cell_id: u32, tag: StreamTag, (min, max): (f64, f64)) -> f64 {
    round3(stream.draw_range(cell_id, tag, min, max))
}

fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Climate;

    #[test]
    fn expected_urban_fraction_matches_target() {
        let topology = Topology::builtin();
        let generator = AttributeGenerator::new(topology, &Tuning::default());
        let expected: f64 = topology
            .cell_counts()
            .iter()
            .enumerate()
            .map(|(index, &count)| f64::from(count) * generator.urban_probability(index).unwrap())
            .sum::<f64>()
            / f64::from(topology.total_cells());
        assert!((expected - 0.20).abs() < 1e-9, "expected fraction {expected}");
    }

    #[test]
    fn temperate_regions_urbanize_more_than_polar_ones() {
        let topology = Topology::builtin();
        let generator = AttributeGenerator::new(topology, &Tuning::default());
        let temperate = topology
            .regions()
            .iter()
            .position(|r| r.climate == Climate::Temperate)
            .unwrap();
        let polar = topology
            .regions()
            .iter()
            .position(|r| r.climate == Climate::Polar)
            .unwrap();
        assert!(
            generator.urban_probability(temperate).unwrap()
                > generator.urban_probability(polar).unwrap()
        );
    }

    #[test]
    fn attributes_respect_documented_bounds() {
        let topology = Topology::builtin();
        let generator = AttributeGenerator::new(topology, &Tuning::default());
        let stream = SeedStream::new("bounds");
        for id in (1..=topology.total_cells()).step_by(97) {
            let cell = generator.generate(&stream, id).expect("id inside planet");
            assert!((FERTILITY_MIN..=FERTILITY_MAX).contains(&cell.fertility));
            assert!((HABITABILITY_MIN..=HABITABILITY_MAX).contains(&cell.habitability));
            assert!((MINERAL_MIN..=MINERAL_MAX).contains(&cell.mineral_richness));
            assert!((ENERGY_MIN..=ENERGY_MAX).contains(&cell.energy_potential));
        }
    }

    #[test]
    fn ids_outside_the_planet_generate_nothing() {
        let topology = Topology::builtin();
        let generator = AttributeGenerator::new(topology, &Tuning::default());
        let stream = SeedStream::new("edge");
        assert!(generator.generate(&stream, 0).is_none());
        assert!(generator
            .generate(&stream, topology.total_cells() + 1)
            .is_none());
    }
}
