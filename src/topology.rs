//! Static partition of the planet's cells across named regions.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::apportion::largest_remainder;
use crate::config::PlanetConfig;

/// Shares are turned into integer weights at this resolution before apportionment.
const SHARE_RESOLUTION: f64 = 1_000_000_000.0;

pub type RegionId = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    Tropical,
    Temperate,
    Arid,
    Continental,
    Polar,
}

/// Sub-ranges a climate maps its draws into, plus its pull on urbanization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateProfile {
    pub fertility: (f64, f64),
    pub habitability: (f64, f64),
    pub minerals: (f64, f64),
    pub energy: (f64, f64),
    pub urban_weight: f64,
}

impl Climate {
    pub fn profile(self) -> ClimateProfile {
        match self {
            Climate::Tropical => ClimateProfile {
                fertility: (0.8, 2.0),
                habitability: (0.5, 0.95),
                minerals: (0.1, 0.6),
                energy: (0.3, 0.8),
                urban_weight: 1.0,
            },
            Climate::Temperate => ClimateProfile {
                fertility: (0.6, 1.8),
                habitability: (0.6, 1.0),
                minerals: (0.2, 0.7),
                energy: (0.2, 0.7),
                urban_weight: 1.3,
            },
            Climate::Arid => ClimateProfile {
                fertility: (0.2, 0.9),
                habitability: (0.2, 0.6),
                minerals: (0.4, 1.0),
                energy: (0.5, 1.0),
                urban_weight: 0.7,
            },
            Climate::Continental => ClimateProfile {
                fertility: (0.4, 1.4),
                habitability: (0.4, 0.85),
                minerals: (0.3, 0.9),
                energy: (0.3, 0.9),
                urban_weight: 0.9,
            },
            Climate::Polar => ClimateProfile {
                fertility: (0.2, 0.6),
                habitability: (0.1, 0.35),
                minerals: (0.5, 1.0),
                energy: (0.4, 1.0),
                urban_weight: 0.3,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Climate::Tropical => "Tropical",
            Climate::Temperate => "Temperado",
            Climate::Arid => "Árido",
            Climate::Continental => "Continental",
            Climate::Polar => "Polar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub climate: Climate,
    pub declared_share: f64,
}

/// Regions plus the contiguous id range each one owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    regions: Vec<Region>,
    cell_counts: Vec<u32>,
    /// Last cell id owned by each region, ascending.
    last_ids: Vec<u32>,
    total_cells: u32,
}

impl Topology {
    /// Apportions `total_cells` across `regions` by declared share.
    ///
    /// Regions are numbered in the order given and receive ascending,
    /// contiguous id ranges starting at 1.
    pub fn new(regions: Vec<Region>, total_cells: u32) -> Self {
        let weights: Vec<u64> = regions
            .iter()
            .map(|region| share_weight(region.declared_share))
            .collect();
        let cell_counts: Vec<u32> = largest_remainder(u64::from(total_cells), &weights)
            .into_iter()
            .map(|count| count as u32)
            .collect();

        let mut last_ids = Vec::with_capacity(cell_counts.len());
        let mut cursor = 0u32;
        for count in &cell_counts {
            cursor += count;
            last_ids.push(cursor);
        }

        Self {
            regions,
            cell_counts,
            last_ids,
            total_cells,
        }
    }

    pub fn from_config(config: &PlanetConfig) -> Self {
        let regions = config
            .regions
            .iter()
            .enumerate()
            .map(|(index, region)| Region {
                id: index as RegionId + 1,
                name: region.name.clone(),
                climate: region.climate,
                declared_share: region.share,
            })
            .collect();
        Self::new(regions, config.total_cells)
    }

    /// Built-in planet, created on first use and shared afterwards.
    pub fn builtin() -> &'static Topology {
        static BUILTIN: OnceLock<Topology> = OnceLock::new();
        BUILTIN.get_or_init(|| Topology::from_config(&PlanetConfig::builtin()))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn total_cells(&self) -> u32 {
        self.total_cells
    }

    pub fn cell_counts(&self) -> &[u32] {
        &self.cell_counts
    }

    pub fn cell_count(&self, region_id: RegionId) -> Option<u32> {
        self.index_of(region_id).map(|index| self.cell_counts[index])
    }

    pub fn region(&self, region_id: RegionId) -> Option<&Region> {
        self.index_of(region_id).map(|index| &self.regions[index])
    }

    /// Id range owned by a region; empty regions yield `None`.
    pub fn cell_range(&self, region_id: RegionId) -> Option<RangeInclusive<u32>> {
        let index = self.index_of(region_id)?;
        let count = self.cell_counts[index];
        if count == 0 {
            return None;
        }
        let last = self.last_ids[index];
        Some(last - count + 1..=last)
    }

    /// Region owning `cell_id` (1-based). Ids outside the planet yield `None`.
    pub fn region_for_cell(&self, cell_id: u32) -> Option<&Region> {
        if cell_id == 0 || cell_id > self.total_cells {
            return None;
        }
        let index = self.last_ids.partition_point(|&last| last < cell_id);
        self.regions.get(index)
    }

    fn index_of(&self, region_id: RegionId) -> Option<usize> {
        let index = usize::from(region_id).checked_sub(1)?;
        (index < self.regions.len()).then_some(index)
    }
}

fn share_weight(share: f64) -> u64 {
    if share.is_finite() && share > 0.0 {
        (share * SHARE_RESOLUTION).round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOTAL_CELLS;

    #[test]
    fn builtin_apportionment_matches_declared_shares() {
        let topology = Topology::builtin();
        assert_eq!(topology.cell_counts(), &[10_770, 8_975, 7_180, 5_385, 3_590]);
        assert_eq!(
            topology.cell_counts().iter().sum::<u32>(),
            TOTAL_CELLS
        );
    }

    #[test]
    fn every_region_is_within_one_cell_of_its_ideal() {
        let regions = vec![
            region(1, 0.37, Climate::Arid),
            region(2, 0.29, Climate::Polar),
            region(3, 0.34, Climate::Tropical),
        ];
        let topology = Topology::new(regions, 1_001);
        assert_eq!(topology.cell_counts().iter().sum::<u32>(), 1_001);
        for region in topology.regions() {
            let ideal = region.declared_share * 1_001.0;
            let count = f64::from(topology.cell_count(region.id).unwrap_or_default());
            assert!((count - ideal).abs() <= 1.0, "{} vs {ideal}", count);
        }
    }

    #[test]
    fn ranges_are_contiguous_and_ascending() {
        let topology = Topology::builtin();
        let mut expected_start = 1;
        for region in topology.regions() {
            let range = topology.cell_range(region.id).expect("non-empty region");
            assert_eq!(*range.start(), expected_start);
            expected_start = range.end() + 1;
        }
        assert_eq!(expected_start, TOTAL_CELLS + 1);
    }

    #[test]
    fn cell_lookup_follows_ranges() {
        let topology = Topology::builtin();
        assert_eq!(topology.region_for_cell(1).map(|r| r.id), Some(1));
        assert_eq!(topology.region_for_cell(10_770).map(|r| r.id), Some(1));
        assert_eq!(topology.region_for_cell(10_771).map(|r| r.id), Some(2));
        assert_eq!(topology.region_for_cell(TOTAL_CELLS).map(|r| r.id), Some(5));
        assert!(topology.region_for_cell(0).is_none());
        assert!(topology.region_for_cell(TOTAL_CELLS + 1).is_none());
    }

    fn region(id: RegionId, share: f64, climate: Climate) -> Region {
        Region {
            id,
            name: format!("region-{id}"),
            climate,
            declared_share: share,
        }
    }
}
