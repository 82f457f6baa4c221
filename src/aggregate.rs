//! Region and planet rollups over a finished cell set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellType};
use crate::topology::{Climate, RegionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTotals {
    pub region_id: RegionId,
    pub region_name: String,
    pub climate: Climate,
    pub cell_count: u64,
    pub urban_cells: u64,
    pub rural_cells: u64,
    pub total_population: u64,
    pub urban_population: u64,
    pub rural_population: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTotals {
    pub region_count: u64,
    pub cell_count: u64,
    pub urban_cells: u64,
    pub rural_cells: u64,
    pub total: u64,
    pub urban_population: u64,
    pub rural_population: u64,
    /// Inhabitants of urban-type cells, whatever their own split.
    pub urban_cell_population: u64,
    pub rural_cell_population: u64,
}

impl GlobalTotals {
    pub fn average_per_urban_cell(&self) -> f64 {
        average(self.urban_cell_population, self.urban_cells)
    }

    pub fn average_per_rural_cell(&self) -> f64 {
        average(self.rural_cell_population, self.rural_cells)
    }

    pub fn urban_cell_fraction(&self) -> f64 {
        average(self.urban_cells, self.cell_count)
    }
}

fn average(numerator: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator as f64 / count as f64
    }
}

/// Groups by region id in one pass; output is sorted by region id.
pub fn compute_region_totals(cells: &[Cell]) -> Vec<RegionTotals> {
    let mut by_region: BTreeMap<RegionId, RegionTotals> = BTreeMap::new();
    for cell in cells {
        let entry = by_region
            .entry(cell.region_id)
            .or_insert_with(|| RegionTotals {
                region_id: cell.region_id,
                region_name: cell.region_name.clone(),
                climate: cell.climate,
                cell_count: 0,
                urban_cells: 0,
                rural_cells: 0,
                total_population: 0,
                urban_population: 0,
                rural_population: 0,
            });
        entry.cell_count += 1;
        match cell.cell_type {
            CellType::Urban => entry.urban_cells += 1,
            CellType::Rural => entry.rural_cells += 1,
        }
        entry.total_population += cell.population_total;
        entry.urban_population += cell.population_urban;
        entry.rural_population += cell.population_rural;
    }
    by_region.into_values().collect()
}

pub fn compute_global_totals(cells: &[Cell]) -> GlobalTotals {
    let mut regions = BTreeSet::new();
    let mut totals = GlobalTotals::default();
    for cell in cells {
        regions.insert(cell.region_id);
        totals.cell_count += 1;
        match cell.cell_type {
            CellType::Urban => {
                totals.urban_cells += 1;
                totals.urban_cell_population += cell.population_total;
            }
            CellType::Rural => {
                totals.rural_cells += 1;
                totals.rural_cell_population += cell.population_total;
            }
        }
        totals.total += cell.population_total;
        totals.urban_population += cell.population_urban;
        totals.rural_population += cell.population_rural;
    }
    totals.region_count = regions.len() as u64;
    totals
}
