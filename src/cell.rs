use serde::{Deserialize, Serialize};

use crate::resources::ResourceNodes;
use crate::topology::{Climate, RegionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Rural,
    Urban,
}

impl CellType {
    pub fn is_urban(self) -> bool {
        matches!(self, CellType::Urban)
    }
}

/// Seed-derived physical attributes of one cell, before any population exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellAttributes {
    pub id: u32,
    pub region_id: RegionId,
    pub climate: Climate,
    pub cell_type: CellType,
    pub fertility: f64,
    pub habitability: f64,
    pub mineral_richness: f64,
    pub energy_potential: f64,
}

/// A finished cell. Built once per seed and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: u32,
    pub region_id: RegionId,
    pub region_name: String,
    pub climate: Climate,
    #[serde(rename = "type")]
    pub cell_type: CellType,
    pub fertility: f64,
    pub habitability: f64,
    pub mineral_richness: f64,
    pub energy_potential: f64,
    pub population_total: u64,
    pub population_urban: u64,
    pub population_rural: u64,
    pub urban_share: f64,
    pub rural_share: f64,
    pub resource_nodes: ResourceNodes,
    /// Always `None` here; ownership belongs to game state.
    pub owner_state_id: Option<u64>,
}

impl Cell {
    pub fn attributes(&self) -> CellAttributes {
        CellAttributes {
            id: self.id,
            region_id: self.region_id,
            climate: self.climate,
            cell_type: self.cell_type,
            fertility: self.fertility,
            habitability: self.habitability,
            mineral_richness: self.mineral_richness,
            energy_potential: self.energy_potential,
        }
    }

    pub fn is_urban(&self) -> bool {
        self.cell_type.is_urban()
    }
}
