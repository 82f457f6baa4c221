//! Resource capacities derived from a cell's finished attributes.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellAttributes, CellType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceNodes {
    pub food_capacity: u32,
    pub energy_capacity: u32,
    pub minerals_capacity: u32,
    pub tech_capacity: u32,
    pub influence_capacity: u32,
}

/// Declaration order doubles as the tie-break order for the dominant profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Food,
    Energy,
    Minerals,
    Tech,
    Influence,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Food,
        ResourceKind::Energy,
        ResourceKind::Minerals,
        ResourceKind::Tech,
        ResourceKind::Influence,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Food => "Agrícola",
            ResourceKind::Energy => "Energético",
            ResourceKind::Minerals => "Mineral",
            ResourceKind::Tech => "Tecnológico",
            ResourceKind::Influence => "Diplomático",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceProfile {
    pub label: String,
    pub dominant: ResourceKind,
}

/// Per-type weights; rural land feeds and extracts, cities research and negotiate.
struct TypeWeights {
    food: f64,
    energy: f64,
    minerals: f64,
    tech: f64,
    influence: f64,
}

const RURAL_WEIGHTS: TypeWeights = TypeWeights {
    food: 1.5,
    energy: 1.3,
    minerals: 1.3,
    tech: 0.2,
    influence: 0.25,
};

const URBAN_WEIGHTS: TypeWeights = TypeWeights {
    food: 0.4,
    energy: 0.6,
    minerals: 0.5,
    tech: 1.6,
    influence: 1.4,
};

const CAPACITY_SCALE: f64 = 100.0;

impl ResourceNodes {
    pub fn derive(attributes: &CellAttributes) -> Self {
        let weights = match attributes.cell_type {
            CellType::Rural => &RURAL_WEIGHTS,
            CellType::Urban => &URBAN_WEIGHTS,
        };
        let fertility = attributes.fertility;
        let habitability = attributes.habitability;

        let food = fertility * (0.5 + habitability) * weights.food;
        let energy = (0.1 + attributes.energy_potential) * weights.energy;
        let minerals = (0.05 + attributes.mineral_richness) * weights.minerals;
        let tech = (0.2 + 0.8 * habitability) * weights.tech;
        let influence = (0.3 + 0.7 * habitability) * weights.influence;

        Self {
            food_capacity: capacity(food),
            energy_capacity: capacity(energy),
            minerals_capacity: capacity(minerals),
            tech_capacity: capacity(tech),
            influence_capacity: capacity(influence),
        }
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Food => self.food_capacity,
            ResourceKind::Energy => self.energy_capacity,
            ResourceKind::Minerals => self.minerals_capacity,
            ResourceKind::Tech => self.tech_capacity,
            ResourceKind::Influence => self.influence_capacity,
        }
    }

    /// Largest capacity; earlier kinds in [`ResourceKind::ALL`] win ties.
    pub fn dominant(&self) -> ResourceKind {
        let mut best = ResourceKind::Food;
        for kind in ResourceKind::ALL {
            if self.get(kind) > self.get(best) {
                best = kind;
            }
        }
        best
    }
}

fn capacity(value: f64) -> u32 {
    (value * CAPACITY_SCALE).round().max(0.0) as u32
}

pub fn derive(cell: &Cell) -> ResourceNodes {
    ResourceNodes::derive(&cell.attributes())
}

pub fn get_resource_profile(cell: &Cell) -> ResourceProfile {
    let dominant = cell.resource_nodes.dominant();
    ResourceProfile {
        label: dominant.label().to_string(),
        dominant,
    }
}
