//! Consumer-side filters over a generated cell set.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellType};
use crate::resources::ResourceNodes;
use crate::topology::RegionId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "state_id")]
pub enum Ownership {
    #[default]
    Any,
    Unowned,
    OwnedBy(u64),
}

/// All criteria are optional; an empty filter keeps every cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFilter {
    pub region_id: Option<RegionId>,
    pub cell_type: Option<CellType>,
    #[serde(default)]
    pub ownership: Ownership,
    pub fertility_min: Option<f64>,
    pub fertility_max: Option<f64>,
    /// Minimum capacity per resource; unset fields impose no floor.
    #[serde(default)]
    pub min_resources: ResourceNodes,
}

impl CellFilter {
    /// Inverted fertility bounds make the filter match nothing.
    pub fn is_satisfiable(&self) -> bool {
        match (self.fertility_min, self.fertility_max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    pub fn matches(&self, cell: &Cell) -> bool {
        if self.region_id.is_some_and(|id| id != cell.region_id) {
            return false;
        }
        if self.cell_type.is_some_and(|t| t != cell.cell_type) {
            return false;
        }
        let owned = match self.ownership {
            Ownership::Any => true,
            Ownership::Unowned => cell.owner_state_id.is_none(),
            Ownership::OwnedBy(state) => cell.owner_state_id == Some(state),
        };
        if !owned {
            return false;
        }
        if self.fertility_min.is_some_and(|min| cell.fertility < min) {
            return false;
        }
        if self.fertility_max.is_some_and(|max| cell.fertility > max) {
            return false;
        }
        meets_minimums(&cell.resource_nodes, &self.min_resources)
    }

    /// Matching cells in their original order.
    pub fn apply<'a>(&self, cells: &'a [Cell]) -> Vec<&'a Cell> {
        if !self.is_satisfiable() {
            return Vec::new();
        }
        cells.iter().filter(|cell| self.matches(cell)).collect()
    }
}

fn meets_minimums(nodes: &ResourceNodes, floor: &ResourceNodes) -> bool {
    nodes.food_capacity >= floor.food_capacity
        && nodes.energy_capacity >= floor.energy_capacity
        && nodes.minerals_capacity >= floor.minerals_capacity
        && nodes.tech_capacity >= floor.tech_capacity
        && nodes.influence_capacity >= floor.influence_capacity
}
