use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CELL_AREA_KM2, TOTAL_CELLS, TOTAL_POPULATION};
use crate::topology::Climate;

const SHARE_TOLERANCE: f64 = 1e-6;

fn default_total_cells() -> u32 {
    TOTAL_CELLS
}

fn default_total_population() -> u64 {
    TOTAL_POPULATION
}

fn default_cell_area_km2() -> f64 {
    CELL_AREA_KM2
}

fn default_urban_target() -> f64 {
    0.20
}

fn default_urban_multiplier() -> f64 {
    4.9
}

fn default_rural_multiplier() -> f64 {
    1.0
}

fn default_urban_cell_share() -> ShareRange {
    ShareRange {
        min: 0.75,
        max: 0.95,
    }
}

fn default_rural_cell_share() -> ShareRange {
    ShareRange {
        min: 0.05,
        max: 0.25,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub name: String,
    #[serde(default = "default_total_cells")]
    pub total_cells: u32,
    #[serde(default = "default_total_population")]
    pub total_population: u64,
    #[serde(default = "default_cell_area_km2")]
    pub cell_area_km2: f64,
    pub regions: Vec<RegionConfig>,
    #[serde(default)]
    pub tuning: Tuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub climate: Climate,
    pub share: f64,
}

/// Coefficients shaping the generated planet. Only their effects are fixed;
/// the exact totals are enforced by the rebalancer regardless of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Expected fraction of urban cells planet-wide.
    #[serde(default = "default_urban_target")]
    pub urban_cell_target: f64,
    #[serde(default = "default_urban_multiplier")]
    pub urban_multiplier: f64,
    #[serde(default = "default_rural_multiplier")]
    pub rural_multiplier: f64,
    /// Urban share of an urban cell's inhabitants.
    #[serde(default = "default_urban_cell_share")]
    pub urban_cell_share: ShareRange,
    /// Urban share of a rural cell's inhabitants.
    #[serde(default = "default_rural_cell_share")]
    pub rural_cell_share: ShareRange,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            urban_cell_target: default_urban_target(),
            urban_multiplier: default_urban_multiplier(),
            rural_multiplier: default_rural_multiplier(),
            urban_cell_share: default_urban_cell_share(),
            rural_cell_share: default_rural_cell_share(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("planet must define at least one region")]
    NoRegions,
    #[error("region '{0}' defined more than once")]
    DuplicateRegion(String),
    #[error("region '{name}' has invalid share {share}")]
    InvalidShare { name: String, share: f64 },
    #[error("region shares sum to {0}, expected 1")]
    SharesDoNotSumToOne(f64),
    #[error("planet must have at least one cell per region ({regions} regions, {cells} cells)")]
    TooFewCells { cells: u32, regions: usize },
    #[error("total population must be greater than zero")]
    ZeroPopulation,
    #[error("cell area must be positive, got {0}")]
    InvalidCellArea(f64),
    #[error("urban cell target {0} must lie in [0, 1]")]
    InvalidUrbanTarget(f64),
    #[error("{name} multiplier must be positive, got {value}")]
    InvalidMultiplier { name: &'static str, value: f64 },
    #[error("{name} share range [{min}, {max}] must be ordered within [0, 1]")]
    InvalidShareRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
}

impl PlanetConfig {
    /// The five-region planet the map ships with.
    pub fn builtin() -> Self {
        let region = |name: &str, climate: Climate, share: f64| RegionConfig {
            name: name.to_string(),
            climate,
            share,
        };
        Self {
            name: "TOI-700".to_string(),
            total_cells: TOTAL_CELLS,
            total_population: TOTAL_POPULATION,
            cell_area_km2: CELL_AREA_KM2,
            regions: vec![
                region("Planície Equatorial", Climate::Tropical, 0.30),
                region("Vales Temperados", Climate::Temperate, 0.25),
                region("Desertos do Leste", Climate::Arid, 0.20),
                region("Estepes Continentais", Climate::Continental, 0.15),
                region("Calotas Polares", Climate::Polar, 0.10),
            ],
            tuning: Tuning::default(),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: PlanetConfig =
            serde_yaml::from_str(text).context("Failed to parse planet config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }

        let mut known = HashSet::new();
        for region in &self.regions {
            if !known.insert(region.name.as_str()) {
                return Err(ConfigError::DuplicateRegion(region.name.clone()));
            }
            if !region.share.is_finite() || region.share < 0.0 {
                return Err(ConfigError::InvalidShare {
                    name: region.name.clone(),
                    share: region.share,
                });
            }
        }

        let share_sum: f64 = self.regions.iter().map(|r| r.share).sum();
        if (share_sum - 1.0).abs() > SHARE_TOLERANCE {
            return Err(ConfigError::SharesDoNotSumToOne(share_sum));
        }

        if (self.total_cells as usize) < self.regions.len() {
            return Err(ConfigError::TooFewCells {
                cells: self.total_cells,
                regions: self.regions.len(),
            });
        }
        if self.total_population == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if !self.cell_area_km2.is_finite() || self.cell_area_km2 <= 0.0 {
            return Err(ConfigError::InvalidCellArea(self.cell_area_km2));
        }

        self.tuning.validate()
    }

    /// Mean inhabitants per km² across the whole planet.
    pub fn global_density(&self) -> f64 {
        self.total_population as f64 / (f64::from(self.total_cells) * self.cell_area_km2)
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.urban_cell_target) {
            return Err(ConfigError::InvalidUrbanTarget(self.urban_cell_target));
        }
        for (name, value) in [
            ("urban", self.urban_multiplier),
            ("rural", self.rural_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidMultiplier { name, value });
            }
        }
        for (name, range) in [
            ("urban cell", self.urban_cell_share),
            ("rural cell", self.rural_cell_share),
        ] {
            let ordered = range.min <= range.max;
            let bounded = (0.0..=1.0).contains(&range.min) && (0.0..=1.0).contains(&range.max);
            if !ordered || !bounded {
                return Err(ConfigError::InvalidShareRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<PlanetConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read planet config {}", path.display()))?;
        PlanetConfig::from_yaml(&data).with_context(|| format!("Invalid {}", path.display()))
    }
}
