//! Simulation settings
//!
//! Loaded from JSON by the driver; every field has a default so partial files
//! are accepted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DT;
use crate::error::{Result, SimError, ensure_positive};
use crate::sim::{BodyConfig, SpringConfig};

/// World-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Stepping ===
    /// Seconds per tick for [`World::advance`](crate::sim::World::advance)
    pub dt: f32,
    /// Acceleration applied to every movable body each tick
    pub gravity: Vec2,

    // === Broad phase ===
    /// Body hash cell size; keep at or above the largest body diameter
    pub body_cell_size: f32,
    /// Spring hash cell size
    pub spring_cell_size: f32,

    // === Defaults for new objects ===
    pub body_defaults: BodyConfig,
    pub spring_defaults: SpringConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Stepping
            dt: DEFAULT_DT,
            gravity: Vec2::ZERO,

            // Two default diameters per body cell
            body_cell_size: 20.0,
            spring_cell_size: 50.0,

            body_defaults: BodyConfig::default(),
            spring_defaults: SpringConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidTimestep(self.dt));
        }
        if !self.gravity.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "gravity",
                value: if self.gravity.x.is_finite() { self.gravity.y } else { self.gravity.x },
            });
        }
        ensure_positive("body_cell_size", self.body_cell_size)?;
        ensure_positive("spring_cell_size", self.spring_cell_size)?;
        self.body_defaults.validate()?;
        self.spring_defaults.validate()?;
        Ok(())
    }
}
