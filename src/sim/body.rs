//! Circular point-mass bodies
//!
//! Bodies carry no rotation. Acceleration is a per-tick input written by the
//! driver; the step restores it unchanged after integrating.
//!
//! Precondition: `mass` and `radius` are positive. Constructors validate this,
//! but the fields are public and a driver that writes a zero or negative mass
//! gets infinite or negative inverse masses rather than an error.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, ensure_positive, ensure_unit};

/// Outline style (render-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
}

/// Construction parameters for a [`Body`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub radius: f32,
    pub mass: f32,
    /// Tangential damping on contact, [0, 1]
    pub friction: f32,
    /// Fraction of normal speed kept after a bounce, [0, 1]
    pub restitution: f32,
    /// Exempt from every collision test when false
    pub can_collide: bool,
    /// Static obstacle (infinite mass, never integrated) when false
    pub can_move: bool,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub fill: Option<String>,
    pub stroke: Option<Stroke>,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            mass: DEFAULT_MASS,
            friction: DEFAULT_FRICTION,
            restitution: DEFAULT_RESTITUTION,
            can_collide: true,
            can_move: true,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            fill: None,
            stroke: None,
        }
    }
}

impl BodyConfig {
    /// Static, non-colliding anchor (rope tops, wall corners)
    pub fn anchor(radius: f32) -> Self {
        Self {
            radius,
            can_collide: false,
            can_move: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("radius", self.radius)?;
        ensure_positive("mass", self.mass)?;
        ensure_unit("friction", self.friction)?;
        ensure_unit("restitution", self.restitution)?;
        Ok(())
    }
}

/// A circle in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// External acceleration, restored after every step
    pub acc: Vec2,
    pub mass: f32,
    /// Share of tangential speed lost on contact
    pub friction: f32,
    /// Share of normal speed kept on a bounce
    pub restitution: f32,
    pub radius: f32,
    /// Takes part in circle and segment collisions
    pub can_collide: bool,
    /// Static bodies are never moved by the solver (infinite mass)
    pub can_move: bool,
    /// Fill colour for drawing
    pub fill: Option<String>,
    /// Outline for drawing
    pub stroke: Option<Stroke>,
}

impl Body {
    /// Body with default material at rest
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self::build(pos, &BodyConfig { radius, ..BodyConfig::default() })
    }

    /// Validated construction from a config
    pub fn from_config(pos: Vec2, config: &BodyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(pos, config))
    }

    fn build(pos: Vec2, config: &BodyConfig) -> Self {
        Self {
            pos,
            vel: config.velocity,
            acc: config.acceleration,
            mass: config.mass,
            friction: config.friction,
            restitution: config.restitution,
            radius: config.radius,
            can_collide: config.can_collide,
            can_move: config.can_move,
            fill: config.fill.clone(),
            stroke: config.stroke.clone(),
        }
    }

    /// `1 / mass`, or 0 for static bodies
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.can_move { 1.0 / self.mass } else { 0.0 }
    }

    /// Sub-steps used for this body's segment collisions
    #[inline]
    pub fn substeps(&self) -> u32 {
        substep_count(self.radius)
    }

    pub fn kinetic_energy(&self) -> f32 {
        if self.can_move {
            0.5 * self.mass * self.vel.length_squared()
        } else {
            0.0
        }
    }

    /// Linear momentum (zero for static bodies)
    pub fn momentum(&self) -> Vec2 {
        if self.can_move { self.vel * self.mass } else { Vec2::ZERO }
    }

    /// Clamp velocity and acceleration components to the speed ceiling
    pub fn clamp_motion(&mut self) {
        self.vel = crate::clamp_components(self.vel, SPEED_LIMIT);
        self.acc = crate::clamp_components(self.acc, SPEED_LIMIT);
    }
}

/// Adaptive sub-step count: small bodies take more steps so they cannot skip
/// across a thin segment inside one frame.
#[inline]
pub fn substep_count(radius: f32) -> u32 {
    let steps = (SUBSTEP_SCALE / radius.max(SUBSTEP_RADIUS_FLOOR)).ceil();
    (steps as u32).clamp(MIN_SUBSTEPS, MAX_SUBSTEPS)
}
