//! Damped springs between two bodies
//!
//! A spring is both a force element and a collision segment. It refers to its
//! endpoints by handle; the world resolves them before calling `simulate`.

use serde::{Deserialize, Serialize};

use super::arena::BodyId;
use super::body::Body;
use crate::consts::{DEFAULT_DAMPING, DEFAULT_SPRING_THICKNESS, DEFAULT_STIFFNESS};
use crate::error::{Result, ensure_non_negative, ensure_positive};

/// Construction parameters for a [`Spring`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Natural length; `None` uses the endpoint distance at creation
    pub rest_length: Option<f32>,
    pub stiffness: f32,
    pub damping: f32,
    /// Drawn width only, no effect on collision
    pub thickness: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            rest_length: None,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            thickness: DEFAULT_SPRING_THICKNESS,
        }
    }
}

impl SpringConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(rest) = self.rest_length {
            ensure_non_negative("rest_length", rest)?;
        }
        ensure_non_negative("stiffness", self.stiffness)?;
        ensure_non_negative("damping", self.damping)?;
        ensure_positive("thickness", self.thickness)?;
        Ok(())
    }
}

/// Spring between two bodies, also a collision segment for every other body
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    /// Segment start
    pub node1: BodyId,
    /// Segment end
    pub node2: BodyId,
    /// Length at which the spring exerts no force
    pub rest_length: f32,
    /// Hooke coefficient
    pub stiffness: f32,
    /// Coefficient on relative speed along the axis
    pub damping: f32,
    /// Drawn width only
    pub thickness: f32,
}

impl Spring {
    /// Spring with default coefficients
    pub fn new(node1: BodyId, node2: BodyId, rest_length: f32) -> Self {
        let config = SpringConfig::default();
        Self {
            node1,
            node2,
            rest_length,
            stiffness: config.stiffness,
            damping: config.damping,
            thickness: config.thickness,
        }
    }

    /// Validated construction; `current_length` fills in a missing rest length
    pub fn from_config(
        node1: BodyId,
        node2: BodyId,
        current_length: f32,
        config: &SpringConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            node1,
            node2,
            rest_length: config.rest_length.unwrap_or(current_length),
            stiffness: config.stiffness,
            damping: config.damping,
            thickness: config.thickness,
        })
    }

    /// Whether `id` is one of this spring's endpoints
    #[inline]
    pub fn touches(&self, id: BodyId) -> bool {
        self.node1 == id || self.node2 == id
    }

    /// Apply one tick of Hooke's law plus axial damping as velocity changes.
    ///
    /// The axis runs from `node2` to `node1`. Coincident endpoints have no
    /// axis and are skipped. Static endpoints are never changed.
    pub fn simulate(&self, node1: &mut Body, node2: &mut Body) {
        let axis = node1.pos - node2.pos;
        let dist = axis.length();
        if dist == 0.0 {
            return;
        }
        let dir = axis / dist;

        let stretch = (dist - self.rest_length) * self.stiffness;
        let closing = (node1.vel - node2.vel).dot(dir) * self.damping;
        let force = dir * (stretch + closing);

        if node2.can_move {
            node2.vel += force / node2.mass;
        }
        if node1.can_move {
            node1.vel -= force / node1.mass;
        }
    }

    /// Deviation from rest length, for drawing
    pub fn stress(&self, node1: &Body, node2: &Body) -> f32 {
        (node1.pos.distance(node2.pos) - self.rest_length).abs()
    }
}
