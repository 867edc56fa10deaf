//! Springbox - circles and damped springs in a 2D real-time physics core
//!
//! Core modules:
//! - `sim`: bodies, springs, broad/narrow phase and the per-tick step
//! - `scenario`: ready-made scenes for drivers and tests
//! - `settings`: data-driven tuning with documented defaults
//! - `persistence`: field-keyed records and world snapshots

pub mod error;
pub mod persistence;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::Settings;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Default frame step of the reference driver (15 Hz)
    pub const DEFAULT_DT: f32 = 1.0 / 15.0;

    /// Hard ceiling for every velocity and acceleration component
    pub const SPEED_LIMIT: f32 = 299_792_458.0;

    /// Sub-step heuristic: ceil(SUBSTEP_SCALE / max(radius, SUBSTEP_RADIUS_FLOOR))
    pub const SUBSTEP_SCALE: f32 = 25.0;
    pub const SUBSTEP_RADIUS_FLOOR: f32 = 0.1;
    pub const MIN_SUBSTEPS: u32 = 5;
    pub const MAX_SUBSTEPS: u32 = 50;

    /// Ray/segment determinant below which the pair counts as parallel
    pub const PARALLEL_EPSILON: f32 = 1e-6;
    /// Squared sub-step displacement below which the swept test is skipped
    pub const MIN_SWEEP_SQ: f32 = 1e-4;

    /// Circle-circle positional correction
    pub const CORRECTION_SLOP: f32 = 0.01;
    pub const CORRECTION_PERCENT: f32 = 0.2;

    /// Body defaults (reference driver sliders)
    pub const DEFAULT_RADIUS: f32 = 5.0;
    pub const DEFAULT_MASS: f32 = 1.0;
    pub const DEFAULT_FRICTION: f32 = 0.001;
    pub const DEFAULT_RESTITUTION: f32 = 0.9;

    /// Spring defaults
    pub const DEFAULT_STIFFNESS: f32 = 0.5;
    pub const DEFAULT_DAMPING: f32 = 0.5;
    pub const DEFAULT_SPRING_THICKNESS: f32 = 5.0;
}

/// Scalar dot product of (ax, ay) and (bx, by)
#[inline]
pub fn dot(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ax * bx + ay * by
}

/// Counter-clockwise perpendicular
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Clamp each component to [-limit, limit]
#[inline]
pub fn clamp_components(v: Vec2, limit: f32) -> Vec2 {
    Vec2::new(v.x.clamp(-limit, limit), v.y.clamp(-limit, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_uses_both_pairs() {
        assert_eq!(dot(1.0, 2.0, 3.0, 4.0), 11.0);
        // Second pair must never fall back to the first
        assert_eq!(dot(3.0, 4.0, 0.0, 0.0), 0.0);
        assert_eq!(dot(3.0, 4.0, 3.0, 4.0), 25.0);
    }

    #[test]
    fn test_perp_is_orthogonal() {
        let v = Vec2::new(3.0, -2.0);
        assert_eq!(v.dot(perp(v)), 0.0);
        assert_eq!(perp(Vec2::X), Vec2::Y);
    }

    #[test]
    fn test_clamp_components() {
        let v = clamp_components(Vec2::new(1e12, -1e12), consts::SPEED_LIMIT);
        assert_eq!(v, Vec2::new(consts::SPEED_LIMIT, -consts::SPEED_LIMIT));
        let small = Vec2::new(3.0, -4.0);
        assert_eq!(clamp_components(small, consts::SPEED_LIMIT), small);
    }
}
