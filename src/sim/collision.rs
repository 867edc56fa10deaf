//! Collision detection between circles and between circles and segments
//!
//! The segment test is continuous first: the sub-step displacement is swept
//! as a ray against the segment so a fast body cannot skip across it. When
//! the sweep does not fire, the discrete closest-point test takes over, which
//! is what keeps resting contact stable.

use glam::Vec2;

use super::arena::SpringId;
use super::segment::Segment;
use crate::consts::{MIN_SWEEP_SQ, PARALLEL_EPSILON};
use crate::perp;

/// Result of a narrow-phase test
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap (or the sweep crossed the segment)
    pub is_colliding: bool,
    /// Overlap depth, >= 0
    pub penetration: f32,
    /// Unit vector from the obstacle toward the moving body
    pub normal: Vec2,
    /// Clamped position of the contact along the segment, in [0, 1]
    pub t: f32,
    /// Segment involved (segment collisions only)
    pub spring: Option<SpringId>,
    /// Point on the swept path where the body centre met the segment
    pub impact: Option<Vec2>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            is_colliding: false,
            penetration: 0.0,
            normal: Vec2::ZERO,
            t: 0.0,
            spring: None,
            impact: None,
        }
    }

    fn hit(penetration: f32, normal: Vec2) -> Self {
        Self {
            is_colliding: true,
            penetration,
            normal,
            ..Self::miss()
        }
    }

    /// Attach the segment this result was computed against
    pub fn with_spring(mut self, spring: SpringId) -> Self {
        if self.is_colliding {
            self.spring = Some(spring);
        }
        self
    }
}

/// Circle-circle overlap test.
///
/// Squared distance is compared first so the reject path needs no square
/// root. The normal points from `a` toward `b`. Coincident centres collide
/// with full penetration along `(0, -1)`.
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let dist_sq = delta.length_squared();
    let radii = a_radius + b_radius;

    if !(dist_sq < radii * radii) {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    if dist == 0.0 {
        return CollisionResult::hit(radii, Vec2::NEG_Y);
    }
    CollisionResult::hit(radii - dist, delta / dist)
}

/// Swept hit of a body centre against a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    /// Fraction of the displacement at which the centre meets the segment
    pub toi: f32,
    /// Segment normal facing against the body's velocity
    pub normal: Vec2,
    pub impact: Vec2,
}

/// Continuous test of the ray `prev -> pos` against `seg`.
///
/// Fires only when the ray crosses the segment (both parameters in [0, 1]),
/// the pair is not near-parallel, and the body started farther than one
/// radius from the segment start, so a body already resting on the segment
/// is left to the discrete test.
pub fn sweep_circle_segment(
    prev: Vec2,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    seg: &Segment,
) -> Option<Sweep> {
    let path = pos - prev;
    if path.length_squared() <= MIN_SWEEP_SQ || seg.is_degenerate() {
        return None;
    }

    let dir = seg.direction();
    let denom = path.perp_dot(dir);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    // prev + t * path == start + s * dir
    let origin = prev - seg.start;
    let t = -origin.perp_dot(dir) / denom;
    let s = -origin.perp_dot(path) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&s) {
        return None;
    }
    if origin.length_squared() <= radius * radius {
        return None;
    }

    let mut normal = perp(dir).normalize();
    if vel.dot(normal) > 0.0 {
        normal = -normal;
    }

    Some(Sweep {
        toi: t,
        normal,
        impact: prev + path * t,
    })
}

/// Discrete closest-point test of a circle against a segment (strict `<`).
///
/// When the centre lies exactly on the segment the normal falls back to the
/// segment's perpendicular.
pub fn circle_segment_discrete(pos: Vec2, radius: f32, seg: &Segment) -> CollisionResult {
    let t = seg.closest_t(pos);
    let offset = pos - seg.point_at(t);
    let dist = offset.length();

    if !(dist < radius) {
        return CollisionResult::miss();
    }

    let normal = if dist == 0.0 { seg.normal() } else { offset / dist };
    CollisionResult {
        t,
        ..CollisionResult::hit(radius - dist, normal)
    }
}

/// Full segment test for one sub-step: continuous first, then discrete.
///
/// A swept hit reports the impact point, a penetration of exactly `radius`,
/// and `t` recomputed at the impact point. Zero-length segments never collide.
pub fn circle_segment(
    prev: Vec2,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    seg: &Segment,
) -> CollisionResult {
    if seg.is_degenerate() {
        return CollisionResult::miss();
    }

    if let Some(sweep) = sweep_circle_segment(prev, pos, vel, radius, seg) {
        return CollisionResult {
            t: seg.closest_t(sweep.impact),
            impact: Some(sweep.impact),
            ..CollisionResult::hit(radius, sweep.normal)
        };
    }

    circle_segment_discrete(pos, radius, seg)
}
