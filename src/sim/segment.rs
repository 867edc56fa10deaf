//! Line segment geometry
//!
//! A spring doubles as a collision segment between its two endpoint bodies.
//! The segment is rebuilt from the endpoint positions each time it is tested.

use glam::Vec2;

use crate::{dot, perp};

/// Segment from `start` (node1) to `end` (node2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Unnormalized direction start -> end
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length_squared(&self) -> f32 {
        let d = self.direction();
        dot(d.x, d.y, d.x, d.y)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn midpoint(&self) -> Vec2 {
        self.start.lerp(self.end, 0.5)
    }

    /// Zero-length segments cannot be collided with
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length_squared() == 0.0
    }

    /// Unit perpendicular (counter-clockwise of the direction).
    ///
    /// Falls back to `(0, -1)` for a zero-length segment.
    pub fn normal(&self) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            return Vec2::NEG_Y;
        }
        perp(self.direction()) / len
    }

    /// Parameter of the closest point to `point`, clamped to [0, 1]
    pub fn closest_t(&self, point: Vec2) -> f32 {
        let len_sq = self.length_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        let d = self.direction();
        let rel = point - self.start;
        (dot(rel.x, rel.y, d.x, d.y) / len_sq).clamp(0.0, 1.0)
    }

    /// Point at parameter `t` (unclamped)
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start + self.direction() * t
    }
}
