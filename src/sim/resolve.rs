//! Collision response
//!
//! Segment contacts split impulse and position correction between the two
//! endpoint bodies by `(1 - t)` and `t`. Circle pairs use an equal-and-opposite
//! velocity exchange driven by the first body's material, plus Baumgarte-style
//! positional correction weighted by the other body's mass.

use glam::Vec2;

use super::body::Body;
use super::collision::CollisionResult;
use crate::consts::{CORRECTION_PERCENT, CORRECTION_SLOP};

/// Resolve a circle against the segment `node1 -> node2`.
///
/// `hit` must come from the segment test against the same endpoints.
pub fn resolve_segment(body: &mut Body, node1: &mut Body, node2: &mut Body, hit: &CollisionResult) {
    if !hit.is_colliding {
        return;
    }

    let n = hit.normal;
    let t = hit.t;
    let penetration = hit.penetration;

    // Swept hits rewind to the impact point before being pushed out by one radius
    if body.can_move {
        if let Some(impact) = hit.impact {
            body.pos = impact;
        }
        body.pos += n * penetration;
    }

    // Bounce only when moving into the surface
    let tangent = Vec2::new(-n.y, n.x);
    let speed_n = body.vel.dot(n);
    let speed_t = body.vel.dot(tangent);
    if body.can_move && speed_n < 0.0 {
        body.vel = n * (-speed_n * body.restitution) + tangent * (speed_t * (1.0 - body.friction));
    }

    let inv_body = body.inverse_mass();
    let inv_node1 = node1.inverse_mass();
    let inv_node2 = node2.inverse_mass();
    let inv_segment = (1.0 - t) * (1.0 - t) * inv_node1 + t * t * inv_node2;
    let inv_total = inv_body + inv_segment;
    if inv_total <= 0.0 {
        return;
    }

    let segment_vel = node1.vel * (1.0 - t) + node2.vel * t;
    let closing = speed_n - segment_vel.dot(n);
    if closing >= 0.0 {
        // A static body still has to keep a movable segment from sinking into it
        if !body.can_move {
            push_segment_out(node1, node2, n, penetration, t);
        }
        return;
    }

    let impulse = -(1.0 + body.restitution) * closing / inv_total;

    // Against a fixed segment this equals the reflection above
    if body.can_move {
        let shared_n = speed_n + impulse * inv_body;
        body.vel += n * (shared_n - body.vel.dot(n));
    }
    if node1.can_move {
        node1.vel -= n * (impulse * (1.0 - t) * inv_node1);
    }
    if node2.can_move {
        node2.vel -= n * (impulse * t * inv_node2);
    }
    if !body.can_move {
        push_segment_out(node1, node2, n, penetration, t);
    }
}

fn push_segment_out(node1: &mut Body, node2: &mut Body, n: Vec2, penetration: f32, t: f32) {
    if node1.can_move {
        node1.pos -= n * (penetration * (1.0 - t));
    }
    if node2.can_move {
        node2.pos -= n * (penetration * t);
    }
}

/// Resolve an overlapping circle pair; `hit.normal` points from `a` to `b`.
///
/// Only `a`'s friction and restitution drive the exchange. The caller
/// resolves each touching pair once per tick.
pub fn resolve_circles(a: &mut Body, b: &mut Body, hit: &CollisionResult) {
    if !hit.is_colliding {
        return;
    }

    let n = hit.normal;
    let tangent = Vec2::new(n.y, -n.x);
    let relative = a.vel - b.vel;
    let speed_n = relative.dot(n);
    let speed_t = relative.dot(tangent);

    let impulse = tangent * (speed_t / 2.0 * a.friction) + n * (speed_n / 2.0 * (a.restitution + 1.0));
    if a.can_move {
        a.vel -= impulse;
    }
    if b.can_move {
        b.vel += impulse;
    }

    let correction =
        (hit.penetration - CORRECTION_SLOP).max(0.0) / (a.mass + b.mass) * CORRECTION_PERCENT;
    if a.can_move {
        a.pos -= n * (correction * b.mass);
    }
    if b.can_move {
        b.pos += n * (correction * a.mass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{circle_circle, circle_segment};
    use crate::sim::segment::Segment;

    fn wall_nodes() -> (Body, Body) {
        let mut a = Body::new(Vec2::new(-100.0, 0.0), 2.0);
        let mut b = Body::new(Vec2::new(100.0, 0.0), 2.0);
        a.can_move = false;
        b.can_move = false;
        (a, b)
    }

    #[test]
    fn test_bounce_off_static_segment() {
        let (mut n1, mut n2) = wall_nodes();
        let mut ball = Body::new(Vec2::new(0.0, 3.0), 5.0);
        ball.vel = Vec2::new(10.0, -20.0);
        ball.friction = 0.5;

        let seg = Segment::new(n1.pos, n2.pos);
        let hit = circle_segment(ball.pos, ball.pos, ball.vel, ball.radius, &seg);
        resolve_segment(&mut ball, &mut n1, &mut n2, &hit);

        assert!((ball.pos.y - 5.0).abs() < 1e-5);
        assert!((ball.vel.y - 18.0).abs() < 1e-4);
        assert!((ball.vel.x - 5.0).abs() < 1e-4);
        // Static endpoints untouched
        assert_eq!(n1.vel, Vec2::ZERO);
        assert_eq!(n2.pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_resting_contact_not_rebounced() {
        let (mut n1, mut n2) = wall_nodes();
        let mut ball = Body::new(Vec2::new(0.0, 4.0), 5.0);
        ball.vel = Vec2::new(0.0, 2.0);

        let seg = Segment::new(n1.pos, n2.pos);
        let hit = circle_segment(ball.pos, ball.pos, ball.vel, ball.radius, &seg);
        resolve_segment(&mut ball, &mut n1, &mut n2, &hit);

        assert_eq!(ball.vel, Vec2::new(0.0, 2.0));
        assert!((ball.pos.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_swept_hit_snaps_to_impact() {
        let (mut n1, mut n2) = wall_nodes();
        let mut ball = Body::new(Vec2::new(0.0, 10.0), 5.0);
        ball.vel = Vec2::new(0.0, 600.0);
        let prev = Vec2::new(0.0, -30.0);

        let seg = Segment::new(n1.pos, n2.pos);
        let hit = circle_segment(prev, ball.pos, ball.vel, ball.radius, &seg);
        resolve_segment(&mut ball, &mut n1, &mut n2, &hit);

        assert!((ball.pos.y + 5.0).abs() < 1e-4);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_ball_hands_momentum_to_free_segment() {
        let mut n1 = Body::new(Vec2::new(-100.0, 0.0), 2.0);
        let mut n2 = Body::new(Vec2::new(100.0, 0.0), 2.0);
        let mut ball = Body::new(Vec2::new(0.0, 3.0), 5.0);
        for body in [&mut n1, &mut n2, &mut ball] {
            body.mass = 1.0;
        }
        ball.vel = Vec2::new(0.0, -20.0);
        ball.restitution = 0.9;
        let before = ball.momentum() + n1.momentum() + n2.momentum();

        let seg = Segment::new(n1.pos, n2.pos);
        let hit = circle_segment(ball.pos, ball.pos, ball.vel, ball.radius, &seg);
        assert!((hit.t - 0.5).abs() < 1e-6);
        resolve_segment(&mut ball, &mut n1, &mut n2, &hit);

        // j = 1.9 * 20 / (1 + 0.25 + 0.25), split evenly between the nodes
        let j = 38.0 / 1.5;
        assert!((ball.vel.y - (j - 20.0)).abs() < 1e-3);
        assert!(n1.vel.y < 0.0 && n2.vel.y < 0.0);
        assert!((n1.vel.y + j / 2.0).abs() < 1e-3);
        assert!((n2.vel.y - n1.vel.y).abs() < 1e-5);
        let after = ball.momentum() + n1.momentum() + n2.momentum();
        assert!((after - before).length() < 1e-3);
    }

    #[test]
    fn test_static_body_stops_moving_segment() {
        let mut n1 = Body::new(Vec2::new(-10.0, 0.0), 2.0);
        let mut n2 = Body::new(Vec2::new(10.0, 0.0), 2.0);
        n1.mass = 2.0;
        n2.mass = 3.0;
        n1.vel = Vec2::new(0.0, 4.0);
        n2.vel = Vec2::new(0.0, 4.0);

        // Static ball above a segment moving up into it
        let mut ball = Body::new(Vec2::new(2.0, 4.0), 5.0);
        ball.can_move = false;

        let seg = Segment::new(n1.pos, n2.pos);
        let hit = circle_segment(ball.pos, ball.pos, ball.vel, ball.radius, &seg);
        assert!(hit.is_colliding);
        let t = hit.t;
        resolve_segment(&mut ball, &mut n1, &mut n2, &hit);

        // Static body unchanged
        assert_eq!(ball.pos, Vec2::new(2.0, 4.0));
        assert_eq!(ball.vel, Vec2::ZERO);

        // Segment slowed at the contact and pushed out of the ball
        let contact_vel = n1.vel * (1.0 - t) + n2.vel * t;
        assert!(contact_vel.y < 4.0);
        assert!(n1.pos.y < 0.0 && n2.pos.y < 0.0);
    }

    #[test]
    fn test_moving_segment_against_static_body_without_closing() {
        let mut n1 = Body::new(Vec2::new(-10.0, 0.0), 2.0);
        let mut n2 = Body::new(Vec2::new(10.0, 0.0), 2.0);
        let mut post = Body::new(Vec2::new(0.0, 3.0), 5.0);
        post.can_move = false;

        let seg = Segment::new(n1.pos, n2.pos);
        let hit = circle_segment(post.pos, post.pos, post.vel, post.radius, &seg);
        resolve_segment(&mut post, &mut n1, &mut n2, &hit);

        // No approach, but the segment is still moved out of the static body
        assert_eq!(n1.vel, Vec2::ZERO);
        assert!((n1.pos.y + 1.0).abs() < 1e-5);
        assert!((n2.pos.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_all_static_is_noop() {
        let (mut n1, mut n2) = wall_nodes();
        let mut post = Body::new(Vec2::new(0.0, 3.0), 5.0);
        post.can_move = false;
        let before = (post.clone(), n1.clone(), n2.clone());

        let seg = Segment::new(n1.pos, n2.pos);
        let hit = circle_segment(post.pos, post.pos, post.vel, post.radius, &seg);
        resolve_segment(&mut post, &mut n1, &mut n2, &hit);
        assert_eq!((post, n1, n2), before);
    }

    #[test]
    fn test_head_on_circles_exchange_normal_speed() {
        let mut a = Body::new(Vec2::new(0.0, 0.0), 5.0);
        let mut b = Body::new(Vec2::new(8.0, 0.0), 5.0);
        a.vel = Vec2::new(10.0, 0.0);
        b.vel = Vec2::new(-10.0, 0.0);
        a.restitution = 1.0;

        let hit = circle_circle(a.pos, a.radius, b.pos, b.radius);
        resolve_circles(&mut a, &mut b, &hit);

        assert!((a.vel.x + 10.0).abs() < 1e-4);
        assert!((b.vel.x - 10.0).abs() < 1e-4);
        // Pushed apart by 20% of (penetration - slop), split by mass
        let correction = (2.0 - CORRECTION_SLOP) / 2.0 * CORRECTION_PERCENT;
        assert!((a.pos.x + correction).abs() < 1e-5);
        assert!((b.pos.x - 8.0 - correction).abs() < 1e-5);
    }

    #[test]
    fn test_overlapping_separating_circles_still_exchange() {
        let mut a = Body::new(Vec2::new(0.0, 0.0), 5.0);
        let mut b = Body::new(Vec2::new(8.0, 0.0), 5.0);
        a.vel = Vec2::new(-1.0, 0.0);
        b.vel = Vec2::new(1.0, 0.0);
        a.restitution = 0.9;

        let hit = circle_circle(a.pos, a.radius, b.pos, b.radius);
        resolve_circles(&mut a, &mut b, &hit);

        // Relative normal speed -2 gives an exchange of -1.9 per body
        assert!((a.vel.x - 0.9).abs() < 1e-5);
        assert!((b.vel.x + 0.9).abs() < 1e-5);
        assert!(a.pos.x < 0.0 && b.pos.x > 8.0);
    }

    #[test]
    fn test_static_circle_unmoved() {
        let mut wall = Body::new(Vec2::ZERO, 5.0);
        wall.can_move = false;
        let mut ball = Body::new(Vec2::new(7.0, 0.0), 5.0);
        ball.vel = Vec2::new(-5.0, 0.0);

        let hit = circle_circle(ball.pos, ball.radius, wall.pos, wall.radius);
        resolve_circles(&mut ball, &mut wall, &hit);

        assert_eq!(wall.pos, Vec2::ZERO);
        assert_eq!(wall.vel, Vec2::ZERO);
        // Half-impulse exchange only slows a body hitting a static one
        assert!(ball.vel.x > -5.0);
        assert!(ball.pos.x > 7.0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn circle_exchange_scales_normal_speed(
                ax in -4.0f32..4.0, ay in -4.0f32..4.0,
                avx in -50.0f32..50.0, avy in -50.0f32..50.0,
                bvx in -50.0f32..50.0, bvy in -50.0f32..50.0,
                restitution in 0.0f32..=1.0,
                friction in 0.0f32..=1.0,
            ) {
                let mut a = Body::new(Vec2::new(ax, ay), 5.0);
                let mut b = Body::new(Vec2::new(1.0, 1.0), 5.0);
                a.vel = Vec2::new(avx, avy);
                b.vel = Vec2::new(bvx, bvy);
                a.restitution = restitution;
                a.friction = friction;

                let hit = circle_circle(a.pos, a.radius, b.pos, b.radius);
                prop_assume!(hit.is_colliding);

                let before_n = (a.vel - b.vel).dot(hit.normal);
                let momentum_before = a.momentum() + b.momentum();
                resolve_circles(&mut a, &mut b, &hit);
                let after_n = (a.vel - b.vel).dot(hit.normal);

                prop_assert!((after_n + before_n * restitution).abs() < 1e-3);
                // Equal masses: exchange is momentum-neutral
                let drift = (a.momentum() + b.momentum() - momentum_before).length();
                prop_assert!(drift < 1e-3);
            }
        }
    }
}
