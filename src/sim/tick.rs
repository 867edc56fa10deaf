//! Fixed timestep simulation tick
//!
//! Order within a tick is fixed: apply driver overrides, rebuild the broad
//! phase, run every body's step in slot order, then every spring. Each body
//! sees the positions already updated by the bodies before it. A touching
//! pair of circles is resolved by whichever of the two gets there first.

use std::collections::HashSet;

use glam::Vec2;

use super::arena::{BodyId, SpringId};
use super::body::Body;
use super::collision::{circle_circle, circle_segment};
use super::resolve::{resolve_circles, resolve_segment};
use super::segment::Segment;
use super::world::World;
use crate::error::{Result, SimError, ensure_positive, ensure_unit};

/// Per-tick input from the driver (slider values, gravity).
///
/// Every `Some` field overwrites that property on all movable bodies before
/// the step. Static bodies keep their own values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Uniform acceleration (gravity slider)
    pub acceleration: Option<Vec2>,
    /// Mass slider
    pub mass: Option<f32>,
    /// Tangential damping on contact, 0..=1
    pub friction: Option<f32>,
    /// Bounce coefficient, 0..=1
    pub restitution: Option<f32>,
    /// Radius slider
    pub radius: Option<f32>,
}

impl TickInput {
    /// Input that only sets a uniform acceleration (gravity)
    pub fn with_acceleration(acceleration: Vec2) -> Self {
        Self {
            acceleration: Some(acceleration),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(acc) = self.acceleration {
            if !acc.is_finite() {
                return Err(SimError::InvalidParameter {
                    name: "acceleration",
                    value: if acc.x.is_finite() { acc.y } else { acc.x },
                });
            }
        }
        if let Some(mass) = self.mass {
            ensure_positive("mass", mass)?;
        }
        if let Some(radius) = self.radius {
            ensure_positive("radius", radius)?;
        }
        if let Some(friction) = self.friction {
            ensure_unit("friction", friction)?;
        }
        if let Some(restitution) = self.restitution {
            ensure_unit("restitution", restitution)?;
        }
        Ok(())
    }

    fn apply(&self, body: &mut Body) {
        if !body.can_move {
            return;
        }
        if let Some(acc) = self.acceleration {
            body.acc = acc;
        }
        if let Some(mass) = self.mass {
            body.mass = mass;
        }
        if let Some(friction) = self.friction {
            body.friction = friction;
        }
        if let Some(restitution) = self.restitution {
            body.restitution = restitution;
        }
        if let Some(radius) = self.radius {
            body.radius = radius;
        }
    }
}

/// Advance the world by one timestep of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Result<()> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SimError::InvalidTimestep(dt));
    }
    input.validate()?;

    for (_, body) in world.bodies.iter_mut() {
        input.apply(body);
    }

    world.rebuild_hashes();

    let mut scratch = Scratch::default();
    for id in world.body_ids() {
        simulate_body(world, id, dt, &mut scratch);
    }

    let World { bodies, springs, .. } = &mut *world;
    for (_, spring) in springs.iter() {
        if let Some([node1, node2]) = bodies.get_disjoint_mut([spring.node1, spring.node2]) {
            spring.simulate(node1, node2);
        }
    }

    world.tick_count += 1;
    log::trace!(
        "Tick {}: {} bodies, {} springs",
        world.tick_count,
        world.bodies.len(),
        world.springs.len()
    );
    Ok(())
}

/// Buffers shared by every body within one tick
#[derive(Debug, Default)]
pub struct Scratch {
    springs: Vec<SpringId>,
    neighbours: Vec<BodyId>,
    /// Circle pairs already resolved this tick, lower handle first
    contacts: HashSet<(BodyId, BodyId)>,
}

/// One body's share of a tick: sub-stepped integration against nearby
/// segments, then one pass against nearby circles, then the speed clamp.
///
/// Pass the same `scratch` to every body of a tick and a fresh one per tick.
pub fn simulate_body(world: &mut World, id: BodyId, dt: f32, scratch: &mut Scratch) {
    let Scratch {
        springs,
        neighbours,
        contacts,
    } = scratch;

    let Some(body) = world.bodies.get(id) else {
        return;
    };
    let can_collide = body.can_collide;
    let steps = body.substeps();
    let saved_acc = body.acc;
    let sub_dt = dt / steps as f32;

    springs.clear();
    if can_collide {
        world.spring_hash.nearby_into(body.pos, springs);
        springs.sort_unstable();
        springs.dedup();
    }

    for _ in 0..steps {
        let Some(body) = world.bodies.get_mut(id) else {
            return;
        };
        let prev = body.pos;
        if body.can_move {
            body.vel += body.acc * sub_dt;
            body.pos += body.vel * sub_dt;
        }
        if !can_collide {
            continue;
        }

        for &spring_id in springs.iter() {
            let Some(spring) = world.springs.get(spring_id) else {
                continue;
            };
            if spring.touches(id) {
                continue;
            }
            let Some([body, node1, node2]) =
                world.bodies.get_disjoint_mut([id, spring.node1, spring.node2])
            else {
                continue;
            };

            let seg = Segment::new(node1.pos, node2.pos);
            let hit = circle_segment(prev, body.pos, body.vel, body.radius, &seg).with_spring(spring_id);
            if hit.is_colliding {
                resolve_segment(body, node1, node2, &hit);
            }
        }
    }

    if let Some(body) = world.bodies.get_mut(id) {
        body.acc = saved_acc;
    }

    if can_collide {
        let pos = match world.bodies.get(id) {
            Some(body) => body.pos,
            None => return,
        };
        neighbours.clear();
        world.body_hash.nearby_into(pos, neighbours);

        for &other_id in neighbours.iter() {
            let pair = if id < other_id { (id, other_id) } else { (other_id, id) };
            if other_id == id || contacts.contains(&pair) {
                continue;
            }
            let Some([body, other]) = world.bodies.get_disjoint_mut([id, other_id]) else {
                continue;
            };
            if !other.can_collide {
                continue;
            }
            let hit = circle_circle(body.pos, body.radius, other.pos, other.radius);
            if hit.is_colliding {
                resolve_circles(body, other, &hit);
                contacts.insert(pair);
            }
        }
    }

    if let Some(body) = world.bodies.get_mut(id) {
        body.clamp_motion();
    }
}
