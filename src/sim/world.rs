//! World container
//!
//! Owns every body and spring plus the two broad-phase hashes. Bodies and
//! springs are addressed by generational handles; iteration is in slot order,
//! which is insertion order until something is removed.

use glam::Vec2;

use super::arena::{BodyId, BodyMap, SpringId, SpringMap};
use super::body::{Body, BodyConfig};
use super::spatial::SpatialHash;
use super::spring::{Spring, SpringConfig};
use super::tick::{TickInput, tick};
use crate::error::{Result, SimError};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct World {
    pub(crate) bodies: BodyMap<Body>,
    pub(crate) springs: SpringMap<Spring>,
    pub(crate) body_hash: SpatialHash<BodyId>,
    pub(crate) spring_hash: SpatialHash<SpringId>,
    settings: Settings,
    pub(crate) tick_count: u64,
}

impl World {
    /// Empty world; rejects invalid settings
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate().inspect_err(|e| log::warn!("Rejected world settings: {e}"))?;
        log::debug!(
            "World created: dt={}, body cell={}, spring cell={}",
            settings.dt,
            settings.body_cell_size,
            settings.spring_cell_size
        );
        Ok(Self {
            bodies: BodyMap::with_key(),
            springs: SpringMap::with_key(),
            body_hash: SpatialHash::new(settings.body_cell_size),
            spring_hash: SpatialHash::new(settings.spring_cell_size),
            settings,
            tick_count: 0,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // === Bodies ===

    /// Insert a prebuilt body as-is
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.insert(body)
    }

    /// Validate a config and insert a body built from it
    pub fn spawn(&mut self, pos: Vec2, config: &BodyConfig) -> Result<BodyId> {
        let body = Body::from_config(pos, config)?;
        Ok(self.add_body(body))
    }

    /// Spawn with the world's default body config
    pub fn spawn_default(&mut self, pos: Vec2) -> Result<BodyId> {
        let config = self.settings.body_defaults.clone();
        self.spawn(pos, &config)
    }

    /// Remove a body and every spring attached to it
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        let body = self.bodies.remove(id).ok_or(SimError::UnknownBody(id))?;
        let before = self.springs.len();
        self.springs.retain(|_, spring| !spring.touches(id));
        log::debug!("Removed body {:?} and {} attached springs", id, before - self.springs.len());
        Ok(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter()
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body)> {
        self.bodies.iter_mut()
    }

    pub fn body_ids(&self) -> Vec<BodyId> {
        self.bodies.keys().collect()
    }

    // === Springs ===

    /// Insert a prebuilt spring after checking both endpoints
    pub fn add_spring(&mut self, spring: Spring) -> Result<SpringId> {
        if spring.node1 == spring.node2 {
            return Err(SimError::SelfSpring);
        }
        for node in [spring.node1, spring.node2] {
            if !self.bodies.contains_key(node) {
                return Err(SimError::UnknownBody(node));
            }
        }
        Ok(self.springs.insert(spring))
    }

    /// Join two bodies; a missing rest length uses their current distance
    pub fn connect(&mut self, node1: BodyId, node2: BodyId, config: &SpringConfig) -> Result<SpringId> {
        if node1 == node2 {
            return Err(SimError::SelfSpring);
        }
        let a = self.bodies.get(node1).ok_or(SimError::UnknownBody(node1))?;
        let b = self.bodies.get(node2).ok_or(SimError::UnknownBody(node2))?;
        let spring = Spring::from_config(node1, node2, a.pos.distance(b.pos), config)?;
        self.add_spring(spring)
    }

    /// Connect with the world's default spring config
    pub fn connect_default(&mut self, node1: BodyId, node2: BodyId) -> Result<SpringId> {
        let config = self.settings.spring_defaults.clone();
        self.connect(node1, node2, &config)
    }

    pub fn remove_spring(&mut self, id: SpringId) -> Result<Spring> {
        self.springs.remove(id).ok_or(SimError::UnknownSpring(id))
    }

    pub fn spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id)
    }

    pub fn spring_mut(&mut self, id: SpringId) -> Option<&mut Spring> {
        self.springs.get_mut(id)
    }

    pub fn springs(&self) -> impl Iterator<Item = (SpringId, &Spring)> {
        self.springs.iter()
    }

    /// Current endpoint positions, node1 first
    pub fn spring_endpoints(&self, id: SpringId) -> Option<(Vec2, Vec2)> {
        let spring = self.springs.get(id)?;
        let a = self.bodies.get(spring.node1)?;
        let b = self.bodies.get(spring.node2)?;
        Some((a.pos, b.pos))
    }

    /// Deviation from rest length
    pub fn spring_stress(&self, id: SpringId) -> Option<f32> {
        let spring = self.springs.get(id)?;
        let a = self.bodies.get(spring.node1)?;
        let b = self.bodies.get(spring.node2)?;
        Some(spring.stress(a, b))
    }

    // === Counters ===

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // === Broad phase ===

    /// Refill both hashes from current positions
    pub fn rebuild_hashes(&mut self) {
        self.body_hash.clear();
        for (id, body) in self.bodies.iter() {
            self.body_hash.insert(id, body.pos);
        }

        self.spring_hash.clear();
        for (id, spring) in self.springs.iter() {
            if let (Some(a), Some(b)) = (self.bodies.get(spring.node1), self.bodies.get(spring.node2)) {
                self.spring_hash.insert_segment(id, a.pos, b.pos);
            }
        }
    }

    /// Bodies in the 3x3 cell block around `point` as of the last rebuild
    pub fn nearby_bodies(&self, point: Vec2) -> Vec<BodyId> {
        self.body_hash.nearby(point)
    }

    /// Springs near `point` as of the last rebuild, without duplicates
    pub fn nearby_springs(&self, point: Vec2) -> Vec<SpringId> {
        let mut out = self.spring_hash.nearby(point);
        out.sort_unstable();
        out.dedup();
        out
    }

    // === Stepping ===

    /// Advance one tick with explicit input and timestep
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Result<()> {
        tick(self, input, dt)
    }

    /// Advance one tick at the configured timestep under configured gravity
    pub fn advance(&mut self) -> Result<()> {
        let input = TickInput::with_acceleration(self.settings.gravity);
        let dt = self.settings.dt;
        self.step(&input, dt)
    }

    // === Diagnostics ===

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(|(_, body)| body.kinetic_energy()).sum()
    }

    pub fn momentum(&self) -> Vec2 {
        self.bodies.iter().map(|(_, body)| body.momentum()).sum()
    }

    /// Drop every body and spring; the tick counter keeps running
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.springs.clear();
        self.body_hash.clear();
        self.spring_hash.clear();
        log::debug!("World cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(Settings::default()).unwrap()
    }

    #[test]
    fn test_rejects_bad_settings() {
        let settings = Settings { body_cell_size: 0.0, ..Settings::default() };
        assert!(matches!(World::new(settings), Err(SimError::InvalidParameter { .. })));
    }

    #[test]
    fn test_connect_uses_current_distance() {
        let mut world = world();
        let a = world.spawn_default(Vec2::ZERO).unwrap();
        let b = world.spawn_default(Vec2::new(3.0, 4.0)).unwrap();
        let s = world.connect_default(a, b).unwrap();
        assert_eq!(world.spring(s).unwrap().rest_length, 5.0);
        assert_eq!(world.spring_endpoints(s), Some((Vec2::ZERO, Vec2::new(3.0, 4.0))));
        assert_eq!(world.spring_stress(s), Some(0.0));
    }

    #[test]
    fn test_connect_errors() {
        let mut world = world();
        let a = world.spawn_default(Vec2::ZERO).unwrap();
        let b = world.spawn_default(Vec2::new(10.0, 0.0)).unwrap();
        assert!(matches!(world.connect_default(a, a), Err(SimError::SelfSpring)));

        world.remove_body(b).unwrap();
        assert!(matches!(world.connect_default(a, b), Err(SimError::UnknownBody(id)) if id == b));
        assert!(matches!(world.add_spring(Spring::new(b, a, 1.0)), Err(SimError::UnknownBody(_))));
    }

    #[test]
    fn test_remove_body_drops_springs() {
        let mut world = world();
        let a = world.spawn_default(Vec2::ZERO).unwrap();
        let b = world.spawn_default(Vec2::new(10.0, 0.0)).unwrap();
        let c = world.spawn_default(Vec2::new(20.0, 0.0)).unwrap();
        world.connect_default(a, b).unwrap();
        let bc = world.connect_default(b, c).unwrap();
        world.connect_default(a, c).unwrap();

        world.remove_body(a).unwrap();
        assert_eq!(world.body_count(), 2);
        assert_eq!(world.spring_count(), 1);
        assert!(world.spring(bc).is_some());
        assert!(matches!(world.remove_body(a), Err(SimError::UnknownBody(_))));
    }

    #[test]
    fn test_remove_spring() {
        let mut world = world();
        let a = world.spawn_default(Vec2::ZERO).unwrap();
        let b = world.spawn_default(Vec2::new(10.0, 0.0)).unwrap();
        let s = world.connect_default(a, b).unwrap();
        assert!(world.remove_spring(s).is_ok());
        assert!(matches!(world.remove_spring(s), Err(SimError::UnknownSpring(_))));
        assert_eq!(world.body_count(), 2);
    }

    #[test]
    fn test_nearby_queries() {
        let mut world = world();
        let a = world.spawn_default(Vec2::new(1.0, 1.0)).unwrap();
        let far = world.spawn_default(Vec2::new(500.0, 500.0)).unwrap();
        let w1 = world.spawn(Vec2::new(-200.0, 0.0), &BodyConfig::anchor(2.0)).unwrap();
        let w2 = world.spawn(Vec2::new(200.0, 0.0), &BodyConfig::anchor(2.0)).unwrap();
        let wall = world.connect_default(w1, w2).unwrap();
        world.rebuild_hashes();

        let near = world.nearby_bodies(Vec2::ZERO);
        assert!(near.contains(&a));
        assert!(!near.contains(&far));
        // Long wall is found from its middle, once
        assert_eq!(world.nearby_springs(Vec2::new(0.0, 5.0)), vec![wall]);
        assert!(world.nearby_springs(Vec2::new(0.0, 300.0)).is_empty());
    }

    #[test]
    fn test_step_counts_ticks() {
        let mut world = world();
        world.spawn_default(Vec2::ZERO).unwrap();
        world.advance().unwrap();
        world.advance().unwrap();
        assert_eq!(world.tick_count(), 2);
        assert!(matches!(world.step(&TickInput::default(), -1.0), Err(SimError::InvalidTimestep(_))));
        assert_eq!(world.tick_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut world = world();
        let a = world.spawn_default(Vec2::ZERO).unwrap();
        let b = world.spawn_default(Vec2::new(10.0, 0.0)).unwrap();
        world.connect_default(a, b).unwrap();
        world.clear();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.spring_count(), 0);
        assert!(world.body(a).is_none());
    }
}
