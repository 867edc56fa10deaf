//! Whole-world snapshot
//!
//! Bodies are stored in slot order; springs refer to them by position in that
//! list, so handles never leak into saved data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::error::{Result, SimError};
use crate::settings::Settings;
use crate::sim::{Body, BodyId, Spring, SpringConfig, World};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringRecord {
    pub node1: usize,
    pub node2: usize,
    pub length: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub thickness: f32,
}

impl SpringRecord {
    /// Construction parameters carried by this record
    pub fn config(&self) -> SpringConfig {
        SpringConfig {
            rest_length: Some(self.length),
            stiffness: self.stiffness,
            damping: self.damping,
            thickness: self.thickness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    #[serde(default)]
    pub tick: u64,
    pub bodies: Vec<Record>,
    pub springs: Vec<SpringRecord>,
}

impl WorldSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl World {
    /// Capture every body and spring
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut index: HashMap<BodyId, usize> = HashMap::new();
        let mut bodies = Vec::with_capacity(self.body_count());
        for (id, body) in self.bodies() {
            index.insert(id, bodies.len());
            bodies.push(body.to_record());
        }

        let springs = self
            .springs()
            .filter_map(|(_, spring)| {
                Some(SpringRecord {
                    node1: *index.get(&spring.node1)?,
                    node2: *index.get(&spring.node2)?,
                    length: spring.rest_length,
                    stiffness: spring.stiffness,
                    damping: spring.damping,
                    thickness: spring.thickness,
                })
            })
            .collect();

        WorldSnapshot {
            tick: self.tick_count(),
            bodies,
            springs,
        }
    }

    /// Rebuild a world from a snapshot; any invalid record fails the whole restore
    pub fn from_snapshot(settings: Settings, snapshot: &WorldSnapshot) -> Result<Self> {
        let mut world = World::new(settings)?;

        let mut ids = Vec::with_capacity(snapshot.bodies.len());
        for record in &snapshot.bodies {
            ids.push(world.add_body(Body::from_record(record)?));
        }

        for (i, record) in snapshot.springs.iter().enumerate() {
            let lookup = |body: usize| {
                ids.get(body)
                    .copied()
                    .ok_or(SimError::DanglingSpring { spring: i, body })
            };
            let (node1, node2) = (lookup(record.node1)?, lookup(record.node2)?);
            let spring = Spring::from_config(node1, node2, record.length, &record.config())?;
            world.add_spring(spring)?;
        }

        world.tick_count = snapshot.tick;
        log::info!(
            "Restored snapshot: {} bodies, {} springs, tick {}",
            world.body_count(),
            world.spring_count(),
            snapshot.tick
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BodyConfig;
    use glam::Vec2;

    fn pendulum() -> World {
        let mut world = World::new(Settings::default()).unwrap();
        let anchor = world.spawn(Vec2::ZERO, &BodyConfig::anchor(2.0)).unwrap();
        let bob = world.spawn_default(Vec2::new(0.0, 30.0)).unwrap();
        world.connect_default(anchor, bob).unwrap();
        world
    }

    #[test]
    fn test_snapshot_indices() {
        let mut world = pendulum();
        // Removing the first body shifts indices in the snapshot, not handles
        let extra = world.spawn_default(Vec2::new(50.0, 0.0)).unwrap();
        let first = world.body_ids()[0];
        world.remove_body(first).unwrap();
        world.connect_default(world.body_ids()[0], extra).unwrap();

        let snapshot = world.snapshot();
        assert_eq!(snapshot.bodies.len(), 2);
        assert_eq!(snapshot.springs.len(), 1);
        assert!(snapshot.springs[0].node1 < 2 && snapshot.springs[0].node2 < 2);
    }

    #[test]
    fn test_restore_matches() {
        let world = pendulum();
        let json = world.snapshot().to_json().unwrap();
        let restored = World::from_snapshot(Settings::default(), &WorldSnapshot::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored.snapshot(), world.snapshot());
    }

    #[test]
    fn test_dangling_spring() {
        let mut snapshot = pendulum().snapshot();
        snapshot.springs[0].node2 = 7;
        assert!(matches!(
            World::from_snapshot(Settings::default(), &snapshot),
            Err(SimError::DanglingSpring { spring: 0, body: 7 })
        ));
    }

    #[test]
    fn test_self_spring_rejected() {
        let mut snapshot = pendulum().snapshot();
        snapshot.springs[0].node2 = snapshot.springs[0].node1;
        assert!(matches!(World::from_snapshot(Settings::default(), &snapshot), Err(SimError::SelfSpring)));
    }

    #[test]
    fn test_invalid_spring_record_rejected() {
        let mut snapshot = pendulum().snapshot();
        snapshot.springs[0].stiffness = -5.0;
        assert!(matches!(
            World::from_snapshot(Settings::default(), &snapshot),
            Err(SimError::InvalidParameter { name: "stiffness", .. })
        ));

        let mut snapshot = pendulum().snapshot();
        snapshot.springs[0].length = f32::NAN;
        assert!(matches!(
            World::from_snapshot(Settings::default(), &snapshot),
            Err(SimError::InvalidParameter { name: "rest_length", .. })
        ));
    }
}
