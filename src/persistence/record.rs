//! Per-body record for snapshot/restore and network sync

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{Body, BodyConfig, Stroke};

/// Tagged record; the `"type"` key selects the shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Record {
    Circle(CircleRecord),
}

impl Record {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Every physical and visual field of a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleRecord {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub ax: f32,
    pub ay: f32,
    pub radius: f32,
    pub fill: Option<String>,
    pub stroke: Option<Stroke>,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub can_collide: bool,
    pub can_move: bool,
}

impl CircleRecord {
    /// Construction parameters carried by the record (position excluded)
    pub fn config(&self) -> BodyConfig {
        BodyConfig {
            radius: self.radius,
            mass: self.mass,
            friction: self.friction,
            restitution: self.restitution,
            can_collide: self.can_collide,
            can_move: self.can_move,
            velocity: Vec2::new(self.vx, self.vy),
            acceleration: Vec2::new(self.ax, self.ay),
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
        }
    }
}

impl Body {
    pub fn to_record(&self) -> Record {
        Record::Circle(CircleRecord {
            x: self.pos.x,
            y: self.pos.y,
            vx: self.vel.x,
            vy: self.vel.y,
            ax: self.acc.x,
            ay: self.acc.y,
            radius: self.radius,
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            mass: self.mass,
            friction: self.friction,
            restitution: self.restitution,
            can_collide: self.can_collide,
            can_move: self.can_move,
        })
    }

    /// Validated body built from a record
    pub fn from_record(record: &Record) -> Result<Self> {
        match record {
            Record::Circle(circle) => Body::from_config(Vec2::new(circle.x, circle.y), &circle.config()),
        }
    }

    /// Overwrite every field from a record, validating first
    pub fn apply_record(&mut self, record: &Record) -> Result<()> {
        *self = Body::from_record(record)?;
        Ok(())
    }
}
