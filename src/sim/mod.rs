//! Physics core
//!
//! Everything that advances the world lives here. Stepping is deterministic:
//! - Caller-chosen timestep, no wall-clock reads
//! - Stable iteration order (slot order of the body and spring maps)
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod collision;
pub mod resolve;
pub mod segment;
pub mod spatial;
pub mod spring;
pub mod tick;
pub mod world;

pub use arena::{BodyId, SpringId};
pub use body::{Body, BodyConfig, Stroke, substep_count};
pub use collision::{CollisionResult, circle_circle, circle_segment};
pub use resolve::{resolve_circles, resolve_segment};
pub use segment::Segment;
pub use spatial::SpatialHash;
pub use spring::{Spring, SpringConfig};
pub use tick::{Scratch, TickInput, simulate_body, tick};
pub use world::World;
