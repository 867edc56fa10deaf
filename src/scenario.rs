//! Scene builders
//!
//! The demo scene is a braced box, a rope hanging from a fixed anchor, and an
//! octagonal wall made of springs between fixed corner nodes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::DEFAULT_RADIUS;
use crate::error::Result;
use crate::settings::Settings;
use crate::sim::{BodyConfig, BodyId, SpringId, Stroke, World};

/// Half-side of the demo box and link length of the rope
pub const DEMO_SPACING: f32 = 30.0;

/// Inset of the octagon's cut corners as a fraction of the shorter side
pub const WALL_INSET_RATIO: f32 = 0.2;

const BALL_FILL: &str = "white";
const WALL_COLOR: &str = "red";
const WALL_WIDTH: f32 = 4.0;

/// Handles of everything the demo scene creates
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub box_nodes: [BodyId; 4],
    /// Anchor first, then the hanging links top to bottom
    pub rope: [BodyId; 4],
    /// Octagon corners, clockwise from the top edge
    pub wall_nodes: Vec<BodyId>,
    pub wall_springs: Vec<SpringId>,
}

/// Fresh world holding the demo scene for a `width` x `height` viewport
pub fn demo(width: f32, height: f32, settings: Settings) -> Result<(World, DemoScene)> {
    let mut world = World::new(settings)?;
    let scene = populate_demo(&mut world, width, height)?;
    Ok((world, scene))
}

/// Add the demo scene to an existing world
pub fn populate_demo(world: &mut World, width: f32, height: f32) -> Result<DemoScene> {
    let d = DEMO_SPACING;
    let centre = Vec2::new(width / 2.0, height / 2.0);

    // Box braced on both diagonals
    let box_nodes = [
        spawn_ball(world, centre + Vec2::new(-d, -d), DEFAULT_RADIUS)?,
        spawn_ball(world, centre + Vec2::new(d, -d), DEFAULT_RADIUS)?,
        spawn_ball(world, centre + Vec2::new(d, d), DEFAULT_RADIUS)?,
        spawn_ball(world, centre + Vec2::new(-d, d), DEFAULT_RADIUS)?,
    ];
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)] {
        world.connect_default(box_nodes[a], box_nodes[b])?;
    }

    // Rope
    let top = Vec2::new(width / 1.5, height / 2.0);
    let anchor = BodyConfig {
        fill: Some(BALL_FILL.to_string()),
        ..BodyConfig::anchor(DEFAULT_RADIUS)
    };
    let rope = [
        world.spawn(top, &anchor)?,
        spawn_ball(world, top + Vec2::new(0.0, d), DEFAULT_RADIUS)?,
        spawn_ball(world, top + Vec2::new(0.0, d * 2.0), DEFAULT_RADIUS)?,
        spawn_ball(world, top + Vec2::new(0.0, d * 3.0), DEFAULT_RADIUS)?,
    ];
    for pair in rope.windows(2) {
        world.connect_default(pair[0], pair[1])?;
    }

    // Octagon walls
    let m = width.min(height) * WALL_INSET_RATIO;
    let corners = [
        Vec2::new(m, 0.0),
        Vec2::new(width - m, 0.0),
        Vec2::new(width, m),
        Vec2::new(width, height - m),
        Vec2::new(width - m, height),
        Vec2::new(m, height),
        Vec2::new(0.0, height - m),
        Vec2::new(0.0, m),
    ];
    let wall = BodyConfig {
        stroke: Some(Stroke {
            color: WALL_COLOR.to_string(),
            width: WALL_WIDTH,
        }),
        ..BodyConfig::anchor(DEFAULT_RADIUS)
    };
    let wall_nodes = corners
        .into_iter()
        .map(|corner| world.spawn(corner, &wall))
        .collect::<Result<Vec<_>>>()?;
    let wall_springs = (0..wall_nodes.len())
        .map(|i| world.connect_default(wall_nodes[i], wall_nodes[(i + 1) % wall_nodes.len()]))
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "Demo scene built: {} bodies, {} springs ({}x{})",
        world.body_count(),
        world.spring_count(),
        width,
        height
    );
    Ok(DemoScene {
        box_nodes,
        rope,
        wall_nodes,
        wall_springs,
    })
}

/// Drop a default white ball at `pos`
pub fn spawn_ball(world: &mut World, pos: Vec2, radius: f32) -> Result<BodyId> {
    let config = BodyConfig {
        radius,
        fill: Some(BALL_FILL.to_string()),
        ..world.settings().body_defaults.clone()
    };
    world.spawn(pos, &config)
}

/// Spawn `count` balls at reproducible random positions inside `min..max`
pub fn scatter(world: &mut World, count: usize, min: Vec2, max: Vec2, seed: u64) -> Result<Vec<BodyId>> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let radius = world.settings().body_defaults.radius;
    let mut spawned = Vec::with_capacity(count);
    for _ in 0..count {
        let pos = Vec2::new(
            lerp_unit(min.x, max.x, rng.random::<f32>()),
            lerp_unit(min.y, max.y, rng.random::<f32>()),
        );
        spawned.push(spawn_ball(world, pos, radius)?);
    }
    log::info!("Scattered {} balls (seed {})", count, seed);
    Ok(spawned)
}

#[inline]
fn lerp_unit(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (hi - lo) * t
}
