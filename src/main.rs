//! Headless driver: builds the demo scene, steps it, and reports
//!
//! Run with `RUST_LOG=debug` for per-object logging.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;
    use springbox::Settings;
    use springbox::scenario;

    /// Step the spring/ball demo scene without a window
    #[derive(Parser, Debug)]
    #[command(name = "springbox", version, about)]
    struct Args {
        /// Number of ticks to run
        #[arg(long, default_value_t = 150)]
        ticks: u64,

        /// Seconds per tick (overrides the settings file)
        #[arg(long)]
        dt: Option<f32>,

        /// Viewport width
        #[arg(long, default_value_t = 800.0)]
        width: f32,

        /// Viewport height
        #[arg(long, default_value_t = 600.0)]
        height: f32,

        /// Downward acceleration (overrides the settings file)
        #[arg(long)]
        gravity_y: Option<f32>,

        /// Extra random balls dropped inside the walls
        #[arg(long, default_value_t = 0)]
        scatter: usize,

        /// Seed for --scatter
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write the final world snapshot (JSON) here
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Ticks between progress lines
        #[arg(long, default_value_t = 15)]
        report_every: u64,
    }

    fn load_settings(args: &Args) -> Result<Settings> {
        let mut settings = match &args.settings {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading settings from {}", path.display()))?;
                Settings::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Settings::default(),
        };
        if let Some(dt) = args.dt {
            settings.dt = dt;
        }
        if let Some(gy) = args.gravity_y {
            settings.gravity = Vec2::new(settings.gravity.x, gy);
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();
        log::info!("springbox starting...");

        let settings = load_settings(&args)?;
        let (mut world, _scene) = scenario::demo(args.width, args.height, settings)?;

        if args.scatter > 0 {
            // Keep scattered balls inside the octagon's inscribed box
            let inset = args.width.min(args.height) * scenario::WALL_INSET_RATIO;
            let min = Vec2::splat(inset);
            let max = Vec2::new(args.width - inset, args.height - inset);
            scenario::scatter(&mut world, args.scatter, min, max, args.seed)?;
        }

        let report_every = args.report_every.max(1);
        for _ in 0..args.ticks {
            world.advance()?;
            if world.tick_count() % report_every == 0 {
                log::info!(
                    "tick {:>5}: bodies={} springs={} kinetic={:.3}",
                    world.tick_count(),
                    world.body_count(),
                    world.spring_count(),
                    world.kinetic_energy()
                );
            }
        }

        if let Some(path) = &args.snapshot {
            let json = world.snapshot().to_json()?;
            fs::write(path, json).with_context(|| format!("writing snapshot to {}", path.display()))?;
            log::info!("Snapshot written to {}", path.display());
        }

        log::info!(
            "Done after {} ticks ({:.2} simulated seconds)",
            world.tick_count(),
            world.tick_count() as f32 * world.settings().dt
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; nothing to drive headlessly
}
