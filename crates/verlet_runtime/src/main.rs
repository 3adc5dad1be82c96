//! Verlet Runtime
//!
//! Headless driver for the particle solver. Rendering and windowing live
//! elsewhere; this binary runs the spawn/step loop and logs diagnostics.
//!
//! Usage: `verlet [settings.json]`

mod driver;
mod settings;
mod spawner;

use anyhow::Result;
use settings::Settings;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Verlet solver v{}", verlet_core::VERSION);

    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading settings");
            Settings::load(&path)?
        }
        None => Settings::default(),
    };

    let mut driver = driver::Driver::new(settings)?;
    let summary = driver.run();

    tracing::info!(
        frames = summary.frames,
        particles = summary.particles,
        checks = summary.collision_checks,
        spawned = driver.counters().get("spawned"),
        "done"
    );
    Ok(())
}
