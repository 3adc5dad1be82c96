//! Headless frame loop: spawn, step, report

use crate::settings::{DriverSettings, Settings};
use crate::spawner::Spawner;
use anyhow::{Context, Result};
use verlet_core::time::clamp_frame_dt;
use verlet_core::Solver;
use verlet_metrics::{Counter, FrameStats, FrameTimer};

/// Totals returned by [`Driver::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub particles: usize,
    pub collision_checks: u64,
}

pub struct Driver {
    solver: Solver,
    spawner: Spawner,
    settings: DriverSettings,
    frame_timer: FrameTimer,
    counters: Counter,
}

impl Driver {
    pub fn new(settings: Settings) -> Result<Self> {
        let solver = Solver::new(settings.solver).context("invalid solver configuration")?;
        Ok(Self {
            solver,
            spawner: Spawner::new(settings.spawn),
            frame_timer: FrameTimer::new(),
            settings: settings.driver,
            counters: Counter::new(),
        })
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// One frame: spawn, then step the solver by the clamped frame dt.
    pub fn step(&mut self) {
        self.frame_timer.begin();

        let dt = clamp_frame_dt(self.settings.frame_dt, self.settings.max_frame_dt);
        let spawned = self.spawner.spawn(&mut self.solver);
        self.counters.increment("spawned", spawned as u64);
        if spawned > 0 && self.spawner.is_exhausted(&self.solver) {
            tracing::info!(particles = self.solver.particle_count(), "particle cap reached");
        }

        if self.settings.physics_enabled {
            self.solver.update(dt);
            self.counters.increment("physics_frames", 1);
        }
        self.counters.increment("frames", 1);

        self.frame_timer.end();
    }

    pub fn run(&mut self) -> RunSummary {
        tracing::info!(
            frames = self.settings.frames,
            physics = self.settings.physics_enabled,
            "starting simulation"
        );

        let interval = self.settings.report_interval;
        for frame in 1..=self.settings.frames {
            self.step();
            if interval > 0 && frame % interval == 0 {
                self.report(frame);
            }
        }

        self.report_totals();
        RunSummary {
            frames: self.settings.frames,
            particles: self.solver.particle_count(),
            collision_checks: self.solver.collision_checks(),
        }
    }

    /// Log frame timing since the previous report, then start a new interval.
    fn report(&mut self, frame: u64) {
        let stats = self.frame_timer.take_stats();
        tracing::info!(
            frame,
            fps = %format!("{:.1}", stats.fps),
            frame_ms = %format!("{:.3}", stats.mean_ms),
            min_ms = %format!("{:.3}", stats.min_ms),
            max_ms = %format!("{:.3}", stats.max_ms),
            particles = self.solver.particle_count(),
            checks = self.solver.collision_checks(),
            "status"
        );
    }

    fn report_totals(&self) {
        for (name, value) in self.counters.iter() {
            tracing::info!(counter = name, value, "total");
        }
        for (phase, timing) in self.solver.profiler().iter() {
            tracing::info!(
                phase,
                calls = timing.calls,
                total_ms = %format!("{:.2}", timing.total.as_secs_f64() * 1000.0),
                avg_us = %format!("{:.2}", timing.average().as_secs_f64() * 1e6),
                "phase timing"
            );
        }
        tracing::info!(
            simulated_s = %format!("{:.3}", self.solver.time().elapsed()),
            "simulation finished"
        );
    }

    pub fn counters(&self) -> &Counter {
        &self.counters
    }

    /// Frame timing accumulated since the last report.
    pub fn frame_stats(&self) -> FrameStats {
        self.frame_timer.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SpawnSettings;

    fn small_settings(physics_enabled: bool) -> Settings {
        Settings {
            spawn: SpawnSettings {
                max_particles: 30,
                ..SpawnSettings::default()
            },
            driver: DriverSettings {
                frames: 60,
                physics_enabled,
                report_interval: 0,
                ..DriverSettings::default()
            },
            ..Settings::default()
        }
    }

    #[test]
    fn run_spawns_up_to_the_cap() {
        let mut driver = Driver::new(small_settings(true)).unwrap();
        let summary = driver.run();

        assert_eq!(summary.frames, 60);
        assert_eq!(summary.particles, 30);
        assert_eq!(driver.counters().get("spawned"), 30);
        assert_eq!(driver.counters().get("physics_frames"), 60);
        assert!(driver.solver().time().elapsed() > 0.0);
    }

    #[test]
    fn disabled_physics_leaves_particles_in_place() {
        let mut driver = Driver::new(small_settings(false)).unwrap();
        driver.run();

        assert_eq!(driver.counters().get("physics_frames"), 0);
        for p in driver.solver().particles() {
            assert_eq!(p.position.y, 100.0);
        }
        assert_eq!(driver.solver().time().frame_count(), 0);
    }

    #[test]
    fn frame_dt_is_clamped_before_the_solver() {
        let mut settings = small_settings(true);
        settings.driver.frame_dt = 5.0;
        settings.driver.frames = 1;
        let mut driver = Driver::new(settings).unwrap();
        driver.step();

        // 5.0 -> 0.1 in the driver, then 0.1 -> 0.05 in the solver.
        assert!((driver.solver().time().elapsed() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn reports_restart_the_frame_window() {
        let mut settings = small_settings(true);
        settings.driver.frames = 25;
        settings.driver.report_interval = 10;
        let mut driver = Driver::new(settings).unwrap();
        driver.run();

        // Reports at frames 10 and 20 leave the last 5 frames pending.
        assert_eq!(driver.frame_stats().frames, 5);
    }

    #[test]
    fn bad_solver_config_is_an_error() {
        let mut settings = small_settings(true);
        settings.solver.sub_steps = 0;
        let err = Driver::new(settings).err().unwrap();
        assert!(format!("{err:#}").contains("sub-step"));
    }
}
