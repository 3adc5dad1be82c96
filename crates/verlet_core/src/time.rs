//! Frame time policy
//!
//! Frame deltas arrive from a wall clock and are clamped twice: once by the
//! driver loop and once more at the solver's entry point. Large deltas cause
//! tunneling; negative ones would run the integrator backwards.

/// Upper bound applied by `Solver::update` (seconds).
pub const SOLVER_MAX_FRAME_DT: f32 = 0.05;

/// Upper bound applied by the driver before handing dt to the solver (seconds).
pub const DRIVER_MAX_FRAME_DT: f32 = 0.1;

/// Clamp a measured frame delta to `[0, max]`.
///
/// NaN and negative values become zero; `+inf` becomes `max`.
#[inline]
pub fn clamp_frame_dt(dt: f32, max: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max)
    }
}

/// Simulated time tracker
#[derive(Debug, Clone, Default)]
pub struct SimulationTime {
    frame_count: u64,
    elapsed: f64,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            elapsed: 0.0,
        }
    }

    /// Number of `update` calls.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total simulated seconds (sum of clamped frame deltas).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f32) {
        self.frame_count += 1;
        self.elapsed += f64::from(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_out_of_range_values() {
        assert_eq!(clamp_frame_dt(0.01, SOLVER_MAX_FRAME_DT), 0.01);
        assert_eq!(clamp_frame_dt(0.5, SOLVER_MAX_FRAME_DT), SOLVER_MAX_FRAME_DT);
        assert_eq!(clamp_frame_dt(-0.2, SOLVER_MAX_FRAME_DT), 0.0);
        assert_eq!(clamp_frame_dt(f32::NAN, SOLVER_MAX_FRAME_DT), 0.0);
        assert_eq!(clamp_frame_dt(f32::INFINITY, DRIVER_MAX_FRAME_DT), DRIVER_MAX_FRAME_DT);
    }

    #[test]
    fn simulation_time_accumulates() {
        let mut time = SimulationTime::new();
        time.advance(0.05);
        time.advance(0.0);
        assert_eq!(time.frame_count(), 2);
        assert!((time.elapsed() - 0.05).abs() < 1e-9);
    }
}
