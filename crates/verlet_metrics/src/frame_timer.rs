//! Per-report frame timing for the headless driver

use std::time::{Duration, Instant};

/// Frame-time summary over one report interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    /// Frames per second of measured compute time, not simulated time.
    pub fps: f64,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Accumulates the compute time between `begin` and `end` until the next
/// [`take_stats`](Self::take_stats).
///
/// The driver steps at a fixed simulated `dt`, so only wall-clock cost per
/// frame is worth reporting.
#[derive(Debug)]
pub struct FrameTimer {
    frame_start: Instant,
    frames: u64,
    total: Duration,
    min: Duration,
    max: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
            frames: 0,
            total: Duration::ZERO,
            min: Duration::MAX,
            max: Duration::ZERO,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    pub fn end(&mut self) {
        self.record(self.frame_start.elapsed());
    }

    fn record(&mut self, frame: Duration) {
        self.frames += 1;
        self.total += frame;
        self.min = self.min.min(frame);
        self.max = self.max.max(frame);
    }

    /// Summary of the frames recorded so far in this interval.
    pub fn stats(&self) -> FrameStats {
        if self.frames == 0 {
            return FrameStats::default();
        }
        let mean = self.total.as_secs_f64() / self.frames as f64;
        FrameStats {
            frames: self.frames,
            fps: if mean > 0.0 { 1.0 / mean } else { 0.0 },
            mean_ms: mean * 1000.0,
            min_ms: self.min.as_secs_f64() * 1000.0,
            max_ms: self.max.as_secs_f64() * 1000.0,
        }
    }

    /// Return the current summary and start a new interval.
    pub fn take_stats(&mut self) -> FrameStats {
        let stats = self.stats();
        *self = Self {
            frame_start: self.frame_start,
            ..Self::new()
        };
        stats
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interval_reports_zero() {
        let timer = FrameTimer::new();
        assert_eq!(timer.stats(), FrameStats::default());
    }

    #[test]
    fn stats_cover_recorded_frames() {
        let mut timer = FrameTimer::new();
        for ms in [2, 4, 6] {
            timer.record(Duration::from_millis(ms));
        }

        let stats = timer.stats();
        assert_eq!(stats.frames, 3);
        assert!((stats.mean_ms - 4.0).abs() < 1e-9);
        assert!((stats.min_ms - 2.0).abs() < 1e-9);
        assert!((stats.max_ms - 6.0).abs() < 1e-9);
        assert!((stats.fps - 250.0).abs() < 1e-6);
    }

    #[test]
    fn taking_stats_starts_a_new_interval() {
        let mut timer = FrameTimer::new();
        timer.record(Duration::from_millis(10));
        assert_eq!(timer.take_stats().frames, 1);

        timer.record(Duration::from_millis(1));
        let stats = timer.take_stats();
        assert_eq!(stats.frames, 1);
        assert!((stats.max_ms - 1.0).abs() < 1e-9);
        assert_eq!(timer.stats().frames, 0);
    }

    #[test]
    fn measured_frames_are_ordered() {
        let mut timer = FrameTimer::new();
        for _ in 0..3 {
            timer.begin();
            std::hint::black_box((0..1000).sum::<u64>());
            timer.end();
        }
        let stats = timer.stats();
        assert_eq!(stats.frames, 3);
        assert!(stats.min_ms >= 0.0);
        assert!(stats.min_ms <= stats.max_ms);
        assert!(stats.mean_ms >= stats.min_ms - 1e-9 && stats.mean_ms <= stats.max_ms + 1e-9);
    }
}
