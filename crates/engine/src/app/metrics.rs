use std::time::{Duration, Instant};

/// Rates for one completed metrics interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LoopMetricsSnapshot {
    pub(crate) fps: f32,
    pub(crate) tps: f32,
    pub(crate) frame_time_ms: f32,
    pub(crate) slowest_frame_ms: f32,
}

/// Accumulates frame/tick counts over a fixed interval and emits one snapshot
/// per elapsed interval.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
    slowest_frame: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            ticks: 0,
            frame_time_sum: Duration::ZERO,
            slowest_frame: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        if frame_dt > self.slowest_frame {
            self.slowest_frame = frame_dt;
        }
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_count = self.frames.max(1) as f32;
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms: self.frame_time_sum.as_secs_f32() * 1000.0 / frame_count,
            slowest_frame_ms: self.slowest_frame.as_secs_f32() * 1000.0,
        };

        self.interval_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_sum = Duration::ZERO;
        self.slowest_frame = Duration::ZERO;
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_waits_for_full_interval() {
        let start = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), start);
        accumulator.record_frame(Duration::from_millis(16));
        accumulator.record_tick();

        assert_eq!(
            accumulator.maybe_snapshot(start + Duration::from_millis(500)),
            None
        );
    }

    #[test]
    fn accumulator_reports_rates_over_elapsed_time() {
        let start = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), start);
        for _ in 0..60 {
            accumulator.record_frame(Duration::from_millis(10));
        }
        for _ in 0..30 {
            accumulator.record_tick();
        }

        let snapshot = accumulator
            .maybe_snapshot(start + Duration::from_secs(2))
            .unwrap();
        assert!((snapshot.fps - 30.0).abs() < 0.01);
        assert!((snapshot.tps - 15.0).abs() < 0.01);
        assert!((snapshot.frame_time_ms - 10.0).abs() < 0.01);
    }

    #[test]
    fn accumulator_tracks_slowest_frame() {
        let start = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), start);
        accumulator.record_frame(Duration::from_millis(5));
        accumulator.record_frame(Duration::from_millis(40));
        accumulator.record_frame(Duration::from_millis(12));

        let snapshot = accumulator
            .maybe_snapshot(start + Duration::from_secs(1))
            .unwrap();
        assert!((snapshot.slowest_frame_ms - 40.0).abs() < 0.01);
    }

    #[test]
    fn accumulator_resets_after_snapshot() {
        let start = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), start);
        accumulator.record_frame(Duration::from_millis(50));
        accumulator
            .maybe_snapshot(start + Duration::from_secs(1))
            .unwrap();

        accumulator.record_frame(Duration::from_millis(10));
        let snapshot = accumulator
            .maybe_snapshot(start + Duration::from_secs(2))
            .unwrap();
        assert!((snapshot.slowest_frame_ms - 10.0).abs() < 0.01);
        assert!((snapshot.fps - 1.0).abs() < 0.01);
    }

    #[test]
    fn empty_interval_reports_zero_rates() {
        let start = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), start);

        let snapshot = accumulator
            .maybe_snapshot(start + Duration::from_secs(1))
            .unwrap();
        assert_eq!(snapshot.fps, 0.0);
        assert_eq!(snapshot.tps, 0.0);
        assert_eq!(snapshot.frame_time_ms, 0.0);
    }
}
