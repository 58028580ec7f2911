use std::time::Duration;

const SAMPLE_WINDOW_LEN: usize = 120;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RollingMsStats {
    pub last_ms: f32,
    pub avg_ms: f32,
    pub max_ms: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PerfStatsSnapshot {
    pub sim: RollingMsStats,
    pub render: RollingMsStats,
}

/// Rolling windows of per-frame simulate and render times, for the overlay.
#[derive(Debug, Default)]
pub(crate) struct PerfStats {
    sim: SampleWindow,
    render: SampleWindow,
}

impl PerfStats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_frame(&mut self, sim_duration: Duration, render_duration: Duration) {
        self.sim.record(duration_to_ms(sim_duration));
        self.render.record(duration_to_ms(render_duration));
    }

    pub(crate) fn snapshot(&self) -> PerfStatsSnapshot {
        PerfStatsSnapshot {
            sim: self.sim.stats(),
            render: self.render.stats(),
        }
    }
}

#[derive(Debug)]
struct SampleWindow {
    values_ms: [f32; SAMPLE_WINDOW_LEN],
    next: usize,
    filled: usize,
    total_ms: f32,
    last_ms: f32,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self {
            values_ms: [0.0; SAMPLE_WINDOW_LEN],
            next: 0,
            filled: 0,
            total_ms: 0.0,
            last_ms: 0.0,
        }
    }
}

impl SampleWindow {
    fn record(&mut self, value_ms: f32) {
        self.last_ms = value_ms;
        self.total_ms += value_ms - self.values_ms[self.next];
        self.values_ms[self.next] = value_ms;
        self.next = (self.next + 1) % SAMPLE_WINDOW_LEN;
        if self.filled < SAMPLE_WINDOW_LEN {
            self.filled += 1;
        }
    }

    fn stats(&self) -> RollingMsStats {
        if self.filled == 0 {
            return RollingMsStats::default();
        }

        let mut max_ms = 0.0f32;
        for value in &self.values_ms[..self.filled] {
            if *value > max_ms {
                max_ms = *value;
            }
        }

        RollingMsStats {
            last_ms: self.last_ms,
            avg_ms: self.total_ms / self.filled as f32,
            max_ms,
        }
    }
}

fn duration_to_ms(duration: Duration) -> f32 {
    duration.as_secs_f32() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_reports_zeroes() {
        let stats = PerfStats::new().snapshot();
        assert_eq!(stats.sim, RollingMsStats::default());
        assert_eq!(stats.render, RollingMsStats::default());
    }

    #[test]
    fn partial_window_averages_over_recorded_samples() {
        let mut window = SampleWindow::default();
        window.record(2.0);
        window.record(4.0);

        let stats = window.stats();
        assert_eq!(stats.last_ms, 4.0);
        assert!((stats.avg_ms - 3.0).abs() < 0.0001);
        assert_eq!(stats.max_ms, 4.0);
    }

    #[test]
    fn eviction_replaces_oldest_sample_in_total() {
        let mut window = SampleWindow::default();
        for _ in 0..SAMPLE_WINDOW_LEN {
            window.record(8.0);
        }
        window.record(16.0);

        let stats = window.stats();
        let expected =
            ((SAMPLE_WINDOW_LEN as f32 - 1.0) * 8.0 + 16.0) / SAMPLE_WINDOW_LEN as f32;
        assert_eq!(stats.last_ms, 16.0);
        assert!((stats.avg_ms - expected).abs() < 0.001);
    }

    #[test]
    fn max_drops_once_spike_leaves_the_window() {
        let mut window = SampleWindow::default();
        window.record(50.0);
        for _ in 0..SAMPLE_WINDOW_LEN {
            window.record(5.0);
        }

        assert_eq!(window.stats().max_ms, 5.0);
    }

    #[test]
    fn record_frame_feeds_both_windows() {
        let mut stats = PerfStats::new();
        stats.record_frame(Duration::from_millis(2), Duration::from_millis(6));

        let snapshot = stats.snapshot();
        assert!((snapshot.sim.last_ms - 2.0).abs() < 0.0001);
        assert!((snapshot.render.last_ms - 6.0).abs() < 0.0001);
    }

    #[test]
    fn duration_to_ms_keeps_sub_millisecond_precision() {
        assert!((duration_to_ms(Duration::from_micros(250)) - 0.25).abs() < 0.0001);
    }
}
