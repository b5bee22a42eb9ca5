use serde::Serialize;
use std::sync::Mutex;

/// Counters collected while analysing tracks.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub tracks_analyzed: usize,
    pub legs_retained: usize,
    pub legs_dropped: usize,
    pub ceiling_hits: usize,
    pub ceiling_misses: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_track(&self, retained: usize, dropped: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.tracks_analyzed += 1;
            metrics.legs_retained += retained;
            metrics.legs_dropped += dropped;
        }
    }

    pub fn record_ceiling(&self, hit: bool) {
        if let Ok(mut metrics) = self.inner.lock() {
            if hit {
                metrics.ceiling_hits += 1;
            } else {
                metrics.ceiling_misses += 1;
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics = MetricsSnapshot::default();
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
