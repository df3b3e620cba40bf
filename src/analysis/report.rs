//! Run timing and throughput report.

use super::MaskStatistics;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Accumulates timing and change counts over a processed sequence.
#[derive(Debug, Clone)]
pub struct RunReport {
    started_at: DateTime<Utc>,
    started: Instant,
    elapsed: Option<Duration>,
    frames: u64,
    computed: u64,
    changed_pixels: u64,
    degenerate: u64,
}

impl RunReport {
    /// Starts the clock.
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            elapsed: None,
            frames: 0,
            computed: 0,
            changed_pixels: 0,
            degenerate: 0,
        }
    }

    /// Counts a frame consumed by the model (seed or ingested).
    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    /// Counts a computed mask.
    pub fn record_masks(&mut self, stats: &MaskStatistics) {
        self.computed += 1;
        self.changed_pixels += stats.changed as u64;
        if stats.degenerate {
            self.degenerate += 1;
        }
    }

    /// Stops the clock. Later calls keep the first measurement.
    pub fn finish(&mut self) {
        if self.elapsed.is_none() {
            self.elapsed = Some(self.started.elapsed());
        }
    }

    /// Wall-clock start of the run.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Elapsed time, measured up to now if not finished.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }

    /// Frames consumed, including the seed frame.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Masks computed.
    pub fn computed(&self) -> u64 {
        self.computed
    }

    /// Changed pixels summed over all masks.
    pub fn changed_pixels(&self) -> u64 {
        self.changed_pixels
    }

    /// Masks computed with an empty cluster.
    pub fn degenerate(&self) -> u64 {
        self.degenerate
    }

    /// Frames per second, `None` if nothing was processed or no time
    /// elapsed.
    pub fn fps(&self) -> Option<f64> {
        frames_per_second(self.frames, self.elapsed())
    }
}

/// Throughput with guarded division.
pub fn frames_per_second(frames: u64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if frames == 0 || secs <= 0.0 {
        return None;
    }
    Some(frames as f64 / secs)
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Execution time: {:.6} seconds  |  ",
            self.elapsed().as_secs_f64()
        )?;
        match self.fps() {
            Some(fps) => write!(f, "{:.0} fps", fps),
            None => write!(f, "fps undefined"),
        }
    }
}
