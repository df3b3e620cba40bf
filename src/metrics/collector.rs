//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Metric creation, registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of engine state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Frames ingested since initialization.
    pub frames_ingested: u64,
    /// Minimum luminance of the latest frame.
    pub frame_min: Option<u8>,
    /// Maximum luminance of the latest frame.
    pub frame_max: Option<u8>,
    /// Externally configured difference threshold.
    pub configured_threshold: u32,
    /// Coarse threshold of the latest computation.
    pub coarse_threshold: Option<u8>,
    /// Refined threshold of the latest computation.
    pub refined_threshold: Option<f64>,
    /// Threshold applied in the latest computation.
    pub applied_threshold: Option<f64>,
    /// Changed pixels in the latest segmentation map.
    pub changed_pixels: Option<usize>,
    /// Changed pixel fraction of the latest segmentation map.
    pub changed_ratio: Option<f64>,
    /// Total computations with an empty cluster.
    pub degenerate_estimates: u64,
}

/// Prometheus metrics registry for frame difference monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Model metrics
    frames_ingested_total: IntCounter,
    frame_min: IntGauge,
    frame_max: IntGauge,

    // Threshold metrics
    configured_threshold: IntGauge,
    coarse_threshold: IntGauge,
    refined_threshold: Gauge,
    applied_threshold: Gauge,
    degenerate_estimates_total: IntCounter,

    // Mask metrics
    changed_pixels: IntGauge,
    changed_ratio: Gauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_ingested_total = IntCounter::new(
            "frame_difference_frames_ingested_total",
            "Total frames ingested into the history",
        )?;
        let frame_min = IntGauge::new(
            "frame_difference_frame_min",
            "Minimum luminance of the latest frame",
        )?;
        let frame_max = IntGauge::new(
            "frame_difference_frame_max",
            "Maximum luminance of the latest frame",
        )?;

        let configured_threshold = IntGauge::new(
            "frame_difference_configured_threshold",
            "Externally configured frame difference threshold",
        )?;
        let coarse_threshold = IntGauge::new(
            "frame_difference_coarse_threshold",
            "Midpoint threshold used for clustering",
        )?;
        let refined_threshold = Gauge::new(
            "frame_difference_refined_threshold",
            "Threshold estimated from the cluster means",
        )?;
        let applied_threshold = Gauge::new(
            "frame_difference_applied_threshold",
            "Threshold compared against difference products",
        )?;
        let degenerate_estimates_total = IntCounter::new(
            "frame_difference_degenerate_estimates_total",
            "Threshold estimations with an empty cluster",
        )?;

        let changed_pixels = IntGauge::new(
            "frame_difference_changed_pixels",
            "Pixels marked changed in the latest segmentation map",
        )?;
        let changed_ratio = Gauge::new(
            "frame_difference_changed_ratio",
            "Fraction of pixels marked changed in the latest segmentation map",
        )?;

        registry.register(Box::new(frames_ingested_total.clone()))?;
        registry.register(Box::new(frame_min.clone()))?;
        registry.register(Box::new(frame_max.clone()))?;
        registry.register(Box::new(configured_threshold.clone()))?;
        registry.register(Box::new(coarse_threshold.clone()))?;
        registry.register(Box::new(refined_threshold.clone()))?;
        registry.register(Box::new(applied_threshold.clone()))?;
        registry.register(Box::new(degenerate_estimates_total.clone()))?;
        registry.register(Box::new(changed_pixels.clone()))?;
        registry.register(Box::new(changed_ratio.clone()))?;

        Ok(Self {
            registry,
            frames_ingested_total,
            frame_min,
            frame_max,
            configured_threshold,
            coarse_threshold,
            refined_threshold,
            applied_threshold,
            degenerate_estimates_total,
            changed_pixels,
            changed_ratio,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward by the difference
        let current_frames = self.frames_ingested_total.get();
        if snapshot.frames_ingested > current_frames {
            self.frames_ingested_total
                .inc_by(snapshot.frames_ingested - current_frames);
        }
        let current_degenerate = self.degenerate_estimates_total.get();
        if snapshot.degenerate_estimates > current_degenerate {
            self.degenerate_estimates_total
                .inc_by(snapshot.degenerate_estimates - current_degenerate);
        }

        if let Some(min) = snapshot.frame_min {
            self.frame_min.set(min as i64);
        }
        if let Some(max) = snapshot.frame_max {
            self.frame_max.set(max as i64);
        }

        self.configured_threshold
            .set(snapshot.configured_threshold as i64);
        if let Some(coarse) = snapshot.coarse_threshold {
            self.coarse_threshold.set(coarse as i64);
        }
        if let Some(refined) = snapshot.refined_threshold {
            self.refined_threshold.set(refined);
        }
        if let Some(applied) = snapshot.applied_threshold {
            self.applied_threshold.set(applied);
        }

        if let Some(changed) = snapshot.changed_pixels {
            self.changed_pixels.set(changed as i64);
        }
        if let Some(ratio) = snapshot.changed_ratio {
            self.changed_ratio.set(ratio);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the model, the run report and the statistics
    /// of the latest masks.
    pub fn from_components(
        model: &crate::difference::FrameDifferenceModel,
        report: &crate::analysis::RunReport,
        latest: Option<&crate::analysis::MaskStatistics>,
    ) -> Self {
        let range = model.frame_range();

        Self {
            frames_ingested: model.frames_ingested(),
            frame_min: range.map(|r| r.min),
            frame_max: range.map(|r| r.max),
            configured_threshold: model.frame_difference_threshold(),
            coarse_threshold: latest.map(|s| s.coarse_threshold),
            refined_threshold: latest.map(|s| s.refined_threshold),
            applied_threshold: latest.map(|s| s.applied_threshold),
            changed_pixels: latest.map(|s| s.changed),
            changed_ratio: latest.and_then(|s| s.changed_ratio()),
            degenerate_estimates: report.degenerate(),
        }
    }
}
