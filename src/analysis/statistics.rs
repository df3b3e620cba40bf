//! Per-frame mask statistics.

use crate::difference::DifferenceMasks;

/// Summary of one computed pair of masks.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskStatistics {
    /// Pixels left with a non-background label.
    pub changed: usize,
    /// Pixels in the bright cluster of the indicator map.
    pub indicator_set: usize,
    /// Total pixels.
    pub pixels: usize,
    /// Coarse (midpoint) threshold.
    pub coarse_threshold: u8,
    /// Threshold estimated from the cluster means.
    pub refined_threshold: f64,
    /// Threshold the products were compared to.
    pub applied_threshold: f64,
    /// True if a cluster was empty during estimation.
    pub degenerate: bool,
}

impl MaskStatistics {
    /// Summarizes masks produced by the model.
    pub fn analyze(masks: &DifferenceMasks, background_label: u8) -> Self {
        Self {
            changed: count_changed(&masks.segmentation, background_label),
            indicator_set: masks.indicator.iter().filter(|&&v| v != 0).count(),
            pixels: masks.segmentation.len(),
            coarse_threshold: masks.outcome.estimate.coarse,
            refined_threshold: masks.outcome.estimate.refined,
            applied_threshold: masks.outcome.applied_threshold,
            degenerate: masks.outcome.estimate.is_degenerate(),
        }
    }

    /// Fraction of pixels marked changed, `None` for an empty mask.
    pub fn changed_ratio(&self) -> Option<f64> {
        if self.pixels == 0 {
            return None;
        }
        Some(self.changed as f64 / self.pixels as f64)
    }
}

/// Counts pixels whose label differs from `background_label`.
pub fn count_changed(segmentation: &[u8], background_label: u8) -> usize {
    segmentation.iter().filter(|&&v| v != background_label).count()
}
