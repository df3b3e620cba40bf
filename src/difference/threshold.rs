//! Two-cluster adaptive threshold estimation.
//!
//! Pixels are split around the midpoint of the latest frame's luminance
//! range. The refined threshold is derived from the two cluster means and
//! is what the mask generator compares difference products against.

use super::history::{HistoryBuffer, MIDDLE, NEWEST, OLDEST};
use super::FrameRange;
use serde::{Deserialize, Serialize};

/// Divisor applied to the sum of the cluster means.
///
/// Kept at 100 for compatibility with established outputs; the refined
/// threshold therefore sits two orders of magnitude below the intensity
/// scale.
pub const REFINEMENT_DIVISOR: f64 = 100.0;

/// Which value of a pixel's history represents it during clustering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterSample {
    /// The middle history slot.
    #[default]
    Middle,
    /// Integer mean of all three slots.
    WindowMean,
    /// Integer mean of `oldest, middle, oldest`, reproducing older outputs.
    LegacyMean,
}

impl ClusterSample {
    /// Picks the representative intensity from a history window.
    #[inline]
    pub fn representative(self, window: &[u8]) -> u8 {
        let (o, m, n) = (
            window[OLDEST] as u16,
            window[MIDDLE] as u16,
            window[NEWEST] as u16,
        );
        match self {
            ClusterSample::Middle => window[MIDDLE],
            ClusterSample::WindowMean => ((o + m + n) / 3) as u8,
            ClusterSample::LegacyMean => ((o + m + o) / 3) as u8,
        }
    }
}

/// How to refine the threshold when one cluster is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegeneratePolicy {
    /// The empty cluster contributes a mean of zero.
    #[default]
    ZeroMean,
    /// Fall back to the coarse midpoint threshold.
    Coarse,
}

/// Mean of a cluster, undefined when the cluster has no members.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterMean {
    /// Mean of a non-empty cluster.
    Mean(f64),
    /// The cluster had no members.
    Undefined,
}

impl ClusterMean {
    /// Returns the mean, or `fallback` if undefined.
    pub fn unwrap_or(self, fallback: f64) -> f64 {
        match self {
            ClusterMean::Mean(m) => m,
            ClusterMean::Undefined => fallback,
        }
    }

    /// Returns true for a non-empty cluster.
    pub fn is_defined(self) -> bool {
        matches!(self, ClusterMean::Mean(_))
    }
}

/// Running member count and intensity sum of one cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterStats {
    /// Number of member pixels.
    pub count: u64,
    /// Sum of the members' representative intensities.
    pub sum: u64,
}

impl ClusterStats {
    #[inline]
    fn push(&mut self, value: u8) {
        self.count += 1;
        self.sum += value as u64;
    }

    /// Returns the cluster mean, truncated to a whole intensity.
    pub fn mean(&self) -> ClusterMean {
        if self.count == 0 {
            ClusterMean::Undefined
        } else {
            ClusterMean::Mean((self.sum / self.count) as f64)
        }
    }
}

/// Result of one threshold estimation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdEstimate {
    /// Midpoint of the latest frame's luminance range.
    pub coarse: u8,
    /// Threshold derived from the cluster means.
    pub refined: f64,
    /// Pixels whose representative is at or above `coarse`.
    pub foreground: ClusterStats,
    /// Pixels whose representative is below `coarse`.
    pub background: ClusterStats,
}

impl ThresholdEstimate {
    /// Returns true if either cluster was empty.
    pub fn is_degenerate(&self) -> bool {
        self.foreground.count == 0 || self.background.count == 0
    }
}

/// Estimates the refined threshold from the pixel history.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEstimator {
    sample: ClusterSample,
    policy: DegeneratePolicy,
}

impl ThresholdEstimator {
    /// Creates an estimator with the given sampling and empty-cluster policy.
    pub fn new(sample: ClusterSample, policy: DegeneratePolicy) -> Self {
        Self { sample, policy }
    }

    /// Midpoint of the luminance range, rounded down.
    #[inline]
    pub fn coarse_threshold(range: FrameRange) -> u8 {
        ((range.min as u16 + range.max as u16) / 2) as u8
    }

    /// Clusters every pixel and refines the threshold.
    ///
    /// `indicator` receives `1` for pixels in the foreground cluster and `0`
    /// otherwise; it must hold one byte per pixel of `history`.
    pub fn estimate(
        &self,
        history: &HistoryBuffer,
        range: FrameRange,
        indicator: &mut [u8],
    ) -> ThresholdEstimate {
        let coarse = Self::coarse_threshold(range);
        let mut foreground = ClusterStats::default();
        let mut background = ClusterStats::default();

        for (window, flag) in history.iter().zip(indicator.iter_mut()) {
            let value = self.sample.representative(window);
            if value >= coarse {
                *flag = 1;
                foreground.push(value);
            } else {
                *flag = 0;
                background.push(value);
            }
        }

        let refined = self.refine(coarse, foreground.mean(), background.mean());

        ThresholdEstimate {
            coarse,
            refined,
            foreground,
            background,
        }
    }

    fn refine(&self, coarse: u8, fg: ClusterMean, bg: ClusterMean) -> f64 {
        if !(fg.is_defined() && bg.is_defined()) {
            tracing::warn!(
                foreground_defined = fg.is_defined(),
                background_defined = bg.is_defined(),
                policy = ?self.policy,
                "Empty cluster during threshold estimation"
            );

            if self.policy == DegeneratePolicy::Coarse {
                return coarse as f64;
            }
        }

        (fg.unwrap_or(0.0) + bg.unwrap_or(0.0)) / REFINEMENT_DIVISOR
    }
}
