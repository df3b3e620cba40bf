//! Frame difference model: history ownership, frame ingestion and mask
//! computation.

use super::history::HistoryBuffer;
use super::luminance::{luminance, reduce_frame, CHANNELS};
use super::mask::{MaskGenerator, BACKGROUND_LABEL, FOREGROUND_LABEL};
use super::threshold::{ClusterSample, DegeneratePolicy, ThresholdEstimate, ThresholdEstimator};
use super::FrameDifferenceError;
use serde::{Deserialize, Serialize};

/// Luminance range of the most recently ingested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    /// Darkest luminance value.
    pub min: u8,
    /// Brightest luminance value.
    pub max: u8,
}

impl FrameRange {
    /// Computes the range of a luminance field. Empty input yields
    /// `min = 255, max = 0`.
    pub fn of(values: &[u8]) -> Self {
        values.iter().fold(Self { min: u8::MAX, max: 0 }, |r, &v| Self {
            min: r.min.min(v),
            max: r.max.max(v),
        })
    }
}

/// Which threshold the mask generator compares difference products to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdMode {
    /// Threshold estimated from the pixel history on every computation.
    /// The configured threshold is reported only.
    #[default]
    Adaptive,
    /// The configured `frame_difference_threshold`.
    Configured,
}

/// Tunable parameters of a [`FrameDifferenceModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Externally configured difference threshold.
    pub frame_difference_threshold: u32,
    /// Threshold used by the mask generator.
    pub mode: ThresholdMode,
    /// History value representing a pixel during clustering.
    pub cluster_sample: ClusterSample,
    /// Refinement when a cluster is empty.
    pub degenerate_policy: DegeneratePolicy,
    /// Segmentation label written for unchanged pixels.
    pub background_label: u8,
    /// Segmentation label pre-seeded by [`FrameDifferenceModel::compute_masks`].
    pub foreground_label: u8,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            frame_difference_threshold: 0,
            mode: ThresholdMode::Adaptive,
            cluster_sample: ClusterSample::Middle,
            degenerate_policy: DegeneratePolicy::ZeroMean,
            background_label: BACKGROUND_LABEL,
            foreground_label: FOREGROUND_LABEL,
        }
    }
}

/// Outcome of one mask computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskOutcome {
    /// Clustering result, computed regardless of mode.
    pub estimate: ThresholdEstimate,
    /// Threshold the difference products were compared to.
    pub applied_threshold: f64,
    /// Pixels set to the background label.
    pub cleared: usize,
}

/// Owned output of [`FrameDifferenceModel::compute_masks`].
#[derive(Debug, Clone)]
pub struct DifferenceMasks {
    /// Segmentation map, one label per pixel.
    pub segmentation: Vec<u8>,
    /// Clustering indicator map, `1` for the bright cluster.
    pub indicator: Vec<u8>,
    /// Thresholds and counts of the pass.
    pub outcome: MaskOutcome,
}

struct ModelState {
    width: u32,
    height: u32,
    history: HistoryBuffer,
    frame_range: FrameRange,
    frames_ingested: u64,
}

/// Three-frame temporal difference model for one image sequence.
///
/// The model starts empty. [`initialize`](Self::initialize) fixes the image
/// size from the first frame, after which every
/// [`ingest`](Self::ingest) shifts the per-pixel history by one frame.
/// Masks may be computed after any ingestion.
///
/// The model is not internally synchronized; share it across threads only
/// behind external locking. Independent models share no state.
pub struct FrameDifferenceModel {
    config: ModelConfig,
    state: Option<ModelState>,
}

impl FrameDifferenceModel {
    /// Creates an empty model with default parameters.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Creates an empty model with the given parameters.
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Fixes the model dimensions and seeds every history slot with the
    /// luminance of `rgb`.
    ///
    /// `rgb` holds `width * height` interleaved RGB triples. Can only be
    /// called once per model.
    pub fn initialize(
        &mut self,
        rgb: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), FrameDifferenceError> {
        if let Some(state) = &self.state {
            return Err(FrameDifferenceError::AlreadyInitialized {
                width: state.width,
                height: state.height,
            });
        }

        let invalid = FrameDifferenceError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| invalid.clone())?;
        let expected = pixels.checked_mul(CHANNELS).ok_or(invalid)?;
        check_frame_len(expected, rgb.len())?;

        let mut seed = Vec::new();
        seed.try_reserve_exact(pixels)
            .map_err(|_| FrameDifferenceError::HistoryAllocation { pixels })?;
        seed.resize(pixels, 0);
        reduce_frame(rgb, &mut seed);

        let history = HistoryBuffer::seeded(&seed)?;
        let frame_range = FrameRange::of(&seed);

        tracing::info!(width, height, "Frame difference model initialized");

        self.state = Some(ModelState {
            width,
            height,
            history,
            frame_range,
            frames_ingested: 0,
        });
        Ok(())
    }

    /// Pushes a frame into the history and records its luminance range.
    ///
    /// Single pass: each pixel is reduced, appended to its history and
    /// folded into the running minimum and maximum.
    pub fn ingest(&mut self, rgb: &[u8]) -> Result<(), FrameDifferenceError> {
        let state = self
            .state
            .as_mut()
            .ok_or(FrameDifferenceError::NotInitialized)?;
        check_frame_len(state.history.len() * CHANNELS, rgb.len())?;

        let mut min = u8::MAX;
        let mut max = u8::MIN;

        for (index, px) in rgb.chunks_exact(CHANNELS).enumerate() {
            let value = luminance(px[0], px[1], px[2]);
            min = min.min(value);
            max = max.max(value);
            state.history.shift_append(index, value);
        }

        state.frame_range = FrameRange { min, max };
        state.frames_ingested += 1;

        tracing::trace!(
            frame = state.frames_ingested,
            min,
            max,
            "Frame ingested"
        );
        Ok(())
    }

    /// Computes the indicator and segmentation maps for the current history.
    ///
    /// `frame_difference_map` is overwritten with the clustering indicator.
    /// `segmentation_map` is expected to be pre-seeded by the caller; only
    /// pixels without evidence of change are rewritten.
    pub fn compute(
        &self,
        segmentation_map: &mut [u8],
        frame_difference_map: &mut [u8],
    ) -> Result<MaskOutcome, FrameDifferenceError> {
        let state = self
            .state
            .as_ref()
            .ok_or(FrameDifferenceError::NotInitialized)?;
        if state.frames_ingested == 0 {
            return Err(FrameDifferenceError::NoFrameIngested);
        }

        let expected = state.history.len();
        check_map_len("segmentation", expected, segmentation_map.len())?;
        check_map_len("frame difference", expected, frame_difference_map.len())?;

        let estimator =
            ThresholdEstimator::new(self.config.cluster_sample, self.config.degenerate_policy);
        let estimate = estimator.estimate(&state.history, state.frame_range, frame_difference_map);

        let applied_threshold = match self.config.mode {
            ThresholdMode::Adaptive => estimate.refined,
            ThresholdMode::Configured => self.config.frame_difference_threshold as f64,
        };

        let cleared = MaskGenerator::with_background(self.config.background_label).apply(
            &state.history,
            applied_threshold,
            segmentation_map,
        );

        tracing::debug!(
            frame = state.frames_ingested,
            coarse = estimate.coarse,
            refined = estimate.refined,
            applied = applied_threshold,
            cleared,
            "Frame difference computed"
        );

        Ok(MaskOutcome {
            estimate,
            applied_threshold,
            cleared,
        })
    }

    /// Allocates both maps, pre-seeds the segmentation map with the
    /// foreground label and computes them.
    pub fn compute_masks(&self) -> Result<DifferenceMasks, FrameDifferenceError> {
        let pixels = self.pixel_count();
        let mut segmentation = vec![self.config.foreground_label; pixels];
        let mut indicator = vec![0u8; pixels];

        let outcome = self.compute(&mut segmentation, &mut indicator)?;

        Ok(DifferenceMasks {
            segmentation,
            indicator,
            outcome,
        })
    }

    /// Returns true once [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Image width, or 0 before initialization.
    pub fn width(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.width)
    }

    /// Image height, or 0 before initialization.
    pub fn height(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.height)
    }

    /// Number of pixels tracked, or 0 before initialization.
    pub fn pixel_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.history.len())
    }

    /// Frames ingested since initialization.
    pub fn frames_ingested(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.frames_ingested)
    }

    /// Luminance range of the latest frame (the seed frame until the first
    /// ingestion).
    pub fn frame_range(&self) -> Option<FrameRange> {
        self.state.as_ref().map(|s| s.frame_range)
    }

    /// Read-only view of the pixel history.
    pub fn history(&self) -> Option<&HistoryBuffer> {
        self.state.as_ref().map(|s| &s.history)
    }

    /// Current model configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Returns the configured difference threshold.
    pub fn frame_difference_threshold(&self) -> u32 {
        self.config.frame_difference_threshold
    }

    /// Sets the configured difference threshold.
    pub fn set_frame_difference_threshold(&mut self, threshold: u32) {
        self.config.frame_difference_threshold = threshold;
    }
}

impl Default for FrameDifferenceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameDifferenceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDifferenceModel")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("frames_ingested", &self.frames_ingested())
            .field("frame_range", &self.frame_range())
            .field("config", &self.config)
            .finish()
    }
}

fn check_frame_len(expected: usize, actual: usize) -> Result<(), FrameDifferenceError> {
    if expected != actual {
        return Err(FrameDifferenceError::FrameSizeMismatch { expected, actual });
    }
    Ok(())
}

fn check_map_len(
    map: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), FrameDifferenceError> {
    if expected != actual {
        return Err(FrameDifferenceError::MaskSizeMismatch {
            map,
            expected,
            actual,
        });
    }
    Ok(())
}
