//! Temporal frame difference engine.
//!
//! This module keeps a three-frame luminance history per pixel, estimates
//! an adaptive threshold from the latest frame's intensity distribution
//! and produces binary change masks from the product of two consecutive
//! absolute differences.

mod error;
mod history;
mod luminance;
mod mask;
mod model;
mod threshold;

pub use error::FrameDifferenceError;
pub use history::{HistoryBuffer, HISTORY_DEPTH};
pub use luminance::{luminance, reduce_frame, CHANNELS};
pub use mask::{difference_product, MaskGenerator, BACKGROUND_LABEL, FOREGROUND_LABEL, MAX_PRODUCT};
pub use model::{
    DifferenceMasks, FrameDifferenceModel, FrameRange, MaskOutcome, ModelConfig, ThresholdMode,
};
pub use threshold::{
    ClusterMean, ClusterSample, ClusterStats, DegeneratePolicy, ThresholdEstimate,
    ThresholdEstimator, REFINEMENT_DIVISOR,
};
