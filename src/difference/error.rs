//! Error taxonomy for the frame difference core.

use thiserror::Error;

/// Errors reported by [`FrameDifferenceModel`](super::FrameDifferenceModel).
///
/// Every variant is a precondition or resource failure detected before any
/// state is mutated; a failed call leaves the model exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameDifferenceError {
    /// `initialize` was called on a model that already holds state.
    #[error("model is already initialized ({width}x{height})")]
    AlreadyInitialized {
        /// Width of the existing model.
        width: u32,
        /// Height of the existing model.
        height: u32,
    },

    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// An RGB buffer does not hold exactly three bytes per pixel.
    #[error("frame buffer has {actual} bytes, expected {expected}")]
    FrameSizeMismatch {
        /// Required length in bytes.
        expected: usize,
        /// Length of the buffer passed in.
        actual: usize,
    },

    /// An output map does not hold exactly one byte per pixel.
    #[error("{map} map has {actual} bytes, expected {expected}")]
    MaskSizeMismatch {
        /// Which map was rejected.
        map: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Length of the map passed in.
        actual: usize,
    },

    /// The model has not been initialized.
    #[error("model not initialized")]
    NotInitialized,

    /// Masks were requested before any frame was ingested.
    #[error("no frame ingested since initialization")]
    NoFrameIngested,

    /// The history buffer could not be allocated.
    #[error("failed to allocate history for {pixels} pixels")]
    HistoryAllocation {
        /// Pixel count that was requested.
        pixels: usize,
    },
}
