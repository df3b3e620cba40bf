//! Temporal Frame Difference Library
//!
//! Detects change in an image sequence by comparing each pixel's three
//! most recent luminance samples. The core keeps a fixed-depth history per
//! pixel, derives an adaptive threshold from the latest frame's intensity
//! distribution and marks pixels changed only when two consecutive
//! differences are both large.
//!
//! # Architecture
//!
//! ```text
//! capture → difference → analysis
//!                ↓           ↓
//!             metrics (Prometheus)
//! ```
//!
//! Image decoding and encoding stay outside the crate: frames arrive as
//! interleaved RGB bytes and masks leave as one byte per pixel.
//!
//! # Example
//!
//! ```
//! use frame_difference::{FrameDifferenceModel, BACKGROUND_LABEL, FOREGROUND_LABEL};
//!
//! let gray = vec![128u8; 4 * 4 * 3];
//! let mut model = FrameDifferenceModel::new();
//! model.initialize(&gray, 4, 4).unwrap();
//! model.ingest(&gray).unwrap();
//!
//! let mut segmentation = vec![FOREGROUND_LABEL; 16];
//! let mut indicator = vec![0u8; 16];
//! model.compute(&mut segmentation, &mut indicator).unwrap();
//!
//! assert!(segmentation.iter().all(|&v| v == BACKGROUND_LABEL));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod capture;
pub mod difference;
pub mod metrics;

// Re-export commonly used types at crate root
pub use analysis::{MaskStatistics, RunReport};
pub use capture::{FileConfig, Frame, FrameSource, SequenceConfig, SyntheticSource};
pub use difference::{
    DifferenceMasks, FrameDifferenceError, FrameDifferenceModel, FrameRange, MaskOutcome,
    ModelConfig, ThresholdMode, BACKGROUND_LABEL, FOREGROUND_LABEL, HISTORY_DEPTH,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
