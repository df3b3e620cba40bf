//! Prometheus metrics for the frame difference engine.
//!
//! # Metrics Exposed
//!
//! ## Model
//! - `frame_difference_frames_ingested_total` - Frames ingested into the history
//! - `frame_difference_frame_min` / `frame_difference_frame_max` - Luminance range of the latest frame
//!
//! ## Thresholds
//! - `frame_difference_configured_threshold` - Externally configured threshold
//! - `frame_difference_coarse_threshold` - Midpoint used for clustering
//! - `frame_difference_refined_threshold` - Estimate from the cluster means
//! - `frame_difference_applied_threshold` - Threshold the difference products were compared to
//! - `frame_difference_degenerate_estimates_total` - Estimations with an empty cluster
//!
//! ## Masks
//! - `frame_difference_changed_pixels` - Changed pixels in the latest segmentation map
//! - `frame_difference_changed_ratio` - Changed fraction of the latest segmentation map
//!
//! The HTTP exporter is only built with the `metrics` feature.

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{publish, MetricsServer, MetricsServerConfig, ServerError, SharedRegistry};
