//! Mask statistics and run reporting.
//!
//! These summarize what the difference engine produced; they never feed
//! back into the masks.

mod report;
mod statistics;

pub use report::{frames_per_second, RunReport};
pub use statistics::{count_changed, MaskStatistics};
