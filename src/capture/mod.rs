//! Frame input and sequence configuration.
//!
//! This module defines the decoded frame type handed to the difference
//! engine, the configuration of a run, and the source abstraction frames
//! arrive through.

mod config;
mod frame;
mod source;

pub use config::{ConfigError, FileConfig, OutputConfig, SequenceConfig};
pub use frame::Frame;
pub use source::{FrameSource, SourceError, SyntheticSource};
