//! Frame source abstraction.
//!
//! Decoding images or reading devices happens outside this crate; a
//! [`FrameSource`] is the seam where decoded RGB frames enter. The
//! [`SyntheticSource`] produces a deterministic sequence for the CLI,
//! tests and benchmarks.

use super::{Frame, SequenceConfig};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use thiserror::Error;

/// Gray level of the synthetic background.
const BACKGROUND_RGB: [u8; 3] = [96, 96, 96];
/// Color of the synthetic moving square.
const OBJECT_RGB: [u8; 3] = [240, 240, 240];

/// Errors that can occur while producing frames.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The sequence configuration was rejected.
    #[error("failed to configure source: {0}")]
    ConfigFailed(String),
    /// The frame limit was reached.
    #[error("source exhausted after {0} frames")]
    Exhausted(u64),
    /// `next_frame` was called before `open`.
    #[error("source not opened")]
    NotOpened,
}

/// Trait for producers of decoded frames.
pub trait FrameSource {
    /// Prepares the source for the given sequence configuration.
    fn open(&mut self, config: &SequenceConfig) -> Result<(), SourceError>;

    /// Produces the next frame.
    fn next_frame(&mut self) -> Result<Frame, SourceError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Releases the source.
    fn close(&mut self);
}

/// Deterministic sequence of a bright square sliding over a gray
/// background, with optional seeded noise.
#[derive(Debug)]
pub struct SyntheticSource {
    config: Option<SequenceConfig>,
    rng: ChaCha8Rng,
    sequence: u64,
    limit: Option<u64>,
}

impl SyntheticSource {
    /// Creates a closed source; call [`FrameSource::open`] before reading.
    pub fn new() -> Self {
        Self {
            config: None,
            rng: ChaCha8Rng::seed_from_u64(0),
            sequence: 0,
            limit: None,
        }
    }

    /// Creates a source that fails with [`SourceError::Exhausted`] after
    /// `limit` frames.
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Left edge of the square for frame `sequence`.
    fn object_x(config: &SequenceConfig, sequence: u64) -> u32 {
        let travel = (config.width - config.object_size) as u64 + 1;
        ((sequence * config.object_speed as u64) % travel) as u32
    }

    fn render(&mut self, config: &SequenceConfig) -> Vec<u8> {
        let (w, h, size) = (config.width, config.height, config.object_size);
        let x0 = Self::object_x(config, self.sequence);
        let y0 = (h - size) / 2;
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize) * 3);

        for y in 0..h {
            for x in 0..w {
                let inside = size > 0 && (x0..x0 + size).contains(&x) && (y0..y0 + size).contains(&y);
                let base = if inside { OBJECT_RGB } else { BACKGROUND_RGB };
                for channel in base {
                    pixels.push(self.jitter(channel, config.noise));
                }
            }
        }

        pixels
    }

    fn jitter(&mut self, value: u8, amplitude: u8) -> u8 {
        if amplitude == 0 {
            return value;
        }
        let span = 2 * amplitude as u32 + 1;
        let offset = (self.rng.next_u32() % span) as i16 - amplitude as i16;
        (value as i16 + offset).clamp(0, 255) as u8
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for SyntheticSource {
    fn open(&mut self, config: &SequenceConfig) -> Result<(), SourceError> {
        config
            .validate()
            .map_err(|e| SourceError::ConfigFailed(e.to_string()))?;
        self.rng = ChaCha8Rng::seed_from_u64(config.seed);
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!(
            width = config.width,
            height = config.height,
            seed = config.seed,
            "Synthetic source opened"
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        let config = self.config.clone().ok_or(SourceError::NotOpened)?;
        if self.limit.is_some_and(|limit| self.sequence >= limit) {
            return Err(SourceError::Exhausted(self.sequence));
        }

        let pixels = self.render(&config);
        let frame = Frame::new(pixels, config.width, config.height, self.sequence);
        self.sequence += 1;
        Ok(frame)
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("Synthetic source closed");
    }
}
