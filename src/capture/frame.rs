//! Frame type representing a decoded RGB image with metadata.

use crate::difference::CHANNELS;
use std::time::Instant;

/// A single decoded frame of an image sequence.
///
/// Pixels are interleaved 3-channel bytes in row-major order.
#[derive(Clone)]
pub struct Frame {
    /// Interleaved RGB bytes.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Time the frame was produced.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Creates a frame where every pixel has the same color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], sequence: u64) -> Self {
        let count = (width as usize) * (height as usize);
        Self::new(rgb.repeat(count), width, height, sequence)
    }

    /// Returns the interleaved RGB bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns mutable access to the RGB bytes of pixel `(x, y)`.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.pixels.get_mut(start..start + CHANNELS)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// When the frame was produced.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Position of the frame in its sequence.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the pixel buffer holds one RGB triple per pixel.
    pub fn is_valid(&self) -> bool {
        self.pixel_count() > 0 && self.pixels.len() == self.pixel_count() * CHANNELS
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}
