//! Per-pixel luminance history.
//!
//! Each pixel keeps its [`HISTORY_DEPTH`] most recent intensities in a
//! flat buffer with stride `HISTORY_DEPTH`, ordered oldest to newest.
//! Pixels are laid out contiguously so every pass over the model walks
//! memory sequentially.

use super::FrameDifferenceError;

/// Number of luminance samples retained per pixel.
pub const HISTORY_DEPTH: usize = 3;

/// Slot index of the oldest sample.
pub const OLDEST: usize = 0;
/// Slot index of the middle sample.
pub const MIDDLE: usize = 1;
/// Slot index of the newest sample.
pub const NEWEST: usize = HISTORY_DEPTH - 1;

/// Fixed-depth luminance history for every pixel of one image size.
#[derive(Clone)]
pub struct HistoryBuffer {
    samples: Vec<u8>,
}

impl HistoryBuffer {
    /// Allocates a history seeded with `values`: every slot of pixel `i`
    /// holds `values[i]`.
    pub(crate) fn seeded(values: &[u8]) -> Result<Self, FrameDifferenceError> {
        let pixels = values.len();
        let total = pixels
            .checked_mul(HISTORY_DEPTH)
            .ok_or(FrameDifferenceError::HistoryAllocation { pixels })?;

        let mut samples = Vec::new();
        samples
            .try_reserve_exact(total)
            .map_err(|_| FrameDifferenceError::HistoryAllocation { pixels })?;

        for &value in values {
            samples.extend_from_slice(&[value; HISTORY_DEPTH]);
        }

        Ok(Self { samples })
    }

    /// Drops the oldest sample of pixel `index` and appends `value` as the
    /// newest.
    #[inline]
    pub(crate) fn shift_append(&mut self, index: usize, value: u8) {
        let start = index * HISTORY_DEPTH;
        let slots = &mut self.samples[start..start + HISTORY_DEPTH];
        slots.copy_within(1.., 0);
        slots[NEWEST] = value;
    }

    /// Returns the samples of pixel `index`, oldest first.
    #[inline]
    pub fn slots(&self, index: usize) -> [u8; HISTORY_DEPTH] {
        let start = index * HISTORY_DEPTH;
        let mut out = [0u8; HISTORY_DEPTH];
        out.copy_from_slice(&self.samples[start..start + HISTORY_DEPTH]);
        out
    }

    /// Iterates over the sample windows of all pixels in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.samples.chunks_exact(HISTORY_DEPTH)
    }

    /// Returns the number of pixels tracked.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len() / HISTORY_DEPTH
    }

    /// Returns true if no pixels are tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl std::fmt::Debug for HistoryBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryBuffer")
            .field("pixels", &self.len())
            .field("depth", &HISTORY_DEPTH)
            .finish()
    }
}
