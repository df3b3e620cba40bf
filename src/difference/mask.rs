//! Product-of-differences change mask.
//!
//! For a pixel with history `oldest, middle, newest` the evidence of change
//! is `|newest - middle| * |middle - oldest|`. A single-frame spike moves
//! only one of the two factors, so the product stays small; a sustained
//! two-step change drives both up.

use super::history::{HistoryBuffer, MIDDLE, NEWEST, OLDEST};

/// Segmentation label for unchanged pixels.
pub const BACKGROUND_LABEL: u8 = 0;
/// Segmentation label for changed pixels.
pub const FOREGROUND_LABEL: u8 = 255;

/// Largest possible difference product, `255 * 255`.
pub const MAX_PRODUCT: u32 = 255 * 255;

/// Returns the change evidence of one history window.
#[inline]
pub fn difference_product(window: &[u8]) -> u32 {
    let a = window[NEWEST].abs_diff(window[MIDDLE]) as u32;
    let b = window[MIDDLE].abs_diff(window[OLDEST]) as u32;
    a * b
}

/// Clears weak-evidence pixels of a segmentation map.
#[derive(Debug, Clone, Copy)]
pub struct MaskGenerator {
    background: u8,
}

impl Default for MaskGenerator {
    fn default() -> Self {
        Self {
            background: BACKGROUND_LABEL,
        }
    }
}

impl MaskGenerator {
    /// Creates a generator writing `background` for unchanged pixels.
    pub fn with_background(background: u8) -> Self {
        Self { background }
    }

    /// Marks pixels background where the difference product falls below
    /// `threshold`. Pixels with a zero product are always cleared. All
    /// other entries of `segmentation` keep their prior value.
    ///
    /// Returns the number of pixels cleared.
    pub fn apply(&self, history: &HistoryBuffer, threshold: f64, segmentation: &mut [u8]) -> usize {
        let mut cleared = 0;

        for (window, label) in history.iter().zip(segmentation.iter_mut()) {
            let product = difference_product(window);
            if product == 0 || (product as f64) < threshold {
                *label = self.background;
                cleared += 1;
            }
        }

        cleared
    }
}
