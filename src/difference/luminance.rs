//! Channel-average luminance reduction.

/// Number of interleaved channels per input pixel.
pub const CHANNELS: usize = 3;

/// Reduces three channel samples to one intensity.
///
/// Computes `floor((c0 + c1 + c2) / 3)`; the sum is widened so the result
/// always lies in `[0, 255]`.
#[inline]
pub fn luminance(c0: u8, c1: u8, c2: u8) -> u8 {
    ((c0 as u16 + c1 as u16 + c2 as u16) / 3) as u8
}

/// Reduces an interleaved RGB buffer into one intensity per pixel.
///
/// Writes `min(rgb.len() / 3, out.len())` values and ignores any trailing
/// partial pixel. Callers validate lengths beforehand.
pub fn reduce_frame(rgb: &[u8], out: &mut [u8]) {
    for (px, dst) in rgb.chunks_exact(CHANNELS).zip(out.iter_mut()) {
        *dst = luminance(px[0], px[1], px[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_is_identity() {
        for v in [0u8, 1, 127, 128, 254, 255] {
            assert_eq!(luminance(v, v, v), v);
        }
    }

    #[test]
    fn test_truncates() {
        // 1 + 1 + 0 = 2, 2 / 3 = 0
        assert_eq!(luminance(1, 1, 0), 0);
        // 255 + 255 + 0 = 510, 510 / 3 = 170
        assert_eq!(luminance(255, 255, 0), 170);
        assert_eq!(luminance(10, 20, 31), 20);
    }

    #[test]
    fn test_no_overflow_at_white() {
        assert_eq!(luminance(255, 255, 255), 255);
    }

    #[test]
    fn test_reduce_frame() {
        let rgb = [0, 0, 0, 255, 255, 255, 30, 60, 90];
        let mut out = [0u8; 3];
        reduce_frame(&rgb, &mut out);
        assert_eq!(out, [0, 255, 60]);
    }
}
