use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::matrix::GrayMatrix;

/// Which end of the gray ramp the paper occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Paper white, ink black: `pixel = 255 - 16 * nibble`.
    WhiteBackground,
    /// Paper black, ink white: `pixel = 16 * nibble`.
    BlackBackground,
}

/// Expands a packed-nibble pixel block into an 8-bit grayscale grid.
///
/// The mapping is exact and unclamped: white-background output spans
/// [15, 255] and black-background output spans [0, 240]. The unreachable
/// endpoints (0 and 255 respectively) are an artifact of the source
/// corpus and are reproduced as-is.
pub fn expand_nibbles(
    nibbles: &[u8],
    width: u32,
    height: u32,
    polarity: Polarity,
) -> Result<GrayMatrix> {
    let expected = width as usize * height as usize;
    if nibbles.len() != expected {
        return Err(Error::PixelCount {
            expected,
            actual: nibbles.len(),
            width,
            height,
        });
    }

    let data = nibbles
        .iter()
        .map(|&n| {
            debug_assert!(n <= 15, "nibble out of range: {}", n);
            match polarity {
                Polarity::WhiteBackground => 255 - 16 * n,
                Polarity::BlackBackground => 16 * n,
            }
        })
        .collect();

    Ok(GrayMatrix {
        rows: height as usize,
        cols: width as usize,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_background_mapping_is_exact() {
        let nibbles: Vec<u8> = (0..16).collect();
        let m = expand_nibbles(&nibbles, 16, 1, Polarity::WhiteBackground).unwrap();
        for n in 0..16u16 {
            assert_eq!(m.data[n as usize] as u16, 255 - 16 * n);
        }
        assert_eq!(m.data[0], 255);
        assert_eq!(m.data[15], 15);
    }

    #[test]
    fn black_background_mapping_is_exact() {
        let nibbles: Vec<u8> = (0..16).collect();
        let m = expand_nibbles(&nibbles, 1, 16, Polarity::BlackBackground).unwrap();
        for n in 0..16u16 {
            assert_eq!(m.data[n as usize] as u16, 16 * n);
        }
        assert_eq!(m.data[0], 0);
        assert_eq!(m.data[15], 240);
    }

    #[test]
    fn white_background_is_strictly_decreasing() {
        let nibbles: Vec<u8> = (0..16).collect();
        let m = expand_nibbles(&nibbles, 16, 1, Polarity::WhiteBackground).unwrap();
        for pair in m.data.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn black_background_is_strictly_increasing() {
        let nibbles: Vec<u8> = (0..16).collect();
        let m = expand_nibbles(&nibbles, 16, 1, Polarity::BlackBackground).unwrap();
        for pair in m.data.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn endpoints_are_never_corrected() {
        // 0 is unreachable under white background, 255 under black.
        let nibbles: Vec<u8> = (0..16).collect();
        let white = expand_nibbles(&nibbles, 4, 4, Polarity::WhiteBackground).unwrap();
        assert!(white.data.iter().all(|&p| p >= 15));
        let black = expand_nibbles(&nibbles, 4, 4, Polarity::BlackBackground).unwrap();
        assert!(black.data.iter().all(|&p| p <= 240));
    }

    #[test]
    fn length_mismatch_is_a_format_error() {
        let err = expand_nibbles(&[0u8; 10], 4, 4, Polarity::WhiteBackground).unwrap_err();
        assert!(matches!(err, Error::PixelCount { expected: 16, actual: 10, .. }));
        assert!(err.is_recoverable());
    }
}
