//! PCM sample normalization and re-quantization
//!
//! Decode maps integer samples onto normalized floats; encode is the inverse,
//! rounding to nearest and clamping so effect overshoot saturates instead of
//! wrapping around.

use crate::error::{AudioError, Result};

const U8_SCALE: f64 = 255.0;
const I16_SCALE: f64 = 32_767.0;
const I24_SCALE: f64 = 8_388_607.0;
const I24_MIN: f64 = -8_388_608.0;

/// Integer PCM encodings the codec handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmDepth {
    /// Unsigned 8-bit, 128 is silence
    U8,
    /// Signed 16-bit little-endian
    S16,
    /// Signed 24-bit little-endian, three bytes per sample
    S24,
}

impl PcmDepth {
    /// Depth for a `bits_per_sample` value
    ///
    /// # Errors
    /// Returns `AudioError::UnsupportedFormat` for anything but 8, 16 or 24 bits.
    pub fn from_bits(bits_per_sample: u16) -> Result<Self> {
        match bits_per_sample {
            8 => Ok(Self::U8),
            16 => Ok(Self::S16),
            24 => Ok(Self::S24),
            other => Err(AudioError::unsupported(format!(
                "{}-bit PCM (supported: 8, 16, 24)",
                other
            ))),
        }
    }

    /// Bytes per encoded sample
    pub fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::S16 => 2,
            Self::S24 => 3,
        }
    }

    /// Size of one quantization step in normalized units
    pub fn step(self) -> f32 {
        match self {
            Self::U8 => (2.0 / U8_SCALE) as f32,
            Self::S16 => (1.0 / I16_SCALE) as f32,
            Self::S24 => (1.0 / I24_SCALE) as f32,
        }
    }

    /// Decode one sample from exactly `self.bytes()` little-endian bytes
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> f32 {
        match self {
            Self::U8 => (f64::from(bytes[0]) / U8_SCALE * 2.0 - 1.0) as f32,
            Self::S16 => {
                (f64::from(i16::from_le_bytes([bytes[0], bytes[1]])) / I16_SCALE) as f32
            }
            Self::S24 => {
                // Sign-extend from the top bit of the third byte
                let sign = if bytes[2] & 0x80 != 0 { 0xff } else { 0x00 };
                let value = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], sign]);
                (f64::from(value) / I24_SCALE) as f32
            }
        }
    }

    /// Encode one sample into `out`, which must hold `self.bytes()` bytes
    ///
    /// Non-finite samples are written as silence.
    #[inline]
    pub fn encode(self, sample: f32, out: &mut [u8]) {
        let sample = if sample.is_finite() {
            f64::from(sample)
        } else {
            0.0
        };

        match self {
            Self::U8 => {
                out[0] = ((sample + 1.0) / 2.0 * U8_SCALE).round().clamp(0.0, U8_SCALE) as u8;
            }
            Self::S16 => {
                let value = (sample * I16_SCALE)
                    .round()
                    .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16;
                out[..2].copy_from_slice(&value.to_le_bytes());
            }
            Self::S24 => {
                let value = (sample * I24_SCALE).round().clamp(I24_MIN, I24_SCALE) as i32;
                out[..3].copy_from_slice(&value.to_le_bytes()[..3]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(depth: PcmDepth, sample: f32) -> Vec<u8> {
        let mut out = vec![0u8; depth.bytes()];
        depth.encode(sample, &mut out);
        out
    }

    #[test]
    fn rejects_other_bit_depths() {
        for bits in [0, 4, 12, 20, 32, 64] {
            assert!(matches!(
                PcmDepth::from_bits(bits),
                Err(AudioError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn decode_8_bit_range() {
        assert_eq!(PcmDepth::U8.decode(&[0]), -1.0);
        assert_eq!(PcmDepth::U8.decode(&[255]), 1.0);
        assert!(PcmDepth::U8.decode(&[128]).abs() < 0.004);
    }

    #[test]
    fn decode_16_bit() {
        assert_eq!(PcmDepth::S16.decode(&0i16.to_le_bytes()), 0.0);
        assert!((PcmDepth::S16.decode(&16_384i16.to_le_bytes()) - 0.5).abs() < 1e-4);
        assert!((PcmDepth::S16.decode(&(-16_384i16).to_le_bytes()) + 0.5).abs() < 1e-4);
        assert_eq!(PcmDepth::S16.decode(&32_767i16.to_le_bytes()), 1.0);
    }

    #[test]
    fn decode_24_bit_sign_extension() {
        assert_eq!(PcmDepth::S24.decode(&[0xff, 0xff, 0x7f]), 1.0);
        assert_eq!(PcmDepth::S24.decode(&[0x01, 0x00, 0x80]), -1.0);
        // -1 as 24-bit two's complement
        let minus_one = PcmDepth::S24.decode(&[0xff, 0xff, 0xff]);
        assert!((minus_one + 1.0 / 8_388_607.0).abs() < 1e-12);
    }

    #[test]
    fn encode_clamps_instead_of_wrapping() {
        assert_eq!(encoded(PcmDepth::U8, 2.0), vec![255]);
        assert_eq!(encoded(PcmDepth::U8, -3.0), vec![0]);
        assert_eq!(encoded(PcmDepth::S16, 1.5), 32_767i16.to_le_bytes().to_vec());
        assert_eq!(encoded(PcmDepth::S16, -1.5), i16::MIN.to_le_bytes().to_vec());
        assert_eq!(encoded(PcmDepth::S24, 4.0), vec![0xff, 0xff, 0x7f]);
        assert_eq!(encoded(PcmDepth::S24, -4.0), vec![0x00, 0x00, 0x80]);
    }

    #[test]
    fn encode_rounds_to_nearest() {
        // 0.5 * 32767 = 16383.5 rounds away from zero
        assert_eq!(encoded(PcmDepth::S16, 0.5), 16_384i16.to_le_bytes().to_vec());
        assert_eq!(encoded(PcmDepth::U8, 0.0), vec![128]);
    }

    #[test]
    fn non_finite_encodes_as_silence() {
        assert_eq!(encoded(PcmDepth::S16, f32::NAN), vec![0, 0]);
        assert_eq!(encoded(PcmDepth::S24, f32::INFINITY), vec![0, 0, 0]);
        assert_eq!(encoded(PcmDepth::U8, f32::NEG_INFINITY), vec![128]);
    }

    #[test]
    fn every_16_bit_code_survives() {
        for value in i16::MIN..=i16::MAX {
            let bytes = value.to_le_bytes();
            let sample = PcmDepth::S16.decode(&bytes);
            assert_eq!(encoded(PcmDepth::S16, sample), bytes.to_vec(), "code {}", value);
        }
    }

    #[test]
    fn every_8_bit_code_survives() {
        for value in 0..=u8::MAX {
            let sample = PcmDepth::U8.decode(&[value]);
            assert_eq!(encoded(PcmDepth::U8, sample), vec![value]);
        }
    }
}
