/// Audio-related types
use serde::{Deserialize, Serialize};

/// Source bit depths a `SampleBuffer` can carry and the WAVE codec can quantize to
pub const SUPPORTED_BITS_PER_SAMPLE: [u16; 3] = [8, 16, 24];

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Telephone-band rate
    pub const NARROWBAND: Self = Self(8_000);
    /// CD quality
    pub const CD_QUALITY: Self = Self(44_100);
    /// DVD quality
    pub const DVD_QUALITY: Self = Self(48_000);
    /// High resolution
    pub const HIGH_RES_96: Self = Self(96_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Audio format information
///
/// `bits_per_sample` records the source resolution. Samples held in memory are
/// always normalized `f32`; the bit depth only matters when re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,

    /// Bits per sample of the source/target PCM encoding
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// Create CD quality stereo format (44.1kHz, 16-bit, stereo)
    pub fn cd_quality() -> Self {
        Self {
            sample_rate: SampleRate::CD_QUALITY,
            channels: 2,
            bits_per_sample: 16,
        }
    }

    /// Bytes occupied by one PCM sample (rounded up to whole bytes)
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }

    /// Bytes occupied by one interleaved PCM frame (the WAVE block alignment)
    pub fn block_align(&self) -> u32 {
        u32::from(self.channels) * u32::from(self.bytes_per_sample())
    }

    /// Calculate the byte rate (bytes per second)
    ///
    /// Returns `None` if the rate does not fit the 32-bit WAVE field.
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate.as_hz().checked_mul(self.block_align())
    }

    /// Check whether the bit depth is one the codec can quantize to
    pub fn is_supported_bit_depth(&self) -> bool {
        SUPPORTED_BITS_PER_SAMPLE.contains(&self.bits_per_sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_common_values() {
        assert_eq!(SampleRate::CD_QUALITY.as_hz(), 44_100);
        assert_eq!(SampleRate::DVD_QUALITY.as_hz(), 48_000);
        assert_eq!(SampleRate::NARROWBAND.as_hz(), 8_000);
    }

    #[test]
    fn audio_format_byte_rate() {
        let format = AudioFormat::cd_quality();
        // 44100 Hz * 2 channels * 16 bits / 8 = 176,400 bytes/sec
        assert_eq!(format.byte_rate(), Some(176_400));
        assert_eq!(format.block_align(), 4);
    }

    #[test]
    fn block_align_for_24_bit() {
        let format = AudioFormat::new(SampleRate::DVD_QUALITY, 6, 24);
        assert_eq!(format.bytes_per_sample(), 3);
        assert_eq!(format.block_align(), 18);
        assert_eq!(format.byte_rate(), Some(48_000 * 18));
    }

    #[test]
    fn byte_rate_overflow_is_none() {
        let format = AudioFormat::new(SampleRate::new(3_000_000_000), 2, 16);
        assert_eq!(format.block_align(), 4);
        assert_eq!(format.byte_rate(), None);
    }

    #[test]
    fn supported_bit_depths() {
        for bits in [8, 16, 24] {
            assert!(AudioFormat::new(SampleRate::CD_QUALITY, 2, bits).is_supported_bit_depth());
        }
        for bits in [0, 4, 12, 32, 64] {
            assert!(!AudioFormat::new(SampleRate::CD_QUALITY, 2, bits).is_supported_bit_depth());
        }
    }
}
