//! Multichannel sample storage
//!
//! A `SampleBuffer` owns one `Vec<f32>` per channel, all of the same length.
//! Samples are normalized floats, nominally in [-1.0, 1.0]; effects may push
//! them outside that range until the buffer is normalized or re-quantized.

use super::audio::AudioFormat;
use crate::error::{CoreError, Result};
use std::fmt;
use tracing::debug;

/// Decoded multichannel audio plus the format it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    format: AudioFormat,
    channels: Vec<Vec<f32>>,
    frame_count: usize,
}

impl SampleBuffer {
    /// Create a buffer from per-channel sample sequences
    ///
    /// # Errors
    /// Returns `CoreError::InvalidBuffer` if the channel count is zero or does not
    /// match `format.channels`, the sample rate is zero, the bit depth is not
    /// 8, 16 or 24, or the channels have different lengths.
    pub fn new(format: AudioFormat, channels: Vec<Vec<f32>>) -> Result<Self> {
        Self::validate_format(&format)?;

        if channels.len() != usize::from(format.channels) {
            return Err(CoreError::invalid_buffer(format!(
                "format declares {} channels but {} were supplied",
                format.channels,
                channels.len()
            )));
        }

        let frame_count = channels.first().map_or(0, Vec::len);
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != frame_count)
        {
            return Err(CoreError::invalid_buffer(format!(
                "channel {} has {} frames, expected {}",
                index,
                channel.len(),
                frame_count
            )));
        }

        Ok(Self {
            format,
            channels,
            frame_count,
        })
    }

    /// Create a zero-filled buffer with `frame_count` frames per channel
    ///
    /// # Errors
    /// Same format checks as [`SampleBuffer::new`].
    pub fn silent(format: AudioFormat, frame_count: usize) -> Result<Self> {
        Self::validate_format(&format)?;
        Ok(Self {
            format,
            channels: vec![vec![0.0; frame_count]; usize::from(format.channels)],
            frame_count,
        })
    }

    /// Create a buffer from frame-major interleaved samples (L, R, L, R, ...)
    ///
    /// # Errors
    /// Returns `CoreError::InvalidBuffer` if the format is invalid or the sample
    /// count is not a multiple of the channel count.
    pub fn from_interleaved(format: AudioFormat, samples: &[f32]) -> Result<Self> {
        Self::validate_format(&format)?;

        let channel_count = usize::from(format.channels);
        if samples.len() % channel_count != 0 {
            return Err(CoreError::invalid_buffer(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                channel_count
            )));
        }

        let frame_count = samples.len() / channel_count;
        let mut channels: Vec<Vec<f32>> = (0..channel_count)
            .map(|_| Vec::with_capacity(frame_count))
            .collect();
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Ok(Self {
            format,
            channels,
            frame_count,
        })
    }

    fn validate_format(format: &AudioFormat) -> Result<()> {
        if format.channels == 0 {
            return Err(CoreError::invalid_buffer("channel count must be at least 1"));
        }
        if format.sample_rate.as_hz() == 0 {
            return Err(CoreError::invalid_buffer("sample rate must be positive"));
        }
        if !format.is_supported_bit_depth() {
            return Err(CoreError::invalid_buffer(format!(
                "unsupported bits per sample: {}",
                format.bits_per_sample
            )));
        }
        Ok(())
    }

    /// Format information
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Number of channels
    pub fn channel_count(&self) -> u16 {
        self.format.channels
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate.as_hz()
    }

    /// Source bit depth (the resolution encode re-quantizes to)
    pub fn bits_per_sample(&self) -> u16 {
        self.format.bits_per_sample
    }

    /// Retarget the bit depth used when this buffer is encoded
    ///
    /// # Errors
    /// Returns `CoreError::InvalidBuffer` for depths other than 8, 16 or 24.
    pub fn set_bits_per_sample(&mut self, bits_per_sample: u16) -> Result<()> {
        let format = AudioFormat {
            bits_per_sample,
            ..self.format
        };
        Self::validate_format(&format)?;
        self.format = format;
        Ok(())
    }

    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Check if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Samples of one channel, or `None` if the channel does not exist
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Mutable samples of one channel
    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }

    /// Iterate over channels in order
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Iterate mutably over channels in order
    ///
    /// Only slices are handed out, so callers can rewrite samples but never
    /// change a channel's length.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    /// Interleave all channels into frame-major order
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut samples = Vec::with_capacity(self.frame_count * self.channels.len());
        for frame in 0..self.frame_count {
            samples.extend(self.channels.iter().map(|channel| channel[frame]));
        }
        samples
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / f64::from(self.sample_rate())
    }

    /// Human-readable runtime rounded to whole seconds, e.g. `2m 6s`
    pub fn runtime(&self) -> String {
        format_runtime(self.frame_count as u64, self.sample_rate())
    }

    /// Largest absolute sample value across all channels
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |peak, sample| peak.max(sample.abs()))
    }

    /// Scale all samples so the loudest one peaks at exactly +-1.0
    ///
    /// A silent buffer is left unchanged.
    pub fn normalize(&mut self) {
        let peak = self.peak();
        debug!("Max sample = {}, normalizing", peak);

        if peak == 0.0 || !peak.is_finite() {
            return;
        }

        let gain = 1.0 / peak;
        for sample in self.channels.iter_mut().flatten() {
            *sample *= gain;
        }
    }
}

impl fmt::Display for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ch, {} Hz, {}-bit, {} frames ({})",
            self.channel_count(),
            self.sample_rate(),
            self.bits_per_sample(),
            self.frame_count,
            self.runtime()
        )
    }
}

/// Format a frame count as `"{minutes}m {seconds}s"`, rounding to whole seconds
pub(crate) fn format_runtime(frames: u64, sample_rate: u32) -> String {
    if sample_rate == 0 {
        return "0m 0s".to_string();
    }
    let total_seconds = (frames as f64 / f64::from(sample_rate)).round() as u64;
    format!("{}m {}s", total_seconds / 60, total_seconds % 60)
}
