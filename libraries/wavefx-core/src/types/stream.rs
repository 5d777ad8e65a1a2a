//! Playback contract
//!
//! Once an effect chain has finished, a streaming sink pulls the buffer out in
//! fixed-size interleaved `f32` chunks. `BufferSource` holds a shared borrow of
//! the buffer, so nothing can mutate it while it is being streamed.

use super::audio::AudioFormat;
use super::buffer::SampleBuffer;
use crate::error::{CoreError, Result};
use crate::traits::AudioSource;
use std::time::Duration;

/// Smallest transfer buffer handed to a sink, in bytes
const MIN_CHUNK_BYTES: usize = 0x4000;
/// Largest transfer buffer handed to a sink, in bytes
const MAX_CHUNK_BYTES: usize = 0x50000;

/// Byte layout a streaming sink needs to size its transfer buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamLayout {
    /// Bytes in one interleaved frame of `f32` samples
    pub bytes_per_frame: usize,
    /// Frames delivered per chunk
    pub frames_per_chunk: usize,
    /// Bytes per chunk (`frames_per_chunk * bytes_per_frame`)
    pub chunk_bytes: usize,
}

impl StreamLayout {
    /// Bytes per interleaved `f32` frame for a format
    pub fn bytes_per_frame(format: &AudioFormat) -> usize {
        usize::from(format.channels) * std::mem::size_of::<f32>()
    }

    /// Size chunks to hold roughly `seconds_per_chunk` of audio
    ///
    /// The byte size is clamped to [16 KiB, 320 KiB] and never drops below one frame.
    pub fn for_duration(format: &AudioFormat, seconds_per_chunk: f32) -> Self {
        let bytes_per_frame = Self::bytes_per_frame(format).max(1);
        let seconds = f64::from(seconds_per_chunk.max(0.0));
        let frames_for_time = (f64::from(format.sample_rate.as_hz()) * seconds) as usize;
        let requested = frames_for_time.saturating_mul(bytes_per_frame);

        let chunk_bytes = if requested > MAX_CHUNK_BYTES && requested > bytes_per_frame {
            MAX_CHUNK_BYTES
        } else {
            requested.max(MIN_CHUNK_BYTES)
        }
        .max(bytes_per_frame);

        let frames_per_chunk = chunk_bytes / bytes_per_frame;
        Self {
            bytes_per_frame,
            frames_per_chunk,
            chunk_bytes: frames_per_chunk * bytes_per_frame,
        }
    }

    /// Samples (not frames) per chunk
    pub fn samples_per_chunk(&self) -> usize {
        self.chunk_bytes / std::mem::size_of::<f32>()
    }
}

/// Streams a finished `SampleBuffer` as interleaved frames
#[derive(Debug)]
pub struct BufferSource<'a> {
    buffer: &'a SampleBuffer,
    position: usize,
}

impl<'a> BufferSource<'a> {
    /// Start streaming `buffer` from the first frame
    pub fn new(buffer: &'a SampleBuffer) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Buffer being streamed
    pub fn buffer(&self) -> &SampleBuffer {
        self.buffer
    }

    /// Next frame to be delivered
    pub fn position_frames(&self) -> usize {
        self.position
    }

    /// Frames not yet delivered
    pub fn remaining_frames(&self) -> usize {
        self.buffer.frame_count() - self.position
    }

    fn frames_to_duration(&self, frames: usize) -> Duration {
        Duration::from_secs_f64(frames as f64 / f64::from(self.buffer.sample_rate()))
    }
}

impl AudioSource for BufferSource<'_> {
    /// Fill `out` with interleaved frames, zero-padding past the end
    ///
    /// Returns the number of real samples written; 0 once the buffer is exhausted.
    fn read_samples(&mut self, out: &mut [f32]) -> Result<usize> {
        let channel_count = usize::from(self.buffer.channel_count());
        let frames = (out.len() / channel_count).min(self.remaining_frames());

        for (offset, frame) in out.chunks_exact_mut(channel_count).take(frames).enumerate() {
            let index = self.position + offset;
            for (slot, channel) in frame.iter_mut().zip(self.buffer.channels()) {
                *slot = channel[index];
            }
        }

        let written = frames * channel_count;
        out[written..].fill(0.0);
        self.position += frames;

        Ok(written)
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let frame =
            (position.as_secs_f64() * f64::from(self.buffer.sample_rate())).round() as usize;
        if frame > self.buffer.frame_count() {
            return Err(CoreError::invalid_input(format!(
                "seek to {:?} is past the end ({:?})",
                position,
                self.duration()
            )));
        }
        self.position = frame;
        Ok(())
    }

    fn duration(&self) -> Duration {
        self.frames_to_duration(self.buffer.frame_count())
    }

    fn position(&self) -> Duration {
        self.frames_to_duration(self.position)
    }

    fn is_finished(&self) -> bool {
        self.position >= self.buffer.frame_count()
    }
}
