/// Core traits for wavefx
use crate::error::Result;
use crate::types::{SampleBuffer, WavHeader};
use std::path::Path;
use std::time::Duration;

/// Audio decoder trait
///
/// Implementers decode a whole file into a `SampleBuffer`.
pub trait AudioDecoder: Send {
    /// Decode an audio file from the given path (loads entire file)
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded
    fn decode(&mut self, path: &Path) -> Result<SampleBuffer>;

    /// Read only the container header
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its header is invalid
    fn probe(&mut self, path: &Path) -> Result<WavHeader>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}

/// Audio encoder trait
///
/// Implementers write a `SampleBuffer` back to a file at its stored bit depth.
pub trait AudioEncoder: Send {
    /// Encode `buffer` to the given path, replacing any existing file
    ///
    /// # Errors
    /// Returns an error if the destination cannot be created or written
    fn encode(&mut self, buffer: &SampleBuffer, path: &Path) -> Result<()>;
}

/// Pull-based audio source consumed by a streaming sink
///
/// Implementors hand out interleaved `f32` samples in chunks the sink sizes
/// itself (see `StreamLayout`).
pub trait AudioSource {
    /// Read next chunk of audio samples
    ///
    /// Returns number of samples read (can be less than buffer length at end of track).
    ///
    /// # Arguments
    /// * `buffer` - Output buffer for interleaved samples
    ///
    /// # Returns
    /// * `Ok(n)` - Number of samples read (0 = end of track)
    /// * `Err(_)` - Read error
    fn read_samples(&mut self, buffer: &mut [f32]) -> Result<usize>;

    /// Seek to position in track
    ///
    /// # Errors
    /// Returns an error if the position is past the end
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Get total track duration
    fn duration(&self) -> Duration;

    /// Get current playback position
    fn position(&self) -> Duration;

    /// Check if track has ended
    fn is_finished(&self) -> bool;

    /// Reset to beginning of track
    ///
    /// Equivalent to `seek(Duration::ZERO)`
    fn reset(&mut self) -> Result<()> {
        self.seek(Duration::ZERO)
    }
}
