//! RIFF/WAVE PCM codec
//!
//! Decodes 8, 16 and 24-bit integer PCM (plain or `WAVE_FORMAT_EXTENSIBLE`)
//! into a [`SampleBuffer`] and encodes it back at the buffer's bit depth.

mod chunk;
mod decoder;
mod encoder;
mod sample;

pub use chunk::ChunkId;
pub use decoder::{decode, decode_from, decode_with_header, probe, probe_from};
pub use encoder::{encode, encode_to};
pub use sample::PcmDepth;

use std::path::Path;
use wavefx_core::{AudioDecoder, AudioEncoder, SampleBuffer, WavHeader};

/// WAVE decoder/encoder behind the core codec traits
#[derive(Debug, Clone, Copy, Default)]
pub struct WavCodec;

impl WavCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for WavCodec {
    fn decode(&mut self, path: &Path) -> wavefx_core::Result<SampleBuffer> {
        Ok(decode(path)?)
    }

    fn probe(&mut self, path: &Path) -> wavefx_core::Result<WavHeader> {
        Ok(probe(path)?)
    }

    fn supports_format(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav") || ext.eq_ignore_ascii_case("wave"))
    }
}

impl AudioEncoder for WavCodec {
    fn encode(&mut self, buffer: &SampleBuffer, path: &Path) -> wavefx_core::Result<()> {
        Ok(encode(buffer, path)?)
    }
}
