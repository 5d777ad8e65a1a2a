//! Domain types: sample storage, WAVE container metadata, and the streaming layout
mod audio;
mod buffer;
mod stream;
mod wav;

pub use audio::{AudioFormat, SampleRate, SUPPORTED_BITS_PER_SAMPLE};
pub use buffer::SampleBuffer;
pub use stream::{BufferSource, StreamLayout};
pub use wav::{ExtensibleFormat, FormatTag, WavHeader, KSDATAFORMAT_SUBTYPE_PCM};
