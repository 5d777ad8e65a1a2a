//! wavefx Core
//!
//! Platform-agnostic data model, traits, and error handling for wavefx.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `SampleBuffer`, `AudioFormat`, WAVE container metadata
//! - **Playback Contract**: `StreamLayout` and `BufferSource` for streaming sinks
//! - **Core Traits**: `AudioDecoder`, `AudioEncoder`, `AudioSource`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use wavefx_core::{AudioFormat, SampleBuffer, SampleRate};
//!
//! let format = AudioFormat::new(SampleRate::new(8_000), 1, 16);
//! let buffer = SampleBuffer::new(format, vec![vec![0.0, 0.5, -0.5, 1.0]]).unwrap();
//!
//! assert_eq!(buffer.frame_count(), 4);
//! assert_eq!(buffer.channel(0), Some(&[0.0, 0.5, -0.5, 1.0][..]));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::{AudioDecoder, AudioEncoder, AudioSource};

pub use types::{
    // Audio types
    AudioFormat, SampleBuffer, SampleRate, SUPPORTED_BITS_PER_SAMPLE,
    // Container metadata
    ExtensibleFormat, FormatTag, WavHeader, KSDATAFORMAT_SUBTYPE_PCM,
    // Playback contract
    BufferSource, StreamLayout,
};
