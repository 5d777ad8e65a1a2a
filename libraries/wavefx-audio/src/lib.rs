//! wavefx Audio
//!
//! RIFF/WAVE PCM codec and effect chain processing for wavefx.
//!
//! This crate provides:
//! - WAVE decoding/encoding for 8, 16 and 24-bit PCM, including
//!   `WAVE_FORMAT_EXTENSIBLE` files and unknown chunks
//! - An ordered effect chain over whole `SampleBuffer`s
//! - A one-pole low-pass filter with an optional triangle-LFO sweep
//! - TOML chain descriptions loaded through `config`
//!
//! # Example: Decode, Filter, Encode
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wavefx_audio::effects::{EffectChain, LowPassFilter, LowPassSettings};
//! use wavefx_audio::wav;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut buffer = wav::decode(Path::new("/audio/take.wav"))?;
//!
//! let mut chain = EffectChain::new();
//! chain.add_effect(Box::new(LowPassFilter::fixed(0.5)));
//! chain.add_effect(Box::new(LowPassFilter::with_settings(LowPassSettings::slow_sweep())));
//! chain.apply(&mut buffer);
//!
//! wav::encode(&buffer, Path::new("/audio/take-filtered.wav"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Using Effects
//!
//! ```rust
//! use wavefx_audio::effects::{AudioEffect, LowPassFilter};
//! use wavefx_core::{AudioFormat, SampleBuffer, SampleRate};
//!
//! let format = AudioFormat::new(SampleRate::new(8_000), 1, 16);
//! let mut buffer = SampleBuffer::new(format, vec![vec![0.0, 0.5, -0.5]]).unwrap();
//!
//! LowPassFilter::fixed(0.5).apply(&mut buffer);
//! assert_eq!(buffer.channel(0), Some(&[0.0, 0.25, -0.125][..]));
//! ```

pub mod effects;
mod error;
pub mod settings;
pub mod wav;

pub use error::{AudioError, Result};
pub use settings::{ChainSettings, EffectSettings};
pub use wav::WavCodec;
