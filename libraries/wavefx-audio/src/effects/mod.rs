//! Audio effects processing
//!
//! This module provides a trait-based effect chain architecture. Every effect
//! rewrites a whole `SampleBuffer` in place; the buffer's shape never changes.
//!
//! Available effects:
//! - **LowPassFilter**: one-pole recursive low-pass with an optional
//!   triangle-LFO sweep of its coefficient

mod chain;
mod low_pass;

pub use chain::{AudioEffect, EffectChain};
pub use low_pass::{LowPassFilter, LowPassSettings, TriangleLfo};
