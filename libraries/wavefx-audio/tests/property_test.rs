//! Property-based tests for the codec and effects
//!
//! These tests use proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use std::io::Cursor;
use wavefx_audio::effects::*;
use wavefx_audio::wav::{self, PcmDepth};
use wavefx_core::{AudioFormat, SampleBuffer, SampleRate};

// Helper: Check if buffer contains only finite values
fn all_finite(samples: &[f32]) -> bool {
    samples.iter().all(|s| s.is_finite())
}

// Helper: Calculate peak
fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

fn mono(samples: Vec<f32>) -> SampleBuffer {
    let format = AudioFormat::new(SampleRate::CD_QUALITY, 1, 16);
    SampleBuffer::new(format, vec![samples]).unwrap()
}

proptest! {
    /// Property: encode then decode stays within one quantization step
    #[test]
    fn codec_roundtrip_within_one_step(
        bits in prop::sample::select(vec![8u16, 16, 24]),
        channels in 1u16..=4,
        samples in prop::collection::vec(-1.0f32..=1.0, 0..256)
    ) {
        let frames = samples.len() / usize::from(channels);
        let samples = &samples[..frames * usize::from(channels)];
        let format = AudioFormat::new(SampleRate::new(8_000), channels, bits);
        let buffer = SampleBuffer::from_interleaved(format, samples).unwrap();

        let mut bytes = Vec::new();
        wav::encode_to(&buffer, &mut bytes).unwrap();
        let (header, decoded) = wav::decode_from(Cursor::new(bytes)).unwrap();

        prop_assert_eq!(header.frame_count(), frames as u64);
        prop_assert_eq!(decoded.format(), format);

        // 1/255, 1/32767 and 1/8388607 respectively
        let bound = match PcmDepth::from_bits(bits).unwrap() {
            PcmDepth::U8 => 1.0 / 255.0,
            PcmDepth::S16 => 1.0 / 32767.0,
            PcmDepth::S24 => 1.0 / 8_388_607.0,
        };
        for (a, b) in decoded.to_interleaved().iter().zip(samples) {
            prop_assert!((a - b).abs() <= bound, "{} vs {} (bound {})", a, b, bound);
        }
    }

    /// Property: out-of-range and non-finite samples never break encoding
    #[test]
    fn encode_clamps_any_input(
        samples in prop::collection::vec(prop::num::f32::ANY, 1..64)
    ) {
        let buffer = mono(samples);

        let mut bytes = Vec::new();
        wav::encode_to(&buffer, &mut bytes).unwrap();
        let (_, decoded) = wav::decode_from(Cursor::new(bytes)).unwrap();

        let out = decoded.channel(0).unwrap();
        prop_assert!(all_finite(out));
        prop_assert!(peak(out) <= 1.0001);
    }

    /// Property: the low-pass filter never produces NaN or Inf for valid input
    #[test]
    fn low_pass_never_produces_nan_or_inf(
        min in 0.0f32..=1.0,
        span in 0.0f32..=1.0,
        period in 0.0f32..5.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..1000)
    ) {
        let max = (min + span).min(1.0);
        let mut filter = LowPassFilter::with_settings(LowPassSettings::sweep(min, max, period));

        let mut buffer = mono(samples);
        filter.apply(&mut buffer);

        let out = buffer.channel(0).unwrap();
        prop_assert!(all_finite(out), "Low-pass produced NaN or Inf");
        prop_assert!(peak(out) <= 1.0 + 1e-6, "Low-pass exceeded the input range");
    }

    /// Property: disabled effects are a true bypass
    #[test]
    fn disabled_filter_is_true_bypass(
        coefficient in 0.0f32..=1.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..500)
    ) {
        let mut filter = LowPassFilter::fixed(coefficient);
        filter.set_enabled(false);

        let mut buffer = mono(samples.clone());
        filter.apply(&mut buffer);

        prop_assert_eq!(buffer.channel(0).unwrap(), samples.as_slice());
    }

    /// Property: the LFO stays within its range and repeats every full period
    #[test]
    fn lfo_is_bounded_and_periodic(
        min in 0.0f32..=1.0,
        span in 0.0f32..=1.0,
        period in 0.001f32..2.0,
        n in 0usize..200_000
    ) {
        let max = (min + span).min(1.0);
        let lfo = TriangleLfo::new(min, max, period, 44_100);
        let full_period = lfo.half_period() * 2;

        let value = lfo.value_at(n);
        prop_assert!(value >= min && value <= max, "{} outside [{}, {}]", value, min, max);
        prop_assert_eq!(value, lfo.value_at(n + full_period));
    }

    /// Property: a chain applies its effects in insertion order
    #[test]
    fn chain_matches_manual_sequence(
        first in 0.0f32..=1.0,
        second in 0.0f32..=1.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..500)
    ) {
        let mut chain = EffectChain::new();
        chain.add_effect(Box::new(LowPassFilter::fixed(first)));
        chain.add_effect(Box::new(LowPassFilter::with_settings(
            LowPassSettings::sweep(0.0, second, 0.01),
        )));

        let mut chained = mono(samples.clone());
        chain.apply(&mut chained);

        let mut manual = mono(samples);
        LowPassFilter::fixed(first).apply(&mut manual);
        LowPassFilter::with_settings(LowPassSettings::sweep(0.0, second, 0.01)).apply(&mut manual);

        prop_assert_eq!(chained, manual);
    }
}
