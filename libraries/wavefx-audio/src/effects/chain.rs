/// Effect chain for processing audio
///
/// The chain owns its effects in order; the successor of each node is simply
/// the next index. Applying the chain runs the first node and hands the
/// mutated buffer to its successor until the last node has run.
use std::fmt;
use wavefx_core::SampleBuffer;

/// Trait for audio effects that can be chained together
///
/// Effects run on the calling thread over a fully decoded buffer. They may
/// rewrite sample values but must not change the channel count, sample rate
/// or frame count.
pub trait AudioEffect: Send {
    /// Transform the buffer in place
    fn process(&mut self, buffer: &mut SampleBuffer);

    /// Run this node and return the same buffer
    ///
    /// Disabled effects leave the buffer untouched.
    fn apply<'a>(&mut self, buffer: &'a mut SampleBuffer) -> &'a mut SampleBuffer {
        if self.is_enabled() {
            self.process(buffer);
        }
        buffer
    }

    /// Reset effect state
    fn reset(&mut self);

    /// Enable/disable the effect
    fn set_enabled(&mut self, enabled: bool);

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Get effect name (for debugging)
    fn name(&self) -> &str;
}

/// Chain of audio effects processed in order
pub struct EffectChain {
    effects: Vec<Box<dyn AudioEffect>>,
    enabled: bool,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
            enabled: true,
        }
    }

    /// Add an effect to the end of the chain
    ///
    /// The previous tail's successor becomes the new effect.
    pub fn add_effect(&mut self, effect: Box<dyn AudioEffect>) {
        self.effects.push(effect);
    }

    /// Index of the node that runs after `index`, if any
    pub fn successor(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.effects.len()).then_some(next)
    }

    /// Process the buffer through the entire chain, head first
    ///
    /// Each node transforms the buffer and delegates to its successor with the
    /// mutated buffer. An empty or disabled chain returns the buffer unchanged.
    pub fn apply<'a>(&mut self, buffer: &'a mut SampleBuffer) -> &'a mut SampleBuffer {
        if !self.enabled {
            return buffer;
        }

        let mut buffer = buffer;
        let mut node = (!self.effects.is_empty()).then_some(0);

        while let Some(index) = node {
            tracing::trace!("Applying effect {} ({})", index, self.effects[index].name());
            buffer = self.effects[index].apply(buffer);
            node = self.successor(index);
        }

        buffer
    }

    /// Reset all effects in the chain
    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }

    /// Clear all effects from the chain
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Get number of effects in chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Get effect at index
    pub fn get_effect(&self, index: usize) -> Option<&dyn AudioEffect> {
        self.effects.get(index).map(|e| e.as_ref())
    }

    /// Get mutable effect at index
    pub fn get_effect_mut(&mut self, index: usize) -> Option<&mut (dyn AudioEffect + 'static)> {
        self.effects.get_mut(index).map(|e| e.as_mut())
    }

    /// Enable/disable every effect in the chain
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for effect in &mut self.effects {
            effect.set_enabled(enabled);
        }
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.effects.iter().map(|effect| effect.name()).collect();
        f.debug_struct("EffectChain")
            .field("effects", &names)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl AudioEffect for EffectChain {
    fn process(&mut self, buffer: &mut SampleBuffer) {
        EffectChain::apply(self, buffer);
    }

    fn reset(&mut self) {
        EffectChain::reset(self);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Effect Chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use wavefx_core::{AudioFormat, SampleRate};

    // Mock effect for testing
    struct GainEffect {
        gain: f32,
        enabled: bool,
    }

    impl AudioEffect for GainEffect {
        fn process(&mut self, buffer: &mut SampleBuffer) {
            for channel in buffer.channels_mut() {
                for sample in channel.iter_mut() {
                    *sample *= self.gain;
                }
            }
        }

        fn reset(&mut self) {
            // Nothing to reset for gain
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn name(&self) -> &str {
            "Gain"
        }
    }

    // Adds a constant, so ordering against a gain is observable
    struct OffsetEffect {
        offset: f32,
    }

    impl AudioEffect for OffsetEffect {
        fn process(&mut self, buffer: &mut SampleBuffer) {
            for channel in buffer.channels_mut() {
                for sample in channel.iter_mut() {
                    *sample += self.offset;
                }
            }
        }

        fn reset(&mut self) {}

        fn set_enabled(&mut self, _enabled: bool) {}

        fn is_enabled(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "Offset"
        }
    }

    // Records how often reset was called
    struct ResetCounter(Arc<AtomicUsize>);

    impl AudioEffect for ResetCounter {
        fn process(&mut self, _buffer: &mut SampleBuffer) {}

        fn reset(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn set_enabled(&mut self, _enabled: bool) {}

        fn is_enabled(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "ResetCounter"
        }
    }

    fn gain(gain: f32) -> Box<dyn AudioEffect> {
        Box::new(GainEffect {
            gain,
            enabled: true,
        })
    }

    fn ones(frames: usize) -> SampleBuffer {
        let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 16);
        SampleBuffer::new(format, vec![vec![1.0; frames], vec![1.0; frames]]).unwrap()
    }

    #[test]
    fn empty_chain() {
        let mut chain = EffectChain::new();
        assert_eq!(chain.len(), 0);
        assert!(chain.is_empty());

        let mut buffer = ones(10);
        let expected = buffer.clone();
        assert_eq!(*chain.apply(&mut buffer), expected);
    }

    #[test]
    fn add_effects() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.5));
        chain.add_effect(gain(2.0));

        assert_eq!(chain.len(), 2);
        assert!(!chain.is_empty());
        assert_eq!(chain.successor(0), Some(1));
        assert_eq!(chain.successor(1), None);
    }

    #[test]
    fn process_chain() {
        let mut chain = EffectChain::new();

        // Add gain of 0.5, then gain of 2.0
        // Result: 0.5 * 2.0 = 1.0 (no change)
        chain.add_effect(gain(0.5));
        chain.add_effect(gain(2.0));

        let mut buffer = ones(50);
        chain.apply(&mut buffer);

        for channel in buffer.channels() {
            for sample in channel {
                assert!((sample - 1.0).abs() < 0.0001);
            }
        }
    }

    #[test]
    fn order_matters_for_non_commutative_effects() {
        let mut gain_then_offset = EffectChain::new();
        gain_then_offset.add_effect(gain(2.0));
        gain_then_offset.add_effect(Box::new(OffsetEffect { offset: 1.0 }));

        let mut offset_then_gain = EffectChain::new();
        offset_then_gain.add_effect(Box::new(OffsetEffect { offset: 1.0 }));
        offset_then_gain.add_effect(gain(2.0));

        let mut a = ones(4);
        let mut b = ones(4);
        gain_then_offset.apply(&mut a);
        offset_then_gain.apply(&mut b);

        assert_eq!(a.channel(0).unwrap()[0], 3.0);
        assert_eq!(b.channel(0).unwrap()[0], 4.0);
    }

    #[test]
    fn chain_equals_manual_sequence() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.25));
        chain.add_effect(Box::new(OffsetEffect { offset: -0.5 }));
        chain.add_effect(gain(3.0));

        let mut chained = ones(8);
        chain.apply(&mut chained);

        let mut manual = ones(8);
        gain(0.25).apply(&mut manual);
        OffsetEffect { offset: -0.5 }.apply(&mut manual);
        gain(3.0).apply(&mut manual);

        assert_eq!(chained, manual);
    }

    #[test]
    fn apply_preserves_shape() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.3));

        let mut buffer = ones(17);
        let format = buffer.format();
        chain.apply(&mut buffer);

        assert_eq!(buffer.frame_count(), 17);
        assert_eq!(buffer.format(), format);
    }

    #[test]
    fn disabled_effect_bypassed() {
        let mut chain = EffectChain::new();

        chain.add_effect(Box::new(GainEffect {
            gain: 0.0,      // Would zero the signal
            enabled: false, // But it's disabled
        }));
        chain.add_effect(gain(2.0));

        let mut buffer = ones(10);
        chain.apply(&mut buffer);

        // Disabled node still hands the buffer on to its successor
        for channel in buffer.channels() {
            assert!(channel.iter().all(|s| (s - 2.0).abs() < 0.0001));
        }
    }

    #[test]
    fn reset_chain() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut chain = EffectChain::new();
        chain.add_effect(Box::new(ResetCounter(counter.clone())));
        chain.add_effect(Box::new(ResetCounter(counter.clone())));

        chain.reset();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clear_chain() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.5));

        assert_eq!(chain.len(), 1);

        chain.clear();
        assert_eq!(chain.len(), 0);
        assert!(chain.is_empty());
    }

    #[test]
    fn get_effect() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.5));

        let effect = chain.get_effect(0).unwrap();
        assert_eq!(effect.name(), "Gain");
        assert!(chain.get_effect(1).is_none());

        chain.get_effect_mut(0).unwrap().set_enabled(false);
        assert!(!chain.get_effect(0).unwrap().is_enabled());
    }

    #[test]
    fn enable_disable_all() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.5));
        chain.add_effect(gain(0.5));

        chain.set_all_enabled(false);

        let mut buffer = ones(10);
        chain.apply(&mut buffer);

        // Should be unchanged (all effects disabled)
        for channel in buffer.channels() {
            assert!(channel.iter().all(|s| (s - 1.0).abs() < 0.0001));
        }
    }

    #[test]
    fn chains_nest() {
        let mut inner = EffectChain::new();
        inner.add_effect(gain(2.0));
        inner.add_effect(gain(2.0));

        let mut outer = EffectChain::new();
        outer.add_effect(Box::new(inner));
        outer.add_effect(gain(0.5));

        let mut buffer = ones(4);
        outer.apply(&mut buffer);
        assert_eq!(buffer.channel(1).unwrap()[3], 2.0);

        outer.get_effect_mut(0).unwrap().set_enabled(false);
        let mut buffer = ones(4);
        outer.apply(&mut buffer);
        assert_eq!(buffer.channel(1).unwrap()[3], 0.5);
    }

    #[test]
    fn disabled_chain_is_bypassed() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.5));
        chain.set_enabled(false);

        let mut buffer = ones(4);
        chain.apply(&mut buffer);
        assert_eq!(buffer.channel(0).unwrap(), &[1.0; 4][..]);
        assert!(chain.get_effect(0).unwrap().is_enabled());
    }

    #[test]
    fn debug_lists_effect_names() {
        let mut chain = EffectChain::new();
        chain.add_effect(gain(0.5));
        chain.add_effect(Box::new(OffsetEffect { offset: 1.0 }));

        let debug = format!("{:?}", chain);
        assert_eq!(debug, r#"EffectChain { effects: ["Gain", "Offset"], enabled: true }"#);
    }
}
