//! One-pole recursive low-pass filter
//!
//! `y[n] = (1 - a[n]) * x[n] + a[n] * y[n-1]`, with the first sample of every
//! channel passed through unfiltered. The coefficient `a[n]` is either fixed or
//! swept by a triangle LFO between `min_param` and `max_param`. Larger
//! coefficients mean heavier smoothing.

use super::chain::AudioEffect;
use serde::{Deserialize, Serialize};
use wavefx_core::SampleBuffer;

/// Low-pass filter settings
///
/// `min_param == max_param` (or `auto_period == 0`) gives a fixed coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowPassSettings {
    /// Coefficient at the bottom of the sweep (0.0 = no filtering)
    pub min_param: f32,
    /// Coefficient at the top of the sweep (must stay below or at 1.0)
    pub max_param: f32,
    /// Full LFO period in seconds (0.0 disables the sweep)
    pub auto_period: f32,
}

impl LowPassSettings {
    /// Fixed coefficient, no modulation
    pub fn fixed(coefficient: f32) -> Self {
        Self {
            min_param: coefficient,
            max_param: coefficient,
            auto_period: 0.0,
        }
    }

    /// Triangle sweep from `min_param` up to `max_param` and back every `auto_period` seconds
    pub fn sweep(min_param: f32, max_param: f32, auto_period: f32) -> Self {
        Self {
            min_param,
            max_param,
            auto_period,
        }
    }

    /// Heavy smoothing, the classic "muffled" setting
    pub fn muffled() -> Self {
        Self::fixed(0.95)
    }

    /// Slow wah-like sweep across the whole range
    pub fn slow_sweep() -> Self {
        Self::sweep(0.0, 0.95, 2.0)
    }

    /// Whether the coefficient actually moves
    pub fn is_modulated(&self) -> bool {
        self.min_param != self.max_param && self.auto_period > 0.0
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("min_param", self.min_param), ("max_param", self.max_param)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0.0, 1.0], got {}", name, value));
            }
        }
        if self.min_param > self.max_param {
            return Err(format!(
                "min_param ({}) must not exceed max_param ({})",
                self.min_param, self.max_param
            ));
        }
        if !self.auto_period.is_finite() || self.auto_period < 0.0 {
            return Err(format!(
                "auto_period must be a non-negative number of seconds, got {}",
                self.auto_period
            ));
        }
        Ok(())
    }

    /// Clamp every field into its valid range
    fn sanitized(self) -> Self {
        let clamp_coefficient = |value: f32| {
            if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        let min_param = clamp_coefficient(self.min_param);
        let max_param = clamp_coefficient(self.max_param).max(min_param);
        let auto_period = if self.auto_period.is_finite() {
            self.auto_period.max(0.0)
        } else {
            0.0
        };

        Self {
            min_param,
            max_param,
            auto_period,
        }
    }
}

impl Default for LowPassSettings {
    fn default() -> Self {
        Self::muffled()
    }
}

/// Triangle low-frequency oscillator over sample indices
///
/// Rises linearly from `min` at phase 0 to `max` at phase `H`, then falls back,
/// with period `2H` samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleLfo {
    min: f32,
    max: f32,
    half_period: usize,
}

impl TriangleLfo {
    /// LFO with a full period of `period_secs` at `sample_rate`
    pub fn new(min: f32, max: f32, period_secs: f32, sample_rate: u32) -> Self {
        let half_period = (f64::from(period_secs) * f64::from(sample_rate) / 2.0).round();
        // NaN and negative values saturate to 0
        let half_period = half_period as usize;

        Self {
            min,
            max,
            half_period,
        }
    }

    /// Half period `H` in samples
    pub fn half_period(&self) -> usize {
        self.half_period
    }

    /// Coefficient at sample index `n`
    ///
    /// A zero half period (degenerate period or sample rate) yields `min`.
    pub fn value_at(&self, n: usize) -> f32 {
        let half = self.half_period;
        if half == 0 {
            return self.min;
        }

        let phase = n % half.saturating_mul(2);
        let t = (half - phase.abs_diff(half)) as f64 / half as f64;
        (f64::from(self.min) * (1.0 - t) + f64::from(self.max) * t) as f32
    }
}

/// One-pole low-pass filter effect
///
/// The LFO phase restarts at sample 0 of every channel, so channels are
/// filtered independently and identically.
pub struct LowPassFilter {
    settings: LowPassSettings,
    enabled: bool,
}

impl LowPassFilter {
    /// Create a filter with default settings (fixed 0.95)
    pub fn new() -> Self {
        Self::with_settings(LowPassSettings::default())
    }

    /// Create a filter with a fixed coefficient
    pub fn fixed(coefficient: f32) -> Self {
        Self::with_settings(LowPassSettings::fixed(coefficient))
    }

    /// Create a filter with specific settings
    ///
    /// Out-of-range values are clamped; call [`LowPassSettings::validate`]
    /// first to reject them instead.
    pub fn with_settings(settings: LowPassSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            enabled: true,
        }
    }

    /// Get current settings
    pub fn settings(&self) -> LowPassSettings {
        self.settings
    }

    /// Set a fixed coefficient, disabling the sweep
    pub fn set_coefficient(&mut self, coefficient: f32) {
        self.settings = LowPassSettings::fixed(coefficient).sanitized();
    }

    /// Set the sweep range
    pub fn set_range(&mut self, min_param: f32, max_param: f32) {
        self.settings = LowPassSettings {
            min_param,
            max_param,
            ..self.settings
        }
        .sanitized();
    }

    /// Set the LFO period in seconds
    pub fn set_auto_period(&mut self, auto_period: f32) {
        self.settings = LowPassSettings {
            auto_period,
            ..self.settings
        }
        .sanitized();
    }

    /// Oscillator driving the coefficient at a given sample rate
    pub fn lfo(&self, sample_rate: u32) -> TriangleLfo {
        TriangleLfo::new(
            self.settings.min_param,
            self.settings.max_param,
            self.settings.auto_period,
            sample_rate,
        )
    }

    /// Coefficient used for sample `n` at `sample_rate`
    pub fn coefficient_at(&self, n: usize, sample_rate: u32) -> f32 {
        self.lfo(sample_rate).value_at(n)
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for LowPassFilter {
    fn process(&mut self, buffer: &mut SampleBuffer) {
        let lfo = self.lfo(buffer.sample_rate());

        for channel in buffer.channels_mut() {
            for n in 1..channel.len() {
                let a = lfo.value_at(n);
                channel[n] = (1.0 - a) * channel[n] + a * channel[n - 1];
            }
        }
    }

    fn reset(&mut self) {
        // Stateless between buffers: the LFO phase restarts on every pass
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Low-Pass Filter"
    }
}
