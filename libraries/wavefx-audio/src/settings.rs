//! Declarative effect chain configuration
//!
//! A chain is described in TOML, one `[[effects]]` table per node in order:
//!
//! ```toml
//! [[effects]]
//! type = "low_pass"
//! coefficient = 0.5
//!
//! [[effects]]
//! type = "low_pass"
//! min_param = 0.0
//! max_param = 0.95
//! auto_period = 2.0
//! ```

use crate::effects::{AudioEffect, EffectChain, LowPassFilter, LowPassSettings};
use crate::error::{AudioError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix of environment variables that override file settings
const ENV_PREFIX: &str = "WAVEFX";

/// Ordered list of effects making up a chain
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChainSettings {
    #[serde(default)]
    pub effects: Vec<EffectSettings>,
}

/// Settings for a single chain node
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectSettings {
    /// One-pole low-pass filter
    LowPass {
        #[serde(default = "default_enabled")]
        enabled: bool,

        /// Fixed coefficient; mutually exclusive with `min_param`/`max_param`
        #[serde(default)]
        coefficient: Option<f32>,

        #[serde(default)]
        min_param: Option<f32>,

        #[serde(default)]
        max_param: Option<f32>,

        #[serde(default)]
        auto_period: f32,
    },
}

fn default_enabled() -> bool {
    true
}

impl EffectSettings {
    /// Settings for a low-pass node built from `LowPassSettings`
    pub fn low_pass(settings: LowPassSettings) -> Self {
        Self::LowPass {
            enabled: true,
            coefficient: None,
            min_param: Some(settings.min_param),
            max_param: Some(settings.max_param),
            auto_period: settings.auto_period,
        }
    }

    /// Build the effect this node describes
    ///
    /// # Errors
    /// Returns `AudioError::Config` for conflicting or out-of-range parameters.
    pub fn build(&self) -> Result<Box<dyn AudioEffect>> {
        match self {
            Self::LowPass {
                enabled,
                coefficient,
                min_param,
                max_param,
                auto_period,
            } => {
                let settings = match (coefficient, min_param, max_param) {
                    (Some(a), None, None) => LowPassSettings {
                        auto_period: *auto_period,
                        ..LowPassSettings::fixed(*a)
                    },
                    (None, Some(min), Some(max)) => {
                        LowPassSettings::sweep(*min, *max, *auto_period)
                    }
                    (None, None, None) => LowPassSettings {
                        auto_period: *auto_period,
                        ..LowPassSettings::default()
                    },
                    (None, _, _) => {
                        return Err(AudioError::config(
                            "low_pass: min_param and max_param must be given together",
                        ))
                    }
                    (Some(_), _, _) => {
                        return Err(AudioError::config(
                            "low_pass: coefficient conflicts with min_param/max_param",
                        ))
                    }
                };

                settings
                    .validate()
                    .map_err(|e| AudioError::config(format!("low_pass: {}", e)))?;

                let mut filter = LowPassFilter::with_settings(settings);
                filter.set_enabled(*enabled);
                Ok(Box::new(filter))
            }
        }
    }
}

impl ChainSettings {
    /// Load chain settings from a TOML file, then `WAVEFX__*` environment overrides
    ///
    /// # Errors
    /// Returns `AudioError::Config` if the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AudioError::config(e.to_string()))?;

        let chain: Self = settings
            .try_deserialize()
            .map_err(|e| AudioError::config(e.to_string()))?;

        debug!("Loaded {} effect(s) from {}", chain.effects.len(), path.display());
        Ok(chain)
    }

    /// Parse chain settings from a TOML string
    ///
    /// # Errors
    /// Returns `AudioError::Config` if the text is malformed.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AudioError::config(e.to_string()))
    }

    /// Build the described chain, head first
    ///
    /// # Errors
    /// Returns `AudioError::Config` naming the first invalid node.
    pub fn build_chain(&self) -> Result<EffectChain> {
        let mut chain = EffectChain::new();
        for (index, effect) in self.effects.iter().enumerate() {
            let node = effect.build().map_err(|e| match e {
                AudioError::Config(msg) => AudioError::config(format!("effect {}: {}", index, msg)),
                other => other,
            })?;
            chain.add_effect(node);
        }
        Ok(chain)
    }
}
