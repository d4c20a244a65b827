//! Tunable settings for offer refresh.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{OFFER_BATCH_SIZE, TIER_MAX, TIER_MIN};

/// Errors raised when offer configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OfferConfigError {
    #[error("batch_size must be at least 1 (got {0})")]
    EmptyBatch(usize),
    #[error("tier_floor_bias must be at most {max} (got {value})")]
    TierBiasTooLarge { value: u8, max: u8 },
    #[error("invalid offer config json: {0}")]
    Parse(String),
}

/// Settings consumed by the refresh orchestrator and offer generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferConfig {
    #[serde(default = "OfferConfig::default_batch_size")]
    pub batch_size: usize,
    /// Added to the rolled tier before clamping; shifts the band upward.
    #[serde(default)]
    pub tier_floor_bias: u8,
    #[serde(default = "OfferConfig::default_loot_hints")]
    pub loot_hints: bool,
}

impl OfferConfig {
    const fn default_batch_size() -> usize {
        OFFER_BATCH_SIZE
    }

    const fn default_loot_hints() -> bool {
        true
    }

    #[must_use]
    pub fn max_tier_floor_bias() -> u8 {
        u8::try_from(TIER_MAX - TIER_MIN).unwrap_or(u8::MAX)
    }

    /// Parse a possibly partial JSON document, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails validation.
    pub fn from_json(json: &str) -> Result<Self, OfferConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| OfferConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OfferConfigError`] for an empty batch or an out-of-range bias.
    pub fn validate(&self) -> Result<(), OfferConfigError> {
        if self.batch_size == 0 {
            return Err(OfferConfigError::EmptyBatch(self.batch_size));
        }
        let max = Self::max_tier_floor_bias();
        if self.tier_floor_bias > max {
            return Err(OfferConfigError::TierBiasTooLarge {
                value: self.tier_floor_bias,
                max,
            });
        }
        Ok(())
    }
}

impl Default for OfferConfig {
    fn default() -> Self {
        Self {
            batch_size: Self::default_batch_size(),
            tier_floor_bias: 0,
            loot_hints: Self::default_loot_hints(),
        }
    }
}
