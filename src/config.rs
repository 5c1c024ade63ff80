//! Configuration builders controlling vocabulary construction.

use serde::{Deserialize, Serialize};

use crate::error::{BpeError, Result};

/// Configuration for a vocabulary build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
    /// Target vocabulary size including the starting alphabet.
    pub target_vocab_size: usize,
    /// Multiplies each bigram occurrence by the frequency of its word.
    ///
    /// Disabled by default: every corpus entry counts once regardless of its frequency.
    pub weight_by_frequency: bool,
    /// Minimum bigram count required before a merge is performed.
    pub min_frequency: u64,
    /// Upper bound, in characters, on symbols produced by merges.
    pub max_symbol_len: Option<usize>,
    /// Hard cap on merge iterations; `None` runs until another stop condition fires.
    pub max_merges: Option<usize>,
    /// Enables per-merge logging through the `log` facade.
    pub show_progress: bool,
}

impl MergeConfig {
    /// Returns a builder initialised with [`MergeConfig::default`].
    #[must_use]
    pub fn builder() -> MergeConfigBuilder {
        MergeConfigBuilder::default()
    }

    /// Validates the invariants required for a build.
    pub fn validate(&self) -> Result<()> {
        if self.target_vocab_size == 0 {
            return Err(BpeError::InvalidConfig(
                "target_vocab_size must be greater than zero".into(),
            ));
        }
        if self.min_frequency == 0 {
            return Err(BpeError::InvalidConfig(
                "min_frequency must be greater than zero".into(),
            ));
        }
        if let Some(len) = self.max_symbol_len {
            if len < 2 {
                return Err(BpeError::InvalidConfig(format!(
                    "max_symbol_len ({len}) must allow at least two characters"
                )));
            }
        }
        if self.max_merges == Some(0) {
            return Err(BpeError::InvalidConfig(
                "max_merges must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            target_vocab_size: 1000,
            weight_by_frequency: false,
            min_frequency: 1,
            max_symbol_len: None,
            max_merges: None,
            show_progress: false,
        }
    }
}

/// Builder for [`MergeConfig`].
#[derive(Debug, Default, Clone)]
pub struct MergeConfigBuilder {
    cfg: MergeConfig,
}

impl MergeConfigBuilder {
    /// Creates a builder with [`MergeConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the desired vocabulary size (including the starting alphabet).
    #[must_use]
    pub fn target_vocab_size(mut self, value: usize) -> Self {
        self.cfg.target_vocab_size = value;
        self
    }

    /// Enables or disables frequency-weighted bigram counting.
    #[must_use]
    pub fn weight_by_frequency(mut self, enabled: bool) -> Self {
        self.cfg.weight_by_frequency = enabled;
        self
    }

    /// Sets the minimum bigram count.
    #[must_use]
    pub fn min_frequency(mut self, value: u64) -> Self {
        self.cfg.min_frequency = value;
        self
    }

    /// Limits merged symbols to `value` characters.
    #[must_use]
    pub fn max_symbol_len(mut self, value: Option<usize>) -> Self {
        self.cfg.max_symbol_len = value;
        self
    }

    /// Sets a hard merge iteration limit.
    #[must_use]
    pub fn max_merges(mut self, value: Option<usize>) -> Self {
        self.cfg.max_merges = value;
        self
    }

    /// Enables or disables per-merge logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`MergeConfig`].
    pub fn build(self) -> Result<MergeConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_unweighted_counting() {
        let cfg = MergeConfig::default();
        assert!(!cfg.weight_by_frequency);
        assert_eq!(cfg.min_frequency, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_overrides_defaults() {
        let cfg = MergeConfig::builder()
            .target_vocab_size(64)
            .weight_by_frequency(true)
            .min_frequency(3)
            .max_symbol_len(Some(4))
            .max_merges(Some(10))
            .show_progress(true)
            .build()
            .expect("config should be valid");
        assert_eq!(cfg.target_vocab_size, 64);
        assert!(cfg.weight_by_frequency);
        assert_eq!(cfg.min_frequency, 3);
        assert_eq!(cfg.max_symbol_len, Some(4));
        assert_eq!(cfg.max_merges, Some(10));
        assert!(cfg.show_progress);
    }

    #[test]
    fn validate_rejects_zero_target() {
        let err = MergeConfig::builder()
            .target_vocab_size(0)
            .build()
            .expect_err("validation should fail");
        assert!(matches!(
            err,
            BpeError::InvalidConfig(message) if message.contains("target_vocab_size")
        ));
    }

    #[test]
    fn validate_rejects_degenerate_limits() {
        let cfg = MergeConfig {
            max_symbol_len: Some(1),
            ..MergeConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = MergeConfig {
            min_frequency: 0,
            ..MergeConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = MergeConfig {
            max_merges: Some(0),
            ..MergeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = MergeConfig::builder()
            .max_symbol_len(Some(6))
            .build()
            .unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MergeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
