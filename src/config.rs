//! Decoder configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};
use crate::utils::LOG_HALF;

/// How per-state selection resolves candidates with equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The later-enumerated candidate wins (`>=`).
    #[default]
    LastSeen,
    /// The earlier-enumerated candidate wins (`>`).
    FirstSeen,
}

/// Knobs for building and running the token-passing network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Inventory symbol scored by both filler sub-networks.
    pub filler_phoneme: String,

    /// Word label carried by filler history entries.
    pub filler_word: String,

    /// Log-probability placed on every transition, self-loops included.
    pub transition_log_prob: f64,

    /// Selection rule for equal-score tokens.
    pub tie_break: TieBreak,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            filler_phoneme: "pau".to_string(),
            filler_word: "pause".to_string(),
            transition_log_prob: LOG_HALF,
            tie_break: TieBreak::LastSeen,
        }
    }
}

impl DecoderConfig {
    /// Load a (possibly partial) configuration from a JSON file.
    ///
    /// Missing fields fall back to [`DecoderConfig::default`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: DecoderConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would build a malformed network.
    pub fn validate(&self) -> Result<()> {
        if self.filler_phoneme.trim().is_empty() {
            return Err(DecodeError::Config("filler_phoneme must not be empty".into()));
        }
        if self.filler_word.trim().is_empty() {
            return Err(DecodeError::Config("filler_word must not be empty".into()));
        }
        if !self.transition_log_prob.is_finite() || self.transition_log_prob > 0.0 {
            return Err(DecodeError::Config(format!(
                "transition_log_prob must be a finite log-probability, got {}",
                self.transition_log_prob
            )));
        }
        Ok(())
    }

    pub fn with_filler_phoneme(mut self, phoneme: impl Into<String>) -> Self {
        self.filler_phoneme = phoneme.into();
        self
    }

    pub fn with_filler_word(mut self, word: impl Into<String>) -> Self {
        self.filler_word = word.into();
        self
    }

    pub fn with_transition_log_prob(mut self, log_prob: f64) -> Self {
        self.transition_log_prob = log_prob;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = DecoderConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.filler_phoneme, "pau");
        assert_eq!(cfg.tie_break, TieBreak::LastSeen);
    }

    #[test]
    fn rejects_positive_or_nan_weight() {
        assert!(DecoderConfig::default()
            .with_transition_log_prob(0.1)
            .validate()
            .is_err());
        assert!(DecoderConfig::default()
            .with_transition_log_prob(f64::NAN)
            .validate()
            .is_err());
        assert!(DecoderConfig::default()
            .with_transition_log_prob(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_blank_filler() {
        let err = DecoderConfig::default().with_filler_word("  ").validate();
        assert!(matches!(err, Err(DecodeError::Config(_))));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: DecoderConfig =
            serde_json::from_str(r#"{ "filler_phoneme": "sil", "tie_break": "first_seen" }"#)
                .unwrap();
        assert_eq!(cfg.filler_phoneme, "sil");
        assert_eq!(cfg.filler_word, "pause");
        assert_eq!(cfg.tie_break, TieBreak::FirstSeen);
        assert_eq!(cfg.transition_log_prob, LOG_HALF);
    }
}
