use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::label::LabelOptions;
use crate::selector::RuleTable;

pub const DEFAULT_QUIESCENCE_MS: u64 = 500;
pub const DEFAULT_HIGHLIGHT_MS: u64 = 1_000;
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "rgba(255, 235, 59, 0.3)";
pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("quiescence window must be non-zero")]
    ZeroQuiescence,
    #[error("rule for site {site:?} has an empty query")]
    EmptyQuery { site: String },
}

/// Tunables for one synchronizer instance. Every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub quiescence_ms: u64,
    pub highlight_ms: u64,
    pub highlight_color: String,
    /// Upper bound on ancestors inspected by jump-to-latest.
    pub max_ancestor_depth: usize,
    pub label: LabelOptions,
    pub rules: RuleTable,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            quiescence_ms: DEFAULT_QUIESCENCE_MS,
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
            label: LabelOptions::default(),
            rules: RuleTable::default(),
        }
    }
}

impl SyncConfig {
    /// Parses a RON document such as `(quiescence_ms: 250)`.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiescence_ms == 0 {
            return Err(ConfigError::ZeroQuiescence);
        }
        if let Some(rule) = self.rules.rules().iter().find(|r| r.query.trim().is_empty()) {
            return Err(ConfigError::EmptyQuery {
                site: rule.site.clone(),
            });
        }
        Ok(())
    }

    pub fn quiescence(&self) -> Duration {
        Duration::from_millis(self.quiescence_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SyncConfig, DEFAULT_QUIESCENCE_MS};

    #[test]
    fn empty_document_yields_defaults() {
        let config = SyncConfig::from_ron("()").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.quiescence_ms, DEFAULT_QUIESCENCE_MS);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let text = r#"(
            quiescence_ms: 250,
            label: (max_chars: 12),
            rules: [(site: "mistral", query: ".user")],
        )"#;
        let config = SyncConfig::from_ron(text).unwrap();
        assert_eq!(config.quiescence_ms, 250);
        assert_eq!(config.label.max_chars, 12);
        assert_eq!(config.label.ellipsis, "...");
        assert_eq!(config.rules.resolve("chat.mistral.ai"), Some(".user"));
        assert_eq!(config.rules.resolve("chatgpt.com"), None);
    }

    #[test]
    fn zero_quiescence_is_rejected() {
        let err = SyncConfig::from_ron("(quiescence_ms: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroQuiescence));
    }

    #[test]
    fn empty_query_is_rejected() {
        let err = SyncConfig::from_ron(r#"(rules: [(site: "x", query: " ")])"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyQuery { site } if site == "x"));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = SyncConfig::from_ron("(quiescence_ms: \"soon\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
