//! Tunable timings and page contract constants.
//!
//! Every field has a default matching the shipped page, so an empty JSON
//! object (or no config at all) yields the standard behaviour.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ConfigError;

/// Local storage key holding the single draft record.
pub const DRAFT_STORAGE_KEY: &str = "noteAutoSave";

/// Label shown on a submit button while its form is being submitted.
pub const SAVING_LABEL_HTML: &str = r#"<div class="loading"></div> Saving..."#;

/// Runtime configuration for the page behaviours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiConfig {
    /// Quiet period before an edited draft is persisted.
    pub autosave_debounce_ms: u32,
    /// How long the "Auto-saved" toast stays up.
    pub autosave_toast_ms: u32,
    /// How long the "Restored from auto-save" toast stays up.
    pub restore_toast_ms: u32,
    /// Safety window after which a busy submit button is re-enabled.
    pub loading_reset_ms: u32,
    /// Default toast lifetime when the caller doesn't give one.
    pub toast_duration_ms: u32,
    /// Length of the toast exit animation before the element is removed.
    pub toast_exit_ms: u32,
    /// Per-card animation delay step, in seconds.
    pub card_stagger_secs: f64,
    /// Storage key for the draft record.
    pub storage_key: SmolStr,
    /// Markup placed in a submit button while busy.
    pub saving_label_html: SmolStr,
    /// Whether to attach the character counter to the content field.
    pub character_counter: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            autosave_debounce_ms: 2000,
            autosave_toast_ms: 1000,
            restore_toast_ms: 2000,
            loading_reset_ms: 5000,
            toast_duration_ms: 3000,
            toast_exit_ms: 300,
            card_stagger_secs: 0.1,
            storage_key: SmolStr::new_static(DRAFT_STORAGE_KEY),
            saving_label_html: SmolStr::new_static(SAVING_LABEL_HTML),
            character_counter: true,
        }
    }
}

impl UiConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: UiConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the behaviours misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storageKey must not be empty".into()));
        }
        if !self.card_stagger_secs.is_finite() || self.card_stagger_secs < 0.0 {
            return Err(ConfigError::Invalid(
                "cardStaggerSecs must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = UiConfig::from_json("{}").unwrap();
        assert_eq!(config, UiConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = UiConfig::from_json(r#"{"autosaveDebounceMs": 500, "storageKey": "draft"}"#)
            .unwrap();
        assert_eq!(config.autosave_debounce_ms, 500);
        assert_eq!(config.storage_key, "draft");
        assert_eq!(config.loading_reset_ms, 5000);
    }

    #[test]
    fn test_rejects_empty_key() {
        let err = UiConfig::from_json(r#"{"storageKey": ""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = UiConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
