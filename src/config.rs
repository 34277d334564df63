//! Field configuration.
//!
//! An [`InputConfig`] names the group separator and, optionally, a custom
//! card type table. Without a table the built-in issuers are used.
//!
//! ```json
//! {
//!   "separator": " ",
//!   "rules": [
//!     {"name": "Visa", "prefixes": ["4"], "lengths": [16], "grouping": [4, 4, 4, 4]}
//!   ]
//! }
//! ```

use crate::error::ConfigError;
use crate::format::{check_separator, CardNumberFormatter, DEFAULT_SEPARATOR};
use crate::input::NumberInput;
use crate::registry::CardTypeRegistry;
use crate::rule::CardTypeRule;
use std::sync::Arc;

/// Separator and rule table for a card number field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default, deny_unknown_fields))]
pub struct InputConfig {
    /// Group separator.
    pub separator: String,
    /// Custom card types replacing the built-in table.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub rules: Option<Vec<CardTypeRule>>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            rules: None,
        }
    }
}

impl InputConfig {
    /// Parses a JSON config.
    ///
    /// ```
    /// use card_input::InputConfig;
    ///
    /// let config = InputConfig::from_json(r#"{"separator": " "}"#).unwrap();
    /// let input = config.input().unwrap();
    /// assert_eq!(input.formatter().formatted("4111111111111111"), "4111 1111 1111 1111");
    /// ```
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        check_separator(&config.separator)?;
        Ok(config)
    }

    /// Reads a JSON config file.
    #[cfg(feature = "json")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading input config");
        Self::from_json(&content)
    }

    /// Builds the configured rule table.
    pub fn registry(&self) -> Result<CardTypeRegistry, ConfigError> {
        match &self.rules {
            Some(rules) => Ok(CardTypeRegistry::new(rules.clone())?),
            None => Ok(CardTypeRegistry::default()),
        }
    }

    /// Builds a formatter with the configured separator and table.
    pub fn formatter(&self) -> Result<CardNumberFormatter, ConfigError> {
        let registry = Arc::new(self.registry()?);
        Ok(CardNumberFormatter::new(registry).with_separator(self.separator.as_str())?)
    }

    /// Builds an empty input field.
    pub fn input(&self) -> Result<NumberInput, ConfigError> {
        Ok(NumberInput::new(self.formatter()?))
    }
}
