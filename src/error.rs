//! Error types for editing, rule tables and configuration.
//!
//! Validation outcomes are not errors: a number that is too short or fails
//! its checksum is reported through [`ValidationResult`](crate::ValidationResult).
//! The types here cover edits that cannot be applied at all and
//! configuration that cannot be loaded.

use std::fmt;

/// Reasons an edit to the display text was refused.
///
/// A refused edit leaves the text and the input state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The replacement would put a non-digit into the card number.
    InvalidCharacter {
        /// Position in the replacement string (0-indexed, in chars).
        position: usize,
        /// The offending character.
        character: char,
    },

    /// The edit range does not lie inside the current text.
    RangeOutOfBounds {
        /// Start of the requested range (chars).
        start: usize,
        /// End of the requested range (chars).
        end: usize,
        /// Length of the current text (chars).
        length: usize,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter {
                position,
                character,
            } => {
                write!(
                    f,
                    "invalid character '{}' at position {} (only digits allowed)",
                    character.escape_default(),
                    position
                )
            }
            Self::RangeOutOfBounds { start, end, length } => {
                write!(
                    f,
                    "edit range {}..{} is outside text of length {}",
                    start, end, length
                )
            }
        }
    }
}

impl std::error::Error for EditError {}

/// The group separator was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeparatorError {
    /// Separators containing digits would make formatting irreversible.
    ContainsDigit(String),
}

impl fmt::Display for SeparatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainsDigit(sep) => {
                write!(f, "separator {:?} must not contain digits", sep)
            }
        }
    }
}

impl std::error::Error for SeparatorError {}

/// Errors raised while building or loading a card type rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule has an empty name.
    EmptyName,

    /// A prefix range is malformed.
    InvalidPrefix {
        /// Name of the rule carrying the prefix.
        rule: String,
        /// The prefix as written.
        prefix: String,
    },

    /// A rule accepts no length at all.
    NoLengths {
        /// Name of the rule.
        rule: String,
    },

    /// A rule lists zero as an accepted length.
    ZeroLength {
        /// Name of the rule.
        rule: String,
    },

    /// A rule's display grouping contains an empty group.
    ZeroGroup {
        /// Name of the rule.
        rule: String,
    },

    /// The rule table could not be parsed.
    Parse(String),

    /// The rule table file could not be read.
    Io(String),
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "card type rule has an empty name"),
            Self::InvalidPrefix { rule, prefix } => {
                write!(
                    f,
                    "{}: invalid prefix {:?} (expected digits like \"4\" or \"51-55\")",
                    rule, prefix
                )
            }
            Self::NoLengths { rule } => write!(f, "{}: no accepted lengths", rule),
            Self::ZeroLength { rule } => write!(f, "{}: length 0 is not allowed", rule),
            Self::ZeroGroup { rule } => write!(f, "{}: grouping contains an empty group", rule),
            Self::Parse(msg) => write!(f, "rule table parse error: {}", msg),
            Self::Io(msg) => write!(f, "rule table read error: {}", msg),
        }
    }
}

impl std::error::Error for RuleError {}

impl From<std::io::Error> for RuleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Errors raised while loading an [`InputConfig`](crate::config::InputConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The config file is not valid.
    Parse(String),
    /// The embedded rule table is invalid.
    Rules(RuleError),
    /// The configured separator is invalid.
    Separator(SeparatorError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config read error: {}", msg),
            Self::Parse(msg) => write!(f, "config parse error: {}", msg),
            Self::Rules(err) => write!(f, "config rules: {}", err),
            Self::Separator(err) => write!(f, "config separator: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rules(err) => Some(err),
            Self::Separator(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<RuleError> for ConfigError {
    fn from(err: RuleError) -> Self {
        Self::Rules(err)
    }
}

impl From<SeparatorError> for ConfigError {
    fn from(err: SeparatorError) -> Self {
        Self::Separator(err)
    }
}
