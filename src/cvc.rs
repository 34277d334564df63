//! Card verification codes (CVV/CVC/CID).
//!
//! Most issuers print a 3-digit code; American Express uses 4. The required
//! length comes from the card type rule.
//!
//! # Example
//!
//! ```
//! use card_input::{CardTypeRegistry, Cvc};
//!
//! let registry = CardTypeRegistry::default();
//! let amex = registry.resolve("37").unwrap();
//!
//! let cvc = Cvc::parse("1234").unwrap();
//! assert!(cvc.validate_for(amex).is_ok());
//! assert!(Cvc::parse("12a").is_err());
//! ```

use crate::rule::CardTypeRule;
use std::fmt;
use zeroize::Zeroize;

/// Shortest accepted code.
pub const MIN_CVC_LENGTH: usize = 3;

/// Longest accepted code.
pub const MAX_CVC_LENGTH: usize = 4;

/// A verification code of 3 or 4 digits.
///
/// # Security
///
/// - Memory is zeroed on drop using the `zeroize` crate
/// - `Debug` and `Display` never show the digits
#[derive(Clone, PartialEq, Eq)]
pub struct Cvc {
    digits: String,
}

impl Cvc {
    /// Parses a 3- or 4-digit code.
    pub fn parse(input: &str) -> Result<Self, CvcError> {
        if input.is_empty() {
            return Err(CvcError::Empty);
        }

        if let Some((position, character)) =
            input.chars().enumerate().find(|(_, c)| !c.is_ascii_digit())
        {
            return Err(CvcError::InvalidCharacter {
                character,
                position,
            });
        }

        let length = input.len();
        if !(MIN_CVC_LENGTH..=MAX_CVC_LENGTH).contains(&length) {
            return Err(CvcError::InvalidLength { length });
        }

        Ok(Self {
            digits: input.to_string(),
        })
    }

    /// Checks the code length against the card type's requirement.
    pub fn validate_for(&self, rule: &CardTypeRule) -> Result<(), CvcError> {
        let expected = rule.cvc_length();
        if self.len() != expected {
            return Err(CvcError::WrongLengthForCardType {
                card_type: rule.name().to_string(),
                length: self.len(),
                expected,
            });
        }
        Ok(())
    }

    /// Number of digits.
    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns true if there are no digits. Never true for a parsed code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// The code itself.
    ///
    /// # Security Warning
    ///
    /// Never log the result.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl fmt::Debug for Cvc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cvc")
            .field("value", &"***")
            .field("length", &self.digits.len())
            .finish()
    }
}

impl fmt::Display for Cvc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "*".repeat(self.digits.len()))
    }
}

impl Drop for Cvc {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

/// Errors that can occur during CVC validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvcError {
    /// The input is empty.
    Empty,
    /// The code contains a non-digit.
    InvalidCharacter {
        /// The invalid character found.
        character: char,
        /// Position of the invalid character.
        position: usize,
    },
    /// The code is not 3 or 4 digits long.
    InvalidLength {
        /// Actual length provided.
        length: usize,
    },
    /// The code length doesn't match the card type.
    WrongLengthForCardType {
        /// Name of the card type.
        card_type: String,
        /// Actual length provided.
        length: usize,
        /// Length required by the card type.
        expected: usize,
    },
}

impl fmt::Display for CvcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "CVC is empty"),
            Self::InvalidCharacter { character, position } => {
                write!(f, "invalid character '{}' at position {}", character, position)
            }
            Self::InvalidLength { length } => {
                write!(f, "CVC must be 3 or 4 digits, got {}", length)
            }
            Self::WrongLengthForCardType {
                card_type,
                length,
                expected,
            } => {
                write!(
                    f,
                    "{} cards require {} digit CVC, got {}",
                    card_type, expected, length
                )
            }
        }
    }
}

impl std::error::Error for CvcError {}
