//! The raw card number value.
//!
//! A [`CardNumber`] is rebuilt from the text on every keystroke. It owns
//! the only copy of the full digits and wipes them when dropped.

use crate::error::EditError;
use std::fmt;
use zeroize::Zeroize;

/// Maximum number of digits any issuer uses.
pub const MAX_CARD_DIGITS: usize = 19;

/// Minimum number of digits any issuer uses.
pub const MIN_CARD_DIGITS: usize = 12;

/// A raw card number: decimal digits with separators removed.
///
/// # Security
///
/// - Memory is zeroed on drop using the `zeroize` crate
/// - `Debug` and `Display` show the last four digits only
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardNumber {
    digits: String,
}

impl CardNumber {
    /// Parses a string of ASCII digits.
    ///
    /// # Example
    ///
    /// ```
    /// use card_input::CardNumber;
    ///
    /// let number = CardNumber::parse("4111111111111111").unwrap();
    /// assert_eq!(number.len(), 16);
    /// assert!(CardNumber::parse("4111-1111").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, EditError> {
        if let Some((position, character)) =
            input.chars().enumerate().find(|(_, c)| !c.is_ascii_digit())
        {
            return Err(EditError::InvalidCharacter {
                position,
                character,
            });
        }
        Ok(Self {
            digits: input.to_string(),
        })
    }

    /// Keeps only the ASCII digits of `input`.
    ///
    /// Used for numbers coming from a scanner, which may carry spaces.
    pub fn from_lossy(input: &str) -> Self {
        Self {
            digits: input.chars().filter(|c| c.is_ascii_digit()).collect(),
        }
    }

    /// Wraps digits already known to be ASCII digits.
    pub(crate) fn from_digits(digits: String) -> Self {
        debug_assert!(digits.bytes().all(|b| b.is_ascii_digit()));
        Self { digits }
    }

    /// Number of digits.
    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns true if there are no digits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// The full number as a digit string.
    ///
    /// # Security Warning
    ///
    /// This exposes the full card number. Never log the result.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Digit values (0-9) for checksum computation.
    pub fn digit_values(&self) -> Vec<u8> {
        self.digits.bytes().map(|b| b - b'0').collect()
    }

    /// The last four digits, or all of them for shorter numbers.
    pub fn last_four(&self) -> &str {
        let len = self.digits.len();
        &self.digits[len.saturating_sub(4)..]
    }

    /// Masks all digits except the last four: `************1111`.
    pub fn masked(&self) -> String {
        let hidden = self.digits.len().saturating_sub(4);
        let mut result = "*".repeat(hidden);
        result.push_str(self.last_four());
        result
    }

    /// Returns true if the number passes the Luhn check.
    #[inline]
    pub fn passes_luhn(&self) -> bool {
        crate::luhn::validate_str(&self.digits)
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardNumber")
            .field("number", &self.masked())
            .field("length", &self.digits.len())
            .finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl Drop for CardNumber {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}
