//! Classification of (partial) card numbers.
//!
//! A number is classified on every edit. The result is a set of issues;
//! the empty set means the number is complete and valid for its card type.
//! A partial number usually carries `NumberTooShort`, and a number whose
//! issuer is not settled yet also carries `AmbiguousType`.

use crate::number::CardNumber;
use crate::registry::CardTypeRegistry;
use crate::luhn;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A single reason a number is not (yet) valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationIssue {
    /// More digits are needed to reach an accepted length.
    NumberTooShort,
    /// The number is longer than its card type allows.
    NumberTooLong,
    /// Non-digit characters, or no issuer prefix matches.
    InvalidFormat,
    /// The number has an accepted length but fails the Luhn check.
    InvalidLuhnChecksum,
    /// Several card types still match the prefix.
    AmbiguousType,
}

impl ValidationIssue {
    const ALL: [Self; 5] = [
        Self::NumberTooShort,
        Self::NumberTooLong,
        Self::InvalidFormat,
        Self::InvalidLuhnChecksum,
        Self::AmbiguousType,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Self::NumberTooShort => 1 << 0,
            Self::NumberTooLong => 1 << 1,
            Self::InvalidFormat => 1 << 2,
            Self::InvalidLuhnChecksum => 1 << 3,
            Self::AmbiguousType => 1 << 4,
        }
    }

    /// Short human-readable description.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NumberTooShort => "number too short",
            Self::NumberTooLong => "number too long",
            Self::InvalidFormat => "invalid format",
            Self::InvalidLuhnChecksum => "invalid Luhn checksum",
            Self::AmbiguousType => "ambiguous card type",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Set of [`ValidationIssue`]s. Empty means valid.
///
/// # Example
///
/// ```
/// use card_input::{ValidationIssue, ValidationResult};
///
/// let result = ValidationResult::from(ValidationIssue::NumberTooShort)
///     | ValidationIssue::AmbiguousType;
/// assert!(!result.is_valid());
/// assert!(result.contains(ValidationIssue::AmbiguousType));
/// assert!(ValidationResult::VALID.is_valid());
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ValidationResult(u8);

impl ValidationResult {
    /// No issues.
    pub const VALID: Self = Self(0);

    /// Returns true if there are no issues.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if `issue` is in the set.
    #[inline]
    pub const fn contains(&self, issue: ValidationIssue) -> bool {
        self.0 & issue.bit() != 0
    }

    /// Adds `issue` to the set.
    #[inline]
    pub fn insert(&mut self, issue: ValidationIssue) {
        self.0 |= issue.bit();
    }

    /// The issues in the set, in declaration order.
    pub fn issues(&self) -> impl Iterator<Item = ValidationIssue> + '_ {
        ValidationIssue::ALL
            .into_iter()
            .filter(move |issue| self.contains(*issue))
    }
}

impl From<ValidationIssue> for ValidationResult {
    fn from(issue: ValidationIssue) -> Self {
        Self(issue.bit())
    }
}

impl BitOr<ValidationIssue> for ValidationResult {
    type Output = Self;

    fn bitor(self, issue: ValidationIssue) -> Self {
        Self(self.0 | issue.bit())
    }
}

impl BitOrAssign<ValidationIssue> for ValidationResult {
    fn bitor_assign(&mut self, issue: ValidationIssue) {
        self.insert(issue);
    }
}

impl fmt::Debug for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("Valid");
        }
        f.debug_set().entries(self.issues()).finish()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("valid");
        }
        let parts: Vec<&str> = self.issues().map(|i| i.description()).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Classifies a raw digit string against the registry.
///
/// - No digits: `NumberTooShort`
/// - Non-digits or no matching issuer: `InvalidFormat`
/// - Issuer not settled: `AmbiguousType`, plus a length issue
/// - Settled issuer: length checked against the rule, and the Luhn check
///   applied once the length is accepted
pub fn classify(registry: &CardTypeRegistry, digits: &str) -> ValidationResult {
    use ValidationIssue::*;

    let length = digits.len();
    if length == 0 {
        return NumberTooShort.into();
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return InvalidFormat.into();
    }

    let candidates = registry.candidates(digits);
    if candidates.is_empty() {
        let mut result = ValidationResult::from(InvalidFormat);
        if length > registry.max_length() {
            result |= NumberTooLong;
        }
        return result;
    }

    let mut result = ValidationResult::VALID;
    match registry.resolve(digits) {
        Some(rule) => {
            if length > rule.max_length() {
                result |= NumberTooLong;
            } else if !rule.accepts_length(length) {
                result |= NumberTooShort;
            } else if rule.requires_luhn() && !luhn::validate_str(digits) {
                result |= InvalidLuhnChecksum;
            }
        }
        None => {
            result |= AmbiguousType;
            let min = candidates.iter().map(|c| c.rule.min_length()).min().unwrap_or(0);
            let max = candidates.iter().map(|c| c.rule.max_length()).max().unwrap_or(0);
            if length > max {
                result |= NumberTooLong;
            } else if length < min {
                result |= NumberTooShort;
            }
        }
    }
    result
}

impl CardTypeRegistry {
    /// Classifies a card number. See [`classify`].
    ///
    /// ```
    /// use card_input::{CardNumber, CardTypeRegistry, ValidationIssue};
    ///
    /// let registry = CardTypeRegistry::default();
    /// let number = CardNumber::parse("4111111111111111").unwrap();
    /// assert!(registry.validate(&number).is_valid());
    ///
    /// let partial = CardNumber::parse("4111").unwrap();
    /// assert!(registry.validate(&partial).contains(ValidationIssue::NumberTooShort));
    /// ```
    pub fn validate(&self, number: &CardNumber) -> ValidationResult {
        classify(self, number.as_str())
    }
}
