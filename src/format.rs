//! Display formatting and edit application.
//!
//! The formatter turns raw digits into the grouped display text and back,
//! and applies a single `(range, replacement)` edit to the display text.
//! Group lengths come from the resolved card type rule; while the issuer is
//! not settled, digits are shown in groups of four.
//!
//! # Example
//!
//! ```
//! use card_input::CardNumberFormatter;
//!
//! let formatter = CardNumberFormatter::default();
//!
//! assert_eq!(formatter.formatted("4111111111111111"), "4111-1111-1111-1111");
//! assert_eq!(formatter.formatted("378282246310005"), "3782-822463-10005");
//! assert_eq!(formatter.unformatted("4111-1111-1111-1111"), "4111111111111111");
//!
//! // Custom separator
//! let spaced = formatter.with_separator(" ").unwrap();
//! assert_eq!(spaced.formatted("4111111111111111"), "4111 1111 1111 1111");
//! ```

use crate::error::{EditError, SeparatorError};
use crate::number::CardNumber;
use crate::registry::CardTypeRegistry;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = "-";

/// Group length used while no card type is resolved.
pub const DEFAULT_GROUP: usize = 4;

/// Formats card numbers for display using a shared rule table.
#[derive(Debug, Clone)]
pub struct CardNumberFormatter {
    registry: Arc<CardTypeRegistry>,
    separator: String,
}

/// Result of applying an edit to the display text.
#[derive(Clone, PartialEq, Eq)]
pub struct Replacement {
    /// The reformatted display text.
    pub text: String,
    /// The raw digits of the new text.
    pub number: CardNumber,
    /// Cursor offset (chars) right after the last inserted digit.
    pub cursor: usize,
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replacement")
            .field("number", &self.number)
            .field("text_length", &self.text.chars().count())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl CardNumberFormatter {
    /// Creates a formatter over `registry` with the default separator.
    pub fn new(registry: Arc<CardTypeRegistry>) -> Self {
        Self {
            registry,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Returns a copy of this formatter using `separator`.
    ///
    /// Separators containing ASCII digits are rejected, since they could
    /// not be told apart from the number.
    ///
    /// ```
    /// use card_input::CardNumberFormatter;
    ///
    /// assert!(CardNumberFormatter::default().with_separator(" / ").is_ok());
    /// assert!(CardNumberFormatter::default().with_separator("0").is_err());
    /// ```
    pub fn with_separator(&self, separator: impl Into<String>) -> Result<Self, SeparatorError> {
        let separator = separator.into();
        check_separator(&separator)?;
        Ok(Self {
            registry: Arc::clone(&self.registry),
            separator,
        })
    }

    /// The configured separator.
    #[inline]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The rule table used for grouping.
    #[inline]
    pub fn registry(&self) -> &Arc<CardTypeRegistry> {
        &self.registry
    }

    /// Removes every occurrence of the separator.
    ///
    /// Other characters are kept so that validation can reject them.
    pub fn unformatted(&self, display: &str) -> String {
        if self.separator.is_empty() {
            return display.to_string();
        }
        display.replace(&self.separator, "")
    }

    /// Inserts the separator between digit groups.
    ///
    /// Digits beyond the resolved rule's grouping form one trailing group.
    pub fn formatted(&self, raw: &str) -> String {
        let groups = self.groups(raw);
        groups.join(&self.separator)
    }

    /// Splits `raw` into its display groups.
    ///
    /// ```
    /// use card_input::CardNumberFormatter;
    ///
    /// let formatter = CardNumberFormatter::default();
    /// assert_eq!(formatter.groups("3056930902"), vec!["3056", "930902"]);
    /// assert!(formatter.groups("").is_empty());
    /// ```
    pub fn groups(&self, raw: &str) -> Vec<String> {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let pattern: &[usize] = match self.registry.resolve(raw) {
            Some(rule) => rule.grouping(),
            None => &[],
        };

        let mut groups = Vec::with_capacity(pattern.len().max(chars.len() / DEFAULT_GROUP + 1));
        let mut pos = 0;

        for &size in pattern {
            if pos >= chars.len() {
                break;
            }
            let end = (pos + size).min(chars.len());
            groups.push(chars[pos..end].iter().collect());
            pos = end;
        }

        if pos < chars.len() {
            if pattern.is_empty() {
                for chunk in chars[pos..].chunks(DEFAULT_GROUP) {
                    groups.push(chunk.iter().collect());
                }
            } else {
                groups.push(chars[pos..].iter().collect());
            }
        }

        groups
    }

    /// Formats a placeholder unless it is already formatted.
    ///
    /// Placeholders that are not numbers are returned as is.
    ///
    /// ```
    /// use card_input::CardNumberFormatter;
    ///
    /// let formatter = CardNumberFormatter::default();
    /// assert_eq!(formatter.format_placeholder("4242424242424242"), "4242-4242-4242-4242");
    /// assert_eq!(formatter.format_placeholder("1234-5678"), "1234-5678");
    /// assert_eq!(formatter.format_placeholder("Card number"), "Card number");
    /// ```
    pub fn format_placeholder(&self, text: &str) -> String {
        let already_formatted = !self.separator.is_empty() && text.contains(&self.separator);
        if already_formatted || text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return text.to_string();
        }
        self.formatted(text)
    }

    /// Applies `replacement` over the char `range` of `current`.
    ///
    /// The replacement may contain separators (a pasted formatted number);
    /// any other non-digit rejects the edit. Deleting only separators with
    /// an empty replacement also deletes the digit before them.
    ///
    /// On error nothing is produced and the caller's text stays as it was.
    ///
    /// # Example
    ///
    /// ```
    /// use card_input::CardNumberFormatter;
    ///
    /// let formatter = CardNumberFormatter::default();
    ///
    /// let edit = formatter.apply_replacement("4111", 4..4, "1").unwrap();
    /// assert_eq!(edit.text, "4111-1");
    /// assert_eq!(edit.cursor, 6);
    ///
    /// // Backspace over the separator removes the digit before it
    /// let edit = formatter.apply_replacement("4111-1", 4..5, "").unwrap();
    /// assert_eq!(edit.text, "4111");
    ///
    /// assert!(formatter.apply_replacement("4111", 4..4, "a").is_err());
    /// ```
    pub fn apply_replacement(
        &self,
        current: &str,
        range: Range<usize>,
        replacement: &str,
    ) -> Result<Replacement, EditError> {
        let chars: Vec<char> = current.chars().collect();
        if range.start > range.end || range.end > chars.len() {
            return Err(EditError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                length: chars.len(),
            });
        }

        let inserted = self.replacement_digits(replacement)?;

        let mut before: String = chars[..range.start]
            .iter()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let after: String = chars[range.end..]
            .iter()
            .filter(|c| c.is_ascii_digit())
            .collect();

        let removes_only_separators = !range.is_empty()
            && inserted.is_empty()
            && !chars[range.clone()].iter().any(|c| c.is_ascii_digit());
        if removes_only_separators {
            before.pop();
        }

        let digits_before_cursor = before.len() + inserted.len();

        let mut raw = before;
        raw.push_str(&inserted);
        raw.push_str(&after);

        let text = self.formatted(&raw);
        let cursor = cursor_after_digits(&text, digits_before_cursor);

        Ok(Replacement {
            text,
            number: CardNumber::from_digits(raw),
            cursor,
        })
    }

    /// Digits of a replacement string, skipping separator occurrences.
    fn replacement_digits(&self, replacement: &str) -> Result<String, EditError> {
        let mut digits = String::with_capacity(replacement.len());
        let mut rest = replacement;
        let mut position = 0;

        while let Some(c) = rest.chars().next() {
            if !self.separator.is_empty() && rest.starts_with(&self.separator) {
                position += self.separator.chars().count();
                rest = &rest[self.separator.len()..];
                continue;
            }
            if !c.is_ascii_digit() {
                return Err(EditError::InvalidCharacter {
                    position,
                    character: c,
                });
            }
            digits.push(c);
            position += 1;
            rest = &rest[c.len_utf8()..];
        }

        Ok(digits)
    }
}

impl Default for CardNumberFormatter {
    fn default() -> Self {
        Self::new(Arc::new(CardTypeRegistry::default()))
    }
}

pub(crate) fn check_separator(separator: &str) -> Result<(), SeparatorError> {
    if separator.bytes().any(|b| b.is_ascii_digit()) {
        return Err(SeparatorError::ContainsDigit(separator.to_string()));
    }
    Ok(())
}

/// Char offset just past the `count`-th digit of `text`.
fn cursor_after_digits(text: &str, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let mut seen = 0;
    for (index, c) in text.chars().enumerate() {
        if c.is_ascii_digit() {
            seen += 1;
            if seen == count {
                return index + 1;
            }
        }
    }
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> CardNumberFormatter {
        CardNumberFormatter::default()
    }

    #[test]
    fn test_formatted_by_card_type() {
        let f = formatter();
        assert_eq!(f.formatted("4111111111111111"), "4111-1111-1111-1111");
        assert_eq!(f.formatted("4222222222222"), "4222-2222-2222-2");
        assert_eq!(f.formatted("378282246310005"), "3782-822463-10005");
        assert_eq!(f.formatted("30569309025904"), "3056-930902-5904");
        assert_eq!(f.formatted("5555555555554444"), "5555-5555-5555-4444");
    }

    #[test]
    fn test_formatted_partial() {
        let f = formatter();
        assert_eq!(f.formatted(""), "");
        assert_eq!(f.formatted("4"), "4");
        assert_eq!(f.formatted("4111"), "4111");
        assert_eq!(f.formatted("41111"), "4111-1");
        assert_eq!(f.formatted("37828"), "3782-8");
        assert_eq!(f.formatted("3782822"), "3782-822");
    }

    #[test]
    fn test_formatted_unresolved_uses_default_groups() {
        let f = formatter();
        // No issuer
        assert_eq!(f.formatted("0000000000"), "0000-0000-00");
        // Ambiguous
        assert_eq!(f.formatted("3"), "3");
    }

    #[test]
    fn test_formatted_trailing_group() {
        let f = formatter();
        // UnionPay 19 digits: pattern of four quads plus a trailing group
        assert_eq!(
            f.formatted("6212345678901234567"),
            "6212-3456-7890-1234-567"
        );
    }

    #[test]
    fn test_unformatted() {
        let f = formatter();
        assert_eq!(f.unformatted("4111-1111-1111-1111"), "4111111111111111");
        assert_eq!(f.unformatted("4111 1111"), "4111 1111");
        assert_eq!(f.unformatted(""), "");

        let spaced = f.with_separator(" - ").unwrap();
        assert_eq!(spaced.unformatted("4111 - 1111"), "41111111");
    }

    #[test]
    fn test_with_separator() {
        let f = formatter();
        assert_eq!(
            f.with_separator("12").unwrap_err(),
            SeparatorError::ContainsDigit("12".into())
        );

        let spaced = f.with_separator(" ").unwrap();
        assert_eq!(spaced.separator(), " ");
        assert_eq!(spaced.formatted("378282246310005"), "3782 822463 10005");

        let none = f.with_separator("").unwrap();
        assert_eq!(none.formatted("4111111111111111"), "4111111111111111");
        assert_eq!(none.unformatted("4111111111111111"), "4111111111111111");
    }

    #[test]
    fn test_round_trip() {
        let f = formatter();
        for raw in ["4111111111111111", "378282246310005", "3", "00000", "62123456789012345"] {
            let display = f.formatted(raw);
            assert_eq!(f.unformatted(&display), raw);
            assert_eq!(f.formatted(&f.unformatted(&display)), display);
        }
    }

    #[test]
    fn test_apply_replacement_typing() {
        let f = formatter();
        let mut text = String::new();
        for digit in "4111111111111111".chars() {
            let len = text.chars().count();
            let edit = f
                .apply_replacement(&text, len..len, &digit.to_string())
                .unwrap();
            assert_eq!(edit.cursor, edit.text.chars().count());
            text = edit.text;
        }
        assert_eq!(text, "4111-1111-1111-1111");
    }

    #[test]
    fn test_apply_replacement_paste() {
        let f = formatter();
        let edit = f
            .apply_replacement("", 0..0, "4111-1111-1111-1111")
            .unwrap();
        assert_eq!(edit.text, "4111-1111-1111-1111");
        assert_eq!(edit.number.as_str(), "4111111111111111");
        assert_eq!(edit.cursor, 19);
    }

    #[test]
    fn test_apply_replacement_middle_insert_cursor() {
        let f = formatter();
        // Insert "9" after the first digit of "4111-1"
        let edit = f.apply_replacement("4111-1", 1..1, "9").unwrap();
        assert_eq!(edit.text, "4911-11");
        assert_eq!(edit.cursor, 2);

        // Insert at the end of the first group lands after the separator shift
        let edit = f.apply_replacement("4111-1111", 4..4, "2").unwrap();
        assert_eq!(edit.text, "4111-2111-1");
        assert_eq!(edit.cursor, 6);
    }

    #[test]
    fn test_apply_replacement_delete() {
        let f = formatter();
        let edit = f.apply_replacement("4111-1", 5..6, "").unwrap();
        assert_eq!(edit.text, "4111");
        assert_eq!(edit.cursor, 4);

        let edit = f.apply_replacement("4111-1111", 0..9, "").unwrap();
        assert_eq!(edit.text, "");
        assert_eq!(edit.cursor, 0);
        assert!(edit.number.is_empty());
    }

    #[test]
    fn test_apply_replacement_backspace_over_separator() {
        let f = formatter();
        let edit = f.apply_replacement("4111-1111", 4..5, "").unwrap();
        assert_eq!(edit.text, "4111-111");
        assert_eq!(edit.number.as_str(), "4111111");
        assert_eq!(edit.cursor, 3);
    }

    #[test]
    fn test_apply_replacement_rejects_non_digits() {
        let f = formatter();
        assert_eq!(
            f.apply_replacement("4111", 4..4, "1a").unwrap_err(),
            EditError::InvalidCharacter {
                position: 1,
                character: 'a'
            }
        );
        assert_eq!(
            f.apply_replacement("4111", 4..4, "1-2 3").unwrap_err(),
            EditError::InvalidCharacter {
                position: 3,
                character: ' '
            }
        );
    }

    #[test]
    fn test_apply_replacement_range_checks() {
        let f = formatter();
        assert_eq!(
            f.apply_replacement("4111", 3..9, "").unwrap_err(),
            EditError::RangeOutOfBounds {
                start: 3,
                end: 9,
                length: 4
            }
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 3..1;
        assert!(f.apply_replacement("4111", reversed, "").is_err());
    }

    #[test]
    fn test_format_placeholder() {
        let f = formatter();
        assert_eq!(f.format_placeholder("378282246310005"), "3782-822463-10005");
        assert_eq!(f.format_placeholder("4111-1111-1111-1111"), "4111-1111-1111-1111");
        assert_eq!(f.format_placeholder(""), "");
    }

    #[test]
    fn test_replacement_debug_is_masked() {
        let f = formatter();
        let edit = f.apply_replacement("", 0..0, "4111111111111111").unwrap();
        let debug = format!("{:?}", edit);
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("4111-1111"));
    }
}
