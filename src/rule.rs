//! Card type rules: issuer prefixes, accepted lengths and display grouping.
//!
//! A rule describes one card network. Rules are plain data and can be
//! loaded from a JSON rule table (see [`CardTypeRegistry`](crate::CardTypeRegistry)).

use crate::error::RuleError;
use std::fmt;
use std::str::FromStr;

/// Default CVC length for rules that do not specify one.
pub const DEFAULT_CVC_LENGTH: usize = 3;

/// How strongly a (partial) number matches a prefix.
///
/// Ordered by specificity: every `Full` match outranks every `Partial`
/// match, and within each kind a longer prefix wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrefixMatch {
    /// The number is shorter than the prefix but can still grow into it.
    Partial(usize),
    /// The first `n` digits fall inside the range.
    Full(usize),
}

impl PrefixMatch {
    /// Length of the prefix that produced this match.
    #[inline]
    pub const fn prefix_len(&self) -> usize {
        match self {
            Self::Partial(n) | Self::Full(n) => *n,
        }
    }

    /// Returns true for a full match.
    #[inline]
    pub const fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

/// An inclusive range of issuer prefixes of one fixed length.
///
/// Written as `"4"` for a single prefix or `"51-55"` for a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct PrefixRange {
    start: String,
    end: String,
}

impl PrefixRange {
    /// Builds a range from two digit strings of equal length.
    pub fn new(start: &str, end: &str) -> Option<Self> {
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(start) || !digits(end) || start.len() != end.len() || start > end {
            return None;
        }
        Some(Self {
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    /// Built-in table entries, known to be well formed.
    pub(crate) fn fixed(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Number of digits in the prefix.
    #[inline]
    pub fn len(&self) -> usize {
        self.start.len()
    }

    /// Always false: a prefix range has at least one digit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    /// Matches a raw digit string against the range.
    ///
    /// Shorter input matches partially when some number in the range starts
    /// with it; the truncated bounds of a contiguous range are themselves a
    /// contiguous range, so a lexicographic comparison is enough.
    pub fn matches(&self, digits: &str) -> Option<PrefixMatch> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let k = self.len();
        let n = digits.len();
        if n >= k {
            let head = &digits[..k];
            (head >= self.start.as_str() && head <= self.end.as_str()).then_some(PrefixMatch::Full(k))
        } else {
            (digits >= &self.start[..n] && digits <= &self.end[..n]).then_some(PrefixMatch::Partial(k))
        }
    }
}

impl fmt::Display for PrefixRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PrefixRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once('-').unwrap_or((s, s));
        Self::new(start.trim(), end.trim()).ok_or_else(|| s.to_string())
    }
}

impl TryFrom<String> for PrefixRange {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PrefixRange> for String {
    fn from(range: PrefixRange) -> Self {
        range.to_string()
    }
}

/// A named issuer pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct CardTypeRule {
    name: String,
    prefixes: Vec<PrefixRange>,
    lengths: Vec<usize>,
    grouping: Vec<usize>,
    #[cfg_attr(feature = "json", serde(default = "default_cvc_length"))]
    cvc_length: usize,
    #[cfg_attr(feature = "json", serde(default = "default_luhn"))]
    luhn: bool,
}

#[cfg(feature = "json")]
fn default_cvc_length() -> usize {
    DEFAULT_CVC_LENGTH
}

#[cfg(feature = "json")]
fn default_luhn() -> bool {
    true
}

impl CardTypeRule {
    /// Creates a rule, checking its prefixes, lengths and grouping.
    ///
    /// # Example
    ///
    /// ```
    /// use card_input::CardTypeRule;
    ///
    /// let rule = CardTypeRule::new("Visa", &["4"], &[13, 16], &[4, 4, 4, 4]).unwrap();
    /// assert_eq!(rule.max_length(), 16);
    /// assert!(CardTypeRule::new("Broken", &["5x"], &[16], &[4]).is_err());
    /// ```
    pub fn new(
        name: &str,
        prefixes: &[&str],
        lengths: &[usize],
        grouping: &[usize],
    ) -> Result<Self, RuleError> {
        let prefixes = prefixes
            .iter()
            .map(|p| {
                p.parse::<PrefixRange>().map_err(|_| RuleError::InvalidPrefix {
                    rule: name.to_string(),
                    prefix: p.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rule = Self {
            name: name.to_string(),
            prefixes,
            lengths: lengths.to_vec(),
            grouping: grouping.to_vec(),
            cvc_length: DEFAULT_CVC_LENGTH,
            luhn: true,
        };
        rule.check()?;
        rule.normalize();
        Ok(rule)
    }

    /// Sets the CVC length (4 for American Express).
    pub fn with_cvc_length(mut self, cvc_length: usize) -> Self {
        self.cvc_length = cvc_length;
        self
    }

    /// Sets whether complete numbers must pass the Luhn check.
    pub fn with_luhn(mut self, luhn: bool) -> Self {
        self.luhn = luhn;
        self
    }

    pub(crate) fn fixed(
        name: &str,
        prefixes: &[(&str, &str)],
        lengths: &[usize],
        grouping: &[usize],
    ) -> Self {
        Self {
            name: name.to_string(),
            prefixes: prefixes
                .iter()
                .map(|(start, end)| PrefixRange::fixed(start, end))
                .collect(),
            lengths: lengths.to_vec(),
            grouping: grouping.to_vec(),
            cvc_length: DEFAULT_CVC_LENGTH,
            luhn: true,
        }
    }

    /// Checks a rule built from untrusted data (e.g. a JSON table).
    pub(crate) fn check(&self) -> Result<(), RuleError> {
        if self.name.trim().is_empty() {
            return Err(RuleError::EmptyName);
        }
        if self.prefixes.is_empty() {
            return Err(RuleError::InvalidPrefix {
                rule: self.name.clone(),
                prefix: String::new(),
            });
        }
        if self.lengths.is_empty() {
            return Err(RuleError::NoLengths {
                rule: self.name.clone(),
            });
        }
        if self.lengths.contains(&0) {
            return Err(RuleError::ZeroLength {
                rule: self.name.clone(),
            });
        }
        if self.grouping.contains(&0) {
            return Err(RuleError::ZeroGroup {
                rule: self.name.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn normalize(&mut self) {
        self.lengths.sort_unstable();
        self.lengths.dedup();
    }

    /// Issuer name, e.g. "Visa".
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix ranges identifying this issuer.
    #[inline]
    pub fn prefixes(&self) -> &[PrefixRange] {
        &self.prefixes
    }

    /// Accepted number lengths, ascending.
    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Display group sizes.
    #[inline]
    pub fn grouping(&self) -> &[usize] {
        &self.grouping
    }

    /// Expected CVC length.
    #[inline]
    pub fn cvc_length(&self) -> usize {
        self.cvc_length
    }

    /// Whether complete numbers must pass the Luhn check.
    #[inline]
    pub fn requires_luhn(&self) -> bool {
        self.luhn
    }

    /// Shortest accepted length.
    #[inline]
    pub fn min_length(&self) -> usize {
        self.lengths.first().copied().unwrap_or(0)
    }

    /// Longest accepted length.
    #[inline]
    pub fn max_length(&self) -> usize {
        self.lengths.last().copied().unwrap_or(0)
    }

    /// Returns true if `length` is one of the accepted lengths.
    #[inline]
    pub fn accepts_length(&self, length: usize) -> bool {
        self.lengths.binary_search(&length).is_ok()
    }

    /// The most specific match among this rule's prefixes.
    pub fn matches(&self, digits: &str) -> Option<PrefixMatch> {
        self.prefixes.iter().filter_map(|p| p.matches(digits)).max()
    }
}

impl fmt::Display for CardTypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
