//! Card type lookup by issuer prefix.
//!
//! The registry holds an ordered list of [`CardTypeRule`]s. For a partial
//! number it reports every rule that could still apply (the candidates),
//! ranked by how specific their matching prefix is, and resolves the one
//! rule that governs length, checksum and grouping once the digits are
//! unambiguous.
//!
//! Matching is monotonic: appending digits can only remove candidates,
//! never add them.
//!
//! # Example
//!
//! ```
//! use card_input::CardTypeRegistry;
//!
//! let registry = CardTypeRegistry::default();
//!
//! // "3" could still be Amex, Diners Club or JCB
//! assert_eq!(registry.candidates("3").len(), 3);
//! assert!(registry.resolve("3").is_none());
//!
//! // "37" can only be Amex
//! assert_eq!(registry.resolve("37").unwrap().name(), "American Express");
//! ```

use crate::error::RuleError;
use crate::number::MAX_CARD_DIGITS;
use crate::rule::{CardTypeRule, PrefixMatch};

/// A rule matching a partial number, with the strength of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// The matching rule.
    pub rule: &'a CardTypeRule,
    /// The most specific prefix match.
    pub specificity: PrefixMatch,
}

/// Ordered set of card type rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTypeRegistry {
    rules: Vec<CardTypeRule>,
}

impl CardTypeRegistry {
    /// Creates a registry from custom rules, checking each of them.
    ///
    /// Registration order breaks ties between equally specific matches.
    pub fn new(rules: Vec<CardTypeRule>) -> Result<Self, RuleError> {
        let mut rules = rules;
        for rule in &mut rules {
            rule.check()?;
            rule.normalize();
        }
        tracing::debug!(rules = rules.len(), "card type registry built");
        Ok(Self { rules })
    }

    /// The registered rules in registration order.
    #[inline]
    pub fn rules(&self) -> &[CardTypeRule] {
        &self.rules
    }

    /// Looks up a rule by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&CardTypeRule> {
        self.rules.iter().find(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// All rules whose prefixes match `digits`, most specific first.
    pub fn candidates(&self, digits: &str) -> Vec<Candidate<'_>> {
        let mut found: Vec<Candidate<'_>> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.matches(digits)
                    .map(|specificity| Candidate { rule, specificity })
            })
            .collect();
        // Stable sort keeps registration order among equals.
        found.sort_by(|a, b| b.specificity.cmp(&a.specificity));
        found
    }

    /// The rule governing `digits`, if the digits are unambiguous.
    ///
    /// A rule governs when it is the only candidate left, or when it matches
    /// fully and every other candidate is a full match on a strictly shorter
    /// prefix (e.g. a 4-digit co-brand range inside a 2-digit range).
    pub fn resolve(&self, digits: &str) -> Option<&CardTypeRule> {
        let candidates = self.candidates(digits);
        let resolved = match candidates.as_slice() {
            [] => None,
            [only] => Some(only.rule),
            [first, rest @ ..] => match first.specificity {
                PrefixMatch::Full(k)
                    if rest.iter().all(|c| match c.specificity {
                        PrefixMatch::Full(j) => j < k,
                        PrefixMatch::Partial(_) => false,
                    }) =>
                {
                    Some(first.rule)
                }
                _ => None,
            },
        };
        tracing::trace!(
            digits = digits.len(),
            candidates = candidates.len(),
            resolved = ?resolved.map(|r| r.name()),
            "card type lookup"
        );
        resolved
    }

    /// Longest length any rule accepts, or [`MAX_CARD_DIGITS`] when empty.
    pub fn max_length(&self) -> usize {
        self.rules
            .iter()
            .map(|r| r.max_length())
            .max()
            .unwrap_or(MAX_CARD_DIGITS)
    }

    /// Longest length `digits` may still grow to.
    ///
    /// Uses the resolved rule when there is one, then the longest candidate,
    /// then the whole table.
    pub fn max_length_for(&self, digits: &str) -> usize {
        if let Some(rule) = self.resolve(digits) {
            return rule.max_length();
        }
        self.candidates(digits)
            .iter()
            .map(|c| c.rule.max_length())
            .max()
            .unwrap_or_else(|| self.max_length())
    }

    /// Loads a registry from a JSON array of rules.
    ///
    /// ```
    /// use card_input::CardTypeRegistry;
    ///
    /// let registry = CardTypeRegistry::from_json(r#"[
    ///     {"name": "Test", "prefixes": ["9"], "lengths": [8], "grouping": [4, 4]}
    /// ]"#).unwrap();
    /// assert_eq!(registry.resolve("9").unwrap().cvc_length(), 3);
    /// ```
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let rules: Vec<CardTypeRule> =
            serde_json::from_str(json).map_err(|e| RuleError::Parse(e.to_string()))?;
        Self::new(rules)
    }

    /// Loads a registry from a JSON rule table file.
    #[cfg(feature = "json")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes the rule table as pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, RuleError> {
        serde_json::to_string_pretty(&self.rules).map_err(|e| RuleError::Parse(e.to_string()))
    }
}

impl Default for CardTypeRegistry {
    /// The built-in issuer table.
    ///
    /// | Issuer | Prefix | Length | Grouping | CVC |
    /// |--------|--------|--------|----------|-----|
    /// | Visa | 4 | 13, 16 | 4-4-4-4 | 3 |
    /// | Mastercard | 51-55, 2221-2720 | 16 | 4-4-4-4 | 3 |
    /// | American Express | 34, 37 | 15 | 4-6-5 | 4 |
    /// | Diners Club | 300-305, 309, 36, 38-39 | 14 | 4-6-4 | 3 |
    /// | Discover | 6011, 644-649, 65 | 16 | 4-4-4-4 | 3 |
    /// | JCB | 3528-3589 | 16 | 4-4-4-4 | 3 |
    /// | UnionPay | 62 | 16-19 (no Luhn) | 4-4-4-4 | 3 |
    /// | Maestro | 5018, 5020, 5038, 5893, 6304, 6759, 6761-6763 | 12-19 | 4-4-4-4 | 3 |
    /// | Mir | 2200-2204 | 16 | 4-4-4-4 | 3 |
    fn default() -> Self {
        const QUADS: &[usize] = &[4, 4, 4, 4];

        let rules = vec![
            CardTypeRule::fixed("Visa", &[("4", "4")], &[13, 16], QUADS),
            CardTypeRule::fixed(
                "Mastercard",
                &[("51", "55"), ("2221", "2720")],
                &[16],
                QUADS,
            ),
            CardTypeRule::fixed("American Express", &[("34", "34"), ("37", "37")], &[15], &[4, 6, 5])
                .with_cvc_length(4),
            CardTypeRule::fixed(
                "Diners Club",
                &[("300", "305"), ("309", "309"), ("36", "36"), ("38", "39")],
                &[14],
                &[4, 6, 4],
            ),
            CardTypeRule::fixed(
                "Discover",
                &[("6011", "6011"), ("644", "649"), ("65", "65")],
                &[16],
                QUADS,
            ),
            CardTypeRule::fixed("JCB", &[("3528", "3589")], &[16], QUADS),
            CardTypeRule::fixed("UnionPay", &[("62", "62")], &[16, 17, 18, 19], QUADS)
                .with_luhn(false),
            CardTypeRule::fixed(
                "Maestro",
                &[
                    ("5018", "5018"),
                    ("5020", "5020"),
                    ("5038", "5038"),
                    ("5893", "5893"),
                    ("6304", "6304"),
                    ("6759", "6759"),
                    ("6761", "6763"),
                ],
                &[12, 13, 14, 15, 16, 17, 18, 19],
                QUADS,
            ),
            CardTypeRule::fixed("Mir", &[("2200", "2204")], &[16], QUADS),
        ];

        Self { rules }
    }
}
