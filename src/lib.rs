//! # card_input
//!
//! Incremental credit card number entry for Rust.
//!
//! ## Features
//!
//! - Formatting as the user types (`4111-1111-1111-1111`, `3782-822463-10005`)
//! - Issuer detection from partial numbers with a data-driven rule table
//! - Validation state machine with host signals (text changed, completed)
//! - Expiry and CVC checks for whole cards
//! - Gateway boundary for card tokenization
//!
//! ## Quick Start
//!
//! ```rust
//! use card_input::{InputState, NumberInput, Signal};
//!
//! let mut input = NumberInput::default();
//!
//! // Paste a formatted number
//! let outcome = input.insert_str("4111 1111");
//! assert!(!outcome.accepted); // spaces are not the separator
//!
//! let outcome = input.insert_str("4111-1111-1111-1111");
//! assert!(outcome.accepted);
//! assert_eq!(input.state(), InputState::Valid);
//! assert_eq!(input.card_type().unwrap().name(), "Visa");
//! assert!(outcome.signals.contains(&Signal::Completed));
//!
//! // Safe for logging - never exposes the full number
//! assert_eq!(input.number().to_string(), "************1111");
//! ```
//!
//! ## Formatting
//!
//! ```rust
//! use card_input::CardNumberFormatter;
//!
//! let formatter = CardNumberFormatter::default();
//!
//! // Grouping follows the card type
//! assert_eq!(formatter.formatted("378282246310005"), "3782-822463-10005");
//!
//! // Apply a keystroke at the end of the text
//! let edit = formatter.apply_replacement("4111", 4..4, "2").unwrap();
//! assert_eq!(edit.text, "4111-2");
//! assert_eq!(edit.cursor, 6);
//! ```
//!
//! ## Validation
//!
//! ```rust
//! use card_input::{CardNumber, CardTypeRegistry, ValidationIssue};
//!
//! let registry = CardTypeRegistry::default();
//!
//! let result = registry.validate(&CardNumber::parse("4111111111111112").unwrap());
//! assert!(result.contains(ValidationIssue::InvalidLuhnChecksum));
//!
//! // "3" could be Amex, Diners Club or JCB
//! let result = registry.validate(&CardNumber::parse("3").unwrap());
//! assert!(result.contains(ValidationIssue::AmbiguousType));
//! ```
//!
//! ## Whole Cards
//!
//! ```rust
//! use card_input::{Card, CardNumber, CardTypeRegistry, Cvc, Expiry};
//!
//! let card = Card::new(
//!     CardNumber::parse("378282246310005").unwrap(),
//!     Some(Expiry::parse("12/99").unwrap()),
//!     Some(Cvc::parse("1234").unwrap()),
//! );
//! assert!(card.validate(&CardTypeRegistry::default()).is_ok());
//! ```
//!
//! ## Supported Card Types
//!
//! | Card Type | Prefix | Length | CVC |
//! |-------|--------|--------|-----|
//! | Visa | 4 | 13, 16 | 3 |
//! | Mastercard | 51-55, 2221-2720 | 16 | 3 |
//! | American Express | 34, 37 | 15 | 4 |
//! | Diners Club | 300-305, 309, 36, 38-39 | 14 | 3 |
//! | Discover | 6011, 644-649, 65 | 16 | 3 |
//! | JCB | 3528-3589 | 16 | 3 |
//! | UnionPay | 62 | 16-19 (no Luhn) | 3 |
//! | Maestro | 5018, 5020, 5038, 5893, 6304, 6759, 6761-6763 | 12-19 | 3 |
//! | Mir | 2200-2204 | 16 | 3 |
//!
//! Custom tables load from JSON with [`CardTypeRegistry::from_json`].
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `json` | JSON rule tables, config files and gateway payloads (default) |
//! | `cli` | Command-line tool |
//!
//! ## Security
//!
//! - Card numbers and codes are zeroized on drop
//! - `Debug` and `Display` show masked numbers only
//! - Log events carry lengths and states, never digits
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod card;
pub mod config;
pub mod cvc;
pub mod error;
pub mod expiry;
pub mod flash;
pub mod format;
pub mod gateway;
pub mod input;
pub mod luhn;
pub mod number;
pub mod registry;
pub mod rule;
pub mod validate;

// Re-export main types at crate root
pub use card::{Card, CardError, ScannedCard};
pub use config::InputConfig;
pub use cvc::{Cvc, CvcError};
pub use error::{ConfigError, EditError, RuleError, SeparatorError};
pub use expiry::{Expiry, ExpiryError};
pub use flash::{FlashTicket, InvalidFlash};
pub use format::{CardNumberFormatter, Replacement};
pub use input::{EditOutcome, InputState, NumberInput, Rejection, Signal};
pub use number::{CardNumber, MAX_CARD_DIGITS, MIN_CARD_DIGITS};
pub use registry::{Candidate, CardTypeRegistry};
pub use rule::{CardTypeRule, PrefixMatch, PrefixRange};
pub use validate::{ValidationIssue, ValidationResult};

#[cfg(test)]
mod tests {
    use super::*;

    // Standard test card numbers from payment processors
    const VISA_16: &str = "4111111111111111";
    const VISA_13: &str = "4222222222222";
    const MASTERCARD: &str = "5500000000000004";
    const MASTERCARD_2: &str = "5105105105105100";
    const MASTERCARD_2_SERIES: &str = "2223000048400011";
    const AMEX: &str = "378282246310005";
    const AMEX_2: &str = "371449635398431";
    const DISCOVER: &str = "6011111111111117";
    const DINERS: &str = "30569309025904";
    const JCB: &str = "3530111333300000";

    fn card_type(number: &str) -> Option<String> {
        CardTypeRegistry::default()
            .resolve(number)
            .map(|r| r.name().to_string())
    }

    fn is_valid(number: &str) -> bool {
        CardTypeRegistry::default()
            .validate(&CardNumber::parse(number).unwrap())
            .is_valid()
    }

    #[test]
    fn test_card_types() {
        for (number, expected) in [
            (VISA_16, "Visa"),
            (VISA_13, "Visa"),
            (MASTERCARD, "Mastercard"),
            (MASTERCARD_2, "Mastercard"),
            (MASTERCARD_2_SERIES, "Mastercard"),
            (AMEX, "American Express"),
            (AMEX_2, "American Express"),
            (DISCOVER, "Discover"),
            (DINERS, "Diners Club"),
            (JCB, "JCB"),
        ] {
            assert_eq!(card_type(number).as_deref(), Some(expected), "{}", number);
            assert!(is_valid(number), "{} should be valid", number);
        }
    }

    #[test]
    fn test_typing_each_test_card_completes_once() {
        for number in [VISA_16, MASTERCARD, AMEX, DISCOVER, DINERS, JCB] {
            let mut input = NumberInput::default();
            let mut completed = 0;
            for digit in number.chars() {
                let outcome = input.insert_str(&digit.to_string());
                assert!(outcome.accepted, "{} refused a digit", number);
                completed += outcome
                    .signals
                    .iter()
                    .filter(|s| **s == Signal::Completed)
                    .count();
            }
            assert_eq!(input.state(), InputState::Valid, "{}", number);
            assert_eq!(completed, 1, "{}", number);
            assert_eq!(input.formatter().unformatted(input.text()), number);
        }
    }

    #[test]
    fn test_all_zeros_never_valid() {
        let mut input = NumberInput::default();
        for _ in 0..MAX_CARD_DIGITS + 2 {
            input.insert_str("0");
            assert_ne!(input.state(), InputState::Valid);
        }
    }

    #[test]
    fn test_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CardTypeRegistry>();
        assert_send_sync::<CardNumberFormatter>();
        assert_send_sync::<NumberInput>();
        assert_send_sync::<Card>();
        assert_send_sync::<ValidationResult>();
        assert_send_sync::<InvalidFlash<String>>();
    }
}
