//! The card number entry state machine.
//!
//! [`NumberInput`] owns the display text of a card number field. Every
//! keystroke, paste or deletion arrives as a `(range, replacement)` edit.
//! The edit is either rejected, leaving everything as it was, or accepted:
//! the text is reformatted, the number reclassified and the resulting
//! [`Signal`]s returned to the host.
//!
//! # Example
//!
//! ```
//! use card_input::{InputState, NumberInput, Signal};
//!
//! let mut input = NumberInput::default();
//!
//! for digit in "411111111111111".chars() {
//!     input.insert_str(&digit.to_string());
//! }
//! assert_eq!(input.state(), InputState::PartiallyValid);
//!
//! let outcome = input.insert_str("1");
//! assert_eq!(input.text(), "4111-1111-1111-1111");
//! assert_eq!(input.state(), InputState::Valid);
//! assert!(outcome.signals.contains(&Signal::Completed));
//!
//! // A 17th digit is refused
//! let outcome = input.insert_str("1");
//! assert!(!outcome.accepted);
//! assert_eq!(input.text(), "4111-1111-1111-1111");
//! ```

use crate::error::{EditError, SeparatorError};
use crate::format::CardNumberFormatter;
use crate::number::CardNumber;
use crate::registry::CardTypeRegistry;
use crate::rule::CardTypeRule;
use crate::validate::{ValidationIssue, ValidationResult};
use std::fmt;
use std::ops::Range;

/// Where the entered number stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum InputState {
    /// No digits.
    #[default]
    Empty,
    /// More digits may still make the number valid.
    PartiallyValid,
    /// Complete and valid for its card type.
    Valid,
    /// Longer than the card type allows.
    TooLong,
    /// No further digits can make the number valid.
    InvalidFormat,
}

impl InputState {
    /// Derives the state of `number` from its classification.
    pub fn classify(
        registry: &CardTypeRegistry,
        number: &CardNumber,
        validation: ValidationResult,
    ) -> Self {
        if number.is_empty() {
            Self::Empty
        } else if validation.is_valid() {
            Self::Valid
        } else if validation.contains(ValidationIssue::NumberTooLong) {
            Self::TooLong
        } else if validation.contains(ValidationIssue::InvalidFormat)
            || number.len() >= registry.max_length_for(number.as_str())
        {
            Self::InvalidFormat
        } else {
            Self::PartiallyValid
        }
    }

    /// Returns a short name for the state.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::PartiallyValid => "partially valid",
            Self::Valid => "valid",
            Self::TooLong => "too long",
            Self::InvalidFormat => "invalid format",
        }
    }
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification for the host, in emission order.
#[derive(Clone, PartialEq, Eq)]
pub enum Signal {
    /// The display text changed to the contained value.
    TextChanged(String),
    /// The number is complete and valid.
    Completed,
    /// The number reached its maximum length without being valid.
    InvalidTerminalInput,
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Display text carries the full number
            Self::TextChanged(text) => write!(f, "TextChanged(<{} chars>)", text.chars().count()),
            Self::Completed => f.write_str("Completed"),
            Self::InvalidTerminalInput => f.write_str("InvalidTerminalInput"),
        }
    }
}

/// Why an edit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The edit itself was malformed.
    Edit(EditError),
    /// The resulting number would be too long.
    TooLong,
    /// A pre-filled number would not be usable in this state.
    Unusable(InputState),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit(err) => write!(f, "{}", err),
            Self::TooLong => write!(f, "number would be too long"),
            Self::Unusable(state) => write!(f, "pre-filled number is {}", state),
        }
    }
}

/// What happened to one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Whether the edit was applied.
    pub accepted: bool,
    /// The reason a refused edit was refused.
    pub rejection: Option<Rejection>,
    /// Classification of the proposed number (the current one if the edit
    /// could not be applied at all).
    pub validation: ValidationResult,
    /// State after the edit.
    pub state: InputState,
    /// Cursor offset (chars) after the edit.
    pub cursor: usize,
    /// Signals for the host, in order.
    pub signals: Vec<Signal>,
}

/// Card number field state.
#[derive(Clone)]
pub struct NumberInput {
    formatter: CardNumberFormatter,
    text: String,
    number: CardNumber,
    validation: ValidationResult,
    state: InputState,
}

impl NumberInput {
    /// Creates an empty field using `formatter`.
    pub fn new(formatter: CardNumberFormatter) -> Self {
        Self {
            formatter,
            text: String::new(),
            number: CardNumber::default(),
            validation: ValidationIssue::NumberTooShort.into(),
            state: InputState::Empty,
        }
    }

    /// The current display text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current raw number.
    #[inline]
    pub fn number(&self) -> &CardNumber {
        &self.number
    }

    /// The current state.
    #[inline]
    pub fn state(&self) -> InputState {
        self.state
    }

    /// Classification of the current number.
    #[inline]
    pub fn validation(&self) -> ValidationResult {
        self.validation
    }

    /// The formatter in use.
    #[inline]
    pub fn formatter(&self) -> &CardNumberFormatter {
        &self.formatter
    }

    /// The card type governing the current number, if settled.
    pub fn card_type(&self) -> Option<&CardTypeRule> {
        self.formatter.registry().resolve(self.number.as_str())
    }

    /// Placeholder text for the field, formatted like a number.
    pub fn placeholder(&self, text: &str) -> String {
        self.formatter.format_placeholder(text)
    }

    /// Applies an edit to the display text.
    ///
    /// - Malformed edits (non-digits, bad range) are refused silently.
    /// - Edits that would make the number too long are refused; if the
    ///   number was valid before, `Completed` is sent again.
    /// - Accepted edits send `TextChanged`, then `Completed` when the number
    ///   became valid or `InvalidTerminalInput` when it reached its maximum
    ///   length without being valid.
    pub fn apply_edit(&mut self, range: Range<usize>, replacement: &str) -> EditOutcome {
        let cursor = range.start.min(self.text.chars().count());

        let proposed = match self
            .formatter
            .apply_replacement(&self.text, range, replacement)
        {
            Ok(proposed) => proposed,
            Err(err) => {
                tracing::debug!(error = %err, state = %self.state, "edit refused");
                return self.refused(Rejection::Edit(err), self.validation, cursor, Vec::new());
            }
        };

        let registry = self.formatter.registry();
        let validation = registry.validate(&proposed.number);

        if validation.contains(ValidationIssue::NumberTooLong) {
            let signals = if self.state == InputState::Valid {
                vec![Signal::Completed]
            } else {
                Vec::new()
            };
            tracing::debug!(
                length = proposed.number.len(),
                state = %self.state,
                "edit refused: number too long"
            );
            return self.refused(Rejection::TooLong, validation, cursor, signals);
        }

        let state = InputState::classify(registry, &proposed.number, validation);
        let max_length = registry.max_length_for(proposed.number.as_str());
        let length = proposed.number.len();

        let mut signals = vec![Signal::TextChanged(proposed.text.clone())];
        if state == InputState::Valid {
            signals.push(Signal::Completed);
        } else if length > 0 && length == max_length {
            signals.push(Signal::InvalidTerminalInput);
        }

        tracing::debug!(
            length,
            from = %self.state,
            to = %state,
            "edit applied"
        );

        self.text = proposed.text;
        self.number = proposed.number;
        self.validation = validation;
        self.state = state;

        EditOutcome {
            accepted: true,
            rejection: None,
            validation,
            state,
            cursor: proposed.cursor,
            signals,
        }
    }

    /// Types `text` at the end of the field.
    pub fn insert_str(&mut self, text: &str) -> EditOutcome {
        let end = self.text.chars().count();
        self.apply_edit(end..end, text)
    }

    /// Deletes the last character, as a backspace at the end would.
    ///
    /// Does nothing on an empty field.
    pub fn delete_backward(&mut self) -> EditOutcome {
        let end = self.text.chars().count();
        if end == 0 {
            return EditOutcome {
                accepted: false,
                rejection: None,
                validation: self.validation,
                state: self.state,
                cursor: 0,
                signals: Vec::new(),
            };
        }
        self.apply_edit(end - 1..end, "")
    }

    /// Removes all text.
    pub fn clear(&mut self) -> EditOutcome {
        let end = self.text.chars().count();
        self.apply_edit(0..end, "")
    }

    /// Switches the separator and reformats the current text.
    pub fn set_separator(&mut self, separator: &str) -> Result<(), SeparatorError> {
        self.formatter = self.formatter.with_separator(separator)?;
        self.text = self.formatter.formatted(self.number.as_str());
        tracing::debug!(separator_len = separator.len(), "separator changed");
        Ok(())
    }

    /// Fills the field from a scanned or stored number.
    ///
    /// Non-digits are dropped. The number is taken only when it is valid or
    /// could still become valid; otherwise the field is left unchanged.
    pub fn prefill(&mut self, raw: &str) -> EditOutcome {
        let number = CardNumber::from_lossy(raw);
        let registry = self.formatter.registry();
        let validation = registry.validate(&number);
        let state = InputState::classify(registry, &number, validation);

        if !matches!(state, InputState::PartiallyValid | InputState::Valid) {
            tracing::debug!(length = number.len(), state = %state, "prefill refused");
            let rejection = if state == InputState::TooLong {
                Rejection::TooLong
            } else {
                Rejection::Unusable(state)
            };
            let cursor = self.text.chars().count();
            return self.refused(rejection, validation, cursor, Vec::new());
        }

        let text = self.formatter.formatted(number.as_str());
        let cursor = text.chars().count();
        tracing::debug!(length = number.len(), state = %state, "prefilled");

        self.text = text;
        self.number = number;
        self.validation = validation;
        self.state = state;

        EditOutcome {
            accepted: true,
            rejection: None,
            validation,
            state,
            cursor,
            signals: vec![Signal::TextChanged(self.text.clone())],
        }
    }

    fn refused(
        &self,
        rejection: Rejection,
        validation: ValidationResult,
        cursor: usize,
        signals: Vec<Signal>,
    ) -> EditOutcome {
        EditOutcome {
            accepted: false,
            rejection: Some(rejection),
            validation,
            state: self.state,
            cursor,
            signals,
        }
    }
}

impl fmt::Debug for NumberInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberInput")
            .field("number", &self.number)
            .field("state", &self.state)
            .field("validation", &self.validation)
            .field("separator", &self.formatter.separator())
            .finish()
    }
}

impl Default for NumberInput {
    fn default() -> Self {
        Self::new(CardNumberFormatter::default())
    }
}
