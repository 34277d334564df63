//! A complete card: number, expiry and verification code.
//!
//! Cards are assembled either from the entry fields or from a card
//! scanner's [`ScannedCard`], then checked as a whole before they are
//! handed to a payment gateway.

use crate::cvc::{Cvc, CvcError};
use crate::expiry::{Expiry, ExpiryError};
use crate::number::CardNumber;
use crate::registry::CardTypeRegistry;
use crate::validate::{ValidationIssue, ValidationResult};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// What a card scanner reports.
///
/// Any field may be missing; the number may contain spaces.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannedCard {
    /// The card number as read.
    pub number: String,
    /// Expiry month (1-12), if read.
    pub expiry_month: Option<u8>,
    /// Expiry year, two or four digits, if read.
    pub expiry_year: Option<u16>,
    /// Verification code, if read.
    pub cvc: Option<String>,
}

impl fmt::Debug for ScannedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannedCard")
            .field("number", &CardNumber::from_lossy(&self.number))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvc", &self.cvc.as_ref().map(|_| "***"))
            .finish()
    }
}

/// A card ready for validation and tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    number: CardNumber,
    expiry: Option<Expiry>,
    cvc: Option<Cvc>,
}

impl Card {
    /// Assembles a card from its parts.
    pub fn new(number: CardNumber, expiry: Option<Expiry>, cvc: Option<Cvc>) -> Self {
        Self {
            number,
            expiry,
            cvc,
        }
    }

    /// Builds a card from scanner output.
    ///
    /// Missing or unreadable expiry and code parts are left empty.
    ///
    /// ```
    /// use card_input::{Card, ScannedCard};
    ///
    /// let scan = ScannedCard {
    ///     number: "4111 1111 1111 1111".into(),
    ///     expiry_month: Some(9),
    ///     expiry_year: Some(31),
    ///     cvc: None,
    /// };
    /// let card = Card::from_scan(&scan);
    /// assert_eq!(card.number().as_str(), "4111111111111111");
    /// assert_eq!(card.expiry().unwrap().to_string(), "09/31");
    /// assert!(card.cvc().is_none());
    /// ```
    pub fn from_scan(scan: &ScannedCard) -> Self {
        let expiry = match (scan.expiry_month, scan.expiry_year) {
            (Some(month), Some(year)) => Expiry::new(month, year).ok(),
            _ => None,
        };
        let cvc = scan.cvc.as_deref().and_then(|c| Cvc::parse(c).ok());
        Self {
            number: CardNumber::from_lossy(&scan.number),
            expiry,
            cvc,
        }
    }

    /// The card number.
    #[inline]
    pub fn number(&self) -> &CardNumber {
        &self.number
    }

    /// The expiry date, if known.
    #[inline]
    pub fn expiry(&self) -> Option<Expiry> {
        self.expiry
    }

    /// The verification code, if known.
    #[inline]
    pub fn cvc(&self) -> Option<&Cvc> {
        self.cvc.as_ref()
    }

    /// Checks the card as a whole.
    ///
    /// The number must be valid, the expiry present and not past, and the
    /// code length must match the card type.
    pub fn validate(&self, registry: &CardTypeRegistry) -> Result<(), CardError> {
        let result = registry.validate(&self.number);
        if !result.is_valid() {
            return Err(CardError::Number(result));
        }
        let Some(rule) = registry.resolve(self.number.as_str()) else {
            return Err(CardError::Number(ValidationIssue::AmbiguousType.into()));
        };

        let expiry = self.expiry.ok_or(CardError::MissingExpiry)?;
        if expiry.is_expired() {
            return Err(CardError::Expiry(ExpiryError::Expired {
                month: expiry.month(),
                year: expiry.year(),
            }));
        }

        let cvc = self.cvc.as_ref().ok_or(CardError::MissingCvc)?;
        cvc.validate_for(rule).map_err(CardError::Cvc)?;

        tracing::debug!(card_type = rule.name(), "card validated");
        Ok(())
    }
}

/// Reasons a card is not usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// The number is not valid.
    Number(ValidationResult),
    /// No expiry date.
    MissingExpiry,
    /// The expiry date is not acceptable.
    Expiry(ExpiryError),
    /// No verification code.
    MissingCvc,
    /// The verification code is not acceptable.
    Cvc(CvcError),
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(result) => write!(f, "invalid card number: {}", result),
            Self::MissingExpiry => write!(f, "expiry date is missing"),
            Self::Expiry(err) => write!(f, "{}", err),
            Self::MissingCvc => write!(f, "CVC is missing"),
            Self::Cvc(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Expiry(err) => Some(err),
            Self::Cvc(err) => Some(err),
            _ => None,
        }
    }
}
