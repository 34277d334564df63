//! Payment gateway boundary.
//!
//! Maps a [`Card`] onto the gateway's card shape and tokenization payload,
//! and defines the [`PaymentGateway`] trait a transport implements. The
//! crate itself performs no network I/O.
//!
//! # Example
//!
//! ```
//! use card_input::gateway::{
//!     tokenize_card, GatewayError, PaymentGateway, PaymentNonce, TokenizeOptions, TokenizeRequest,
//! };
//! use card_input::{Card, CardNumber, Cvc, Expiry};
//! use std::future::Future;
//!
//! struct Echo;
//!
//! impl PaymentGateway for Echo {
//!     fn tokenize(
//!         &self,
//!         request: TokenizeRequest,
//!     ) -> impl Future<Output = Result<PaymentNonce, GatewayError>> + Send {
//!         let last_four = request.credit_card.number[12..].to_string();
//!         async move {
//!             Ok(PaymentNonce {
//!                 nonce: "fake-valid-nonce".into(),
//!                 kind: "CreditCard".into(),
//!                 description: format!("ending in {}", last_four),
//!             })
//!         }
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let card = Card::new(
//!     CardNumber::parse("4111111111111111").unwrap(),
//!     Some(Expiry::new(12, 2030).unwrap()),
//!     Some(Cvc::parse("123").unwrap()),
//! );
//! let nonce = tokenize_card(&Echo, &card, None, TokenizeOptions::default()).await;
//! assert_eq!(nonce.unwrap().description, "ending in 1111");
//! # }
//! ```

use crate::card::Card;
use crate::cvc::Cvc;
use crate::expiry::Expiry;
use crate::number::CardNumber;
use std::fmt;
use std::future::Future;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The gateway's card shape: two-digit month and year strings.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct GatewayCard {
    /// Card number digits.
    pub number: String,
    /// Two-digit month, `"01"`-`"12"`, or empty.
    pub expiration_month: String,
    /// Two-digit year, or empty.
    pub expiration_year: String,
    /// Verification code, or empty.
    pub cvv: String,
}

impl GatewayCard {
    /// Maps back to a [`Card`].
    ///
    /// An expiry that does not parse becomes `None`, as does an empty or
    /// malformed code.
    pub fn to_card(&self) -> Card {
        let month = self.expiration_month.trim().parse::<u8>().ok();
        let year = self.expiration_year.trim().parse::<u16>().ok();
        let expiry = match (month, year) {
            (Some(month), Some(year)) => Expiry::new(month, year).ok(),
            _ => None,
        };
        Card::new(
            CardNumber::from_lossy(&self.number),
            expiry,
            Cvc::parse(&self.cvv).ok(),
        )
    }
}

impl From<&Card> for GatewayCard {
    fn from(card: &Card) -> Self {
        let (expiration_month, expiration_year) = match card.expiry() {
            Some(expiry) => (expiry.month_string(), expiry.year_string()),
            None => (String::new(), String::new()),
        };
        Self {
            number: card.number().as_str().to_string(),
            expiration_month,
            expiration_year,
            cvv: card.cvc().map(|c| c.as_str().to_string()).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for GatewayCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCard")
            .field("number", &CardNumber::from_lossy(&self.number))
            .field("expiration_month", &self.expiration_month)
            .field("expiration_year", &self.expiration_year)
            .field("cvv", &"***")
            .finish()
    }
}

/// Tokenization flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Zeroize)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenizeOptions {
    /// Ask the gateway to verify the card with the issuer.
    pub validate: bool,
}

/// Billing address fields sent for address verification.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct BillingAddress {
    /// Postal code.
    pub postal_code: String,
}

/// The card part of a tokenization request.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct CreditCardRequest {
    /// Card number digits.
    pub number: String,
    /// Expiry as `MM/YY`.
    pub expiration_date: String,
    /// Verification code, or empty.
    pub cvv: String,
    /// Billing address, when a postal code was given.
    #[cfg_attr(
        feature = "json",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub billing_address: Option<BillingAddress>,
    /// Tokenization flags.
    pub options: TokenizeOptions,
}

impl fmt::Debug for CreditCardRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCardRequest")
            .field("number", &CardNumber::from_lossy(&self.number))
            .field("expiration_date", &self.expiration_date)
            .field("cvv", &"***")
            .field("billing_address", &self.billing_address)
            .field("options", &self.options)
            .finish()
    }
}

/// A tokenization request as sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenizeRequest {
    /// The card payload.
    pub credit_card: CreditCardRequest,
}

impl TokenizeRequest {
    /// Builds the request for `card`.
    ///
    /// An empty postal code is treated as absent. Fails when the card has
    /// no expiry date.
    pub fn from_card(
        card: &Card,
        postal_code: Option<&str>,
        options: TokenizeOptions,
    ) -> Result<Self, GatewayError> {
        let expiry = card
            .expiry()
            .ok_or(GatewayError::IncompleteCard("expiry date"))?;
        let billing_address = postal_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| BillingAddress {
                postal_code: code.to_string(),
            });
        Ok(Self {
            credit_card: CreditCardRequest {
                number: card.number().as_str().to_string(),
                expiration_date: expiry.to_string(),
                cvv: card.cvc().map(|c| c.as_str().to_string()).unwrap_or_default(),
                billing_address,
                options,
            },
        })
    }

    /// Serializes the request body.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, GatewayError> {
        serde_json::to_string(self).map_err(|e| GatewayError::Network(e.to_string()))
    }
}

/// A tokenized payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct PaymentNonce {
    /// The one-time token.
    pub nonce: String,
    /// Payment method type, e.g. `"CreditCard"`.
    #[cfg_attr(feature = "json", serde(rename = "type"))]
    pub kind: String,
    /// Human-readable description, e.g. `"ending in 11"`.
    #[cfg_attr(feature = "json", serde(default))]
    pub description: String,
}

/// Errors from tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request could not be delivered.
    Network(String),
    /// The gateway declined the request.
    Rejected {
        /// Gateway error code.
        code: String,
        /// Gateway error message.
        message: String,
    },
    /// The gateway returned neither an error nor a nonce.
    MissingNonce,
    /// The card lacks a part the request needs.
    IncompleteCard(&'static str),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "gateway unreachable: {}", msg),
            Self::Rejected { code, message } => {
                write!(f, "gateway rejected the card ({}): {}", code, message)
            }
            Self::MissingNonce => write!(f, "gateway returned neither an error nor a nonce"),
            Self::IncompleteCard(part) => write!(f, "card is missing its {}", part),
        }
    }
}

impl std::error::Error for GatewayError {}

/// A transport that exchanges a card for a payment nonce.
pub trait PaymentGateway {
    /// Sends one tokenization request.
    fn tokenize(
        &self,
        request: TokenizeRequest,
    ) -> impl Future<Output = Result<PaymentNonce, GatewayError>> + Send;
}

/// Tokenizes `card` through `gateway`.
///
/// Sends exactly one request; an empty nonce is reported as
/// [`GatewayError::MissingNonce`].
pub async fn tokenize_card<G: PaymentGateway>(
    gateway: &G,
    card: &Card,
    postal_code: Option<&str>,
    options: TokenizeOptions,
) -> Result<PaymentNonce, GatewayError> {
    let request = TokenizeRequest::from_card(card, postal_code, options)?;
    tracing::debug!(
        digits = card.number().len(),
        has_postal_code = request.credit_card.billing_address.is_some(),
        validate = options.validate,
        "tokenizing card"
    );

    let nonce = match gateway.tokenize(request).await {
        Ok(nonce) => nonce,
        Err(err) => {
            tracing::warn!(error = %err, "tokenization failed");
            return Err(err);
        }
    };

    if nonce.nonce.is_empty() {
        tracing::warn!("gateway returned neither an error nor a nonce");
        return Err(GatewayError::MissingNonce);
    }

    tracing::debug!(kind = %nonce.kind, "card tokenized");
    Ok(nonce)
}
