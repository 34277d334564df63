//! Integration tests for card_input.
//!
//! These tests drive the public API the way a text field host would:
//! keystrokes, pastes, deletions and full card submission.

use card_input::gateway::{
    tokenize_card, GatewayCard, GatewayError, PaymentGateway, PaymentNonce, TokenizeOptions,
    TokenizeRequest,
};
use card_input::{
    Card, CardNumber, CardNumberFormatter, CardTypeRegistry, CardTypeRule, Cvc, Expiry,
    InputConfig, InputState, InvalidFlash, NumberInput, Rejection, ScannedCard, Signal,
    ValidationIssue,
};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// REAL-WORLD TEST CARD NUMBERS
// =============================================================================
// Official test card numbers from payment processors.
// They pass Luhn validation but are not real cards.

mod test_cards {
    pub const VISA_1: &str = "4111111111111111";
    pub const VISA_2: &str = "4012888888881881";
    pub const VISA_13: &str = "4222222222222";
    pub const VISA_3: &str = "4242424242424242";

    pub const MC_1: &str = "5555555555554444";
    pub const MC_2: &str = "5105105105105100";
    pub const MC_2SERIES: &str = "2223520043560014";

    pub const AMEX_1: &str = "378282246310005";
    pub const AMEX_2: &str = "371449635398431";
    pub const AMEX_3: &str = "340000000000009";

    pub const DISCOVER_1: &str = "6011111111111117";
    pub const DISCOVER_2: &str = "6011000990139424";
    pub const DISCOVER_3: &str = "6445644564456445";

    pub const DINERS_1: &str = "30569309025904";
    pub const DINERS_2: &str = "38520000023237";
    pub const DINERS_3: &str = "36700102000000";

    pub const JCB_1: &str = "3530111333300000";
    pub const JCB_2: &str = "3566002020360505";
}

use test_cards::*;

fn type_keys(input: &mut NumberInput, keys: &str) -> Vec<Signal> {
    let mut signals = Vec::new();
    for key in keys.chars() {
        let outcome = if key == '<' {
            input.delete_backward()
        } else {
            input.insert_str(&key.to_string())
        };
        signals.extend(outcome.signals);
    }
    signals
}

fn count(signals: &[Signal], wanted: &Signal) -> usize {
    signals.iter().filter(|s| *s == wanted).count()
}

// =============================================================================
// CARD TYPE DETECTION
// =============================================================================

#[test]
fn test_all_test_cards_resolve_and_validate() {
    let registry = CardTypeRegistry::default();
    let cases = [
        (VISA_1, "Visa"),
        (VISA_2, "Visa"),
        (VISA_13, "Visa"),
        (VISA_3, "Visa"),
        (MC_1, "Mastercard"),
        (MC_2, "Mastercard"),
        (MC_2SERIES, "Mastercard"),
        (AMEX_1, "American Express"),
        (AMEX_2, "American Express"),
        (AMEX_3, "American Express"),
        (DISCOVER_1, "Discover"),
        (DISCOVER_2, "Discover"),
        (DISCOVER_3, "Discover"),
        (DINERS_1, "Diners Club"),
        (DINERS_2, "Diners Club"),
        (DINERS_3, "Diners Club"),
        (JCB_1, "JCB"),
        (JCB_2, "JCB"),
    ];

    for (number, name) in cases {
        assert_eq!(
            registry.resolve(number).map(|r| r.name()),
            Some(name),
            "{}",
            number
        );
        let result = registry.validate(&CardNumber::parse(number).unwrap());
        assert!(result.is_valid(), "{}: {}", number, result);
    }
}

#[test]
fn test_candidates_shrink_as_digits_arrive() {
    let registry = CardTypeRegistry::default();
    let mut previous: Option<Vec<String>> = None;
    for end in 0..=AMEX_1.len() {
        let names: Vec<String> = registry
            .candidates(&AMEX_1[..end])
            .iter()
            .map(|c| c.rule.name().to_string())
            .collect();
        if let Some(previous) = &previous {
            assert!(names.iter().all(|n| previous.contains(n)));
        }
        previous = Some(names);
    }
    assert_eq!(previous.unwrap(), vec!["American Express".to_string()]);
}

// =============================================================================
// KEYSTROKE SCENARIOS
// =============================================================================

#[test]
fn test_visa_becomes_valid_exactly_at_sixteenth_digit() {
    let mut input = NumberInput::default();
    for (i, digit) in VISA_1.chars().enumerate() {
        let outcome = input.insert_str(&digit.to_string());
        assert!(outcome.accepted);
        if i < 15 {
            assert_ne!(outcome.state, InputState::Valid, "digit {}", i + 1);
            assert!(!outcome.signals.contains(&Signal::Completed));
        } else {
            assert_eq!(outcome.state, InputState::Valid);
            assert_eq!(count(&outcome.signals, &Signal::Completed), 1);
        }
    }
    assert_eq!(input.text(), "4111-1111-1111-1111");
}

#[test]
fn test_seventeenth_digit_is_rejected() {
    let mut input = NumberInput::default();
    type_keys(&mut input, VISA_1);

    let outcome = input.insert_str("1");
    assert!(!outcome.accepted);
    assert_eq!(outcome.rejection, Some(Rejection::TooLong));
    assert_eq!(input.text(), "4111-1111-1111-1111");
    assert_eq!(input.state(), InputState::Valid);
    // Repeat completion so the host can move focus again
    assert_eq!(outcome.signals, vec![Signal::Completed]);
}

#[test]
fn test_deleting_last_digit_returns_to_partially_valid() {
    let mut input = NumberInput::default();
    type_keys(&mut input, VISA_1);
    let signals = type_keys(&mut input, "<");
    assert_eq!(input.state(), InputState::PartiallyValid);
    assert_eq!(signals, vec![Signal::TextChanged("4111-1111-1111-111".into())]);
}

#[test]
fn test_backspace_over_separator() {
    let mut input = NumberInput::default();
    type_keys(&mut input, "41111");
    assert_eq!(input.text(), "4111-1");

    // Delete the "1" after the separator, leaving "4111"
    type_keys(&mut input, "<");
    assert_eq!(input.text(), "4111");

    // Select just the separator of "4111-2": the digit before it goes
    type_keys(&mut input, "2");
    let outcome = input.apply_edit(4..5, "");
    assert!(outcome.accepted);
    assert_eq!(input.text(), "4112");
    assert_eq!(outcome.cursor, 3);
}

#[test]
fn test_paste_formatted_number() {
    let mut input = NumberInput::default();
    let outcome = input.apply_edit(0..0, "3782-822463-10005");
    assert!(outcome.accepted);
    assert_eq!(outcome.state, InputState::Valid);
    assert_eq!(outcome.cursor, 17);
    assert_eq!(
        outcome.signals,
        vec![Signal::TextChanged("3782-822463-10005".into()), Signal::Completed]
    );
}

#[test]
fn test_paste_with_foreign_separator_is_rejected() {
    let mut input = NumberInput::default();
    let outcome = input.apply_edit(0..0, "3782 822463 10005");
    assert!(!outcome.accepted);
    assert!(outcome.signals.is_empty());
    assert_eq!(input.state(), InputState::Empty);
}

#[test]
fn test_replace_selection_in_middle() {
    let mut input = NumberInput::default();
    type_keys(&mut input, VISA_1);
    // Replace "1111" of the second group with "2222"
    let outcome = input.apply_edit(5..9, "2222");
    assert!(outcome.accepted);
    assert_eq!(input.text(), "4111-2222-1111-1111");
    assert_eq!(outcome.cursor, 9);
    assert_eq!(outcome.state, InputState::InvalidFormat);
}

#[test]
fn test_luhn_failure_at_max_length_signals_invalid_terminal_input() {
    let mut input = NumberInput::default();
    let signals = type_keys(&mut input, "4111111111111112");
    assert_eq!(input.state(), InputState::InvalidFormat);
    assert_eq!(count(&signals, &Signal::InvalidTerminalInput), 1);
    assert_eq!(count(&signals, &Signal::Completed), 0);
    assert!(input
        .validation()
        .contains(ValidationIssue::InvalidLuhnChecksum));
}

#[test]
fn test_all_zeros_never_valid() {
    let mut input = NumberInput::default();
    let signals = type_keys(&mut input, &"0".repeat(25));
    assert_eq!(count(&signals, &Signal::Completed), 0);
    assert_eq!(input.state(), InputState::InvalidFormat);
    assert_eq!(input.number().len(), card_input::MAX_CARD_DIGITS);
}

#[test]
fn test_amex_grouping_while_typing() {
    let mut input = NumberInput::default();
    let mut texts = Vec::new();
    for digit in AMEX_1.chars() {
        input.insert_str(&digit.to_string());
        texts.push(input.text().to_string());
    }
    assert_eq!(texts[3], "3782");
    assert_eq!(texts[4], "3782-8");
    assert_eq!(texts[9], "3782-822463");
    assert_eq!(texts[10], "3782-822463-1");
    assert_eq!(texts[14], "3782-822463-10005");
}

#[test]
fn test_ambiguous_prefix_is_partially_valid() {
    let mut input = NumberInput::default();
    input.insert_str("3");
    assert_eq!(input.state(), InputState::PartiallyValid);
    assert!(input.validation().contains(ValidationIssue::AmbiguousType));
    assert!(input.card_type().is_none());

    input.insert_str("4");
    assert_eq!(input.card_type().unwrap().name(), "American Express");
}

#[test]
fn test_prefill_from_scanner() {
    let scan = ScannedCard {
        number: "5555 5555 5555 4444".into(),
        expiry_month: Some(10),
        expiry_year: Some(2099),
        cvc: Some("737".into()),
    };
    let mut input = NumberInput::default();
    let outcome = input.prefill(&scan.number);
    assert!(outcome.accepted);
    assert_eq!(input.text(), "5555-5555-5555-4444");
    assert_eq!(input.state(), InputState::Valid);

    let card = Card::from_scan(&scan);
    assert!(card.validate(&CardTypeRegistry::default()).is_ok());
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_custom_separator_and_rules() {
    let rules = vec![
        CardTypeRule::new("Store Card", &["9"], &[10], &[3, 3, 4]).unwrap(),
        CardTypeRule::new("Visa", &["4"], &[16], &[4, 4, 4, 4]).unwrap(),
    ];
    let config = InputConfig {
        separator: " ".into(),
        rules: Some(rules),
    };
    let mut input = config.input().unwrap();

    // A store card number that passes Luhn: 900000000 + check digit
    let body = [9, 0, 0, 0, 0, 0, 0, 0, 0];
    let check = card_input::luhn::generate_check_digit(&body);
    let number = format!("900000000{}", check);

    let signals = type_keys(&mut input, &number);
    assert_eq!(input.text(), format!("900 000 000{}", check));
    assert_eq!(count(&signals, &Signal::Completed), 1);

    // Unknown to this table
    let mut input = config.input().unwrap();
    type_keys(&mut input, "5");
    assert_eq!(input.state(), InputState::InvalidFormat);
}

#[test]
fn test_rule_table_json_round_trip() {
    let registry = CardTypeRegistry::default();
    let json = registry.to_json().unwrap();
    let reloaded = CardTypeRegistry::from_json(&json).unwrap();
    assert_eq!(registry, reloaded);
}

#[test]
fn test_formatter_shared_registry() {
    let registry = Arc::new(CardTypeRegistry::default());
    let dashes = CardNumberFormatter::new(Arc::clone(&registry));
    let spaces = dashes.with_separator(" ").unwrap();
    assert!(Arc::ptr_eq(dashes.registry(), spaces.registry()));
    assert_eq!(spaces.formatted(DINERS_1), "3056 930902 5904");
}

// =============================================================================
// INVALID FLASH
// =============================================================================

#[test]
fn test_flash_on_rejected_keystrokes() {
    let mut input = NumberInput::default();
    let mut flash = InvalidFlash::new();
    let mut colour = "black".to_string();
    let mut tickets = Vec::new();

    type_keys(&mut input, VISA_1);
    for _ in 0..3 {
        let outcome = input.insert_str("9");
        if !outcome.accepted {
            tickets.push(flash.begin(colour.clone()));
            colour = "red".to_string();
        }
    }
    assert_eq!(tickets.len(), 3);

    let mut restored = None;
    for ticket in tickets {
        if let Some(original) = flash.finish(ticket) {
            restored = Some(original);
        }
    }
    assert_eq!(restored.as_deref(), Some("black"));
    assert!(!flash.is_active());
}

// =============================================================================
// GATEWAY
// =============================================================================

#[derive(Default)]
struct MockGateway {
    calls: AtomicUsize,
    last_request: Mutex<Option<TokenizeRequest>>,
    response: Option<Result<PaymentNonce, GatewayError>>,
}

impl PaymentGateway for MockGateway {
    fn tokenize(
        &self,
        request: TokenizeRequest,
    ) -> impl Future<Output = Result<PaymentNonce, GatewayError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        let response = self.response.clone().unwrap_or_else(|| {
            Ok(PaymentNonce {
                nonce: "fake-valid-nonce".into(),
                kind: "CreditCard".into(),
                description: "ending in 11".into(),
            })
        });
        async move { response }
    }
}

fn complete_visa() -> Card {
    Card::new(
        CardNumber::parse(VISA_1).unwrap(),
        Some(Expiry::parse("12/30").unwrap()),
        Some(Cvc::parse("123").unwrap()),
    )
}

#[tokio::test]
async fn test_tokenize_sends_one_request() {
    let gateway = MockGateway::default();
    let nonce = tokenize_card(
        &gateway,
        &complete_visa(),
        Some("00000"),
        TokenizeOptions { validate: true },
    )
    .await
    .unwrap();

    assert_eq!(nonce.nonce, "fake-valid-nonce");
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

    let request = gateway.last_request.lock().unwrap().take().unwrap();
    assert_eq!(request.credit_card.number, VISA_1);
    assert_eq!(request.credit_card.expiration_date, "12/30");
    assert_eq!(request.credit_card.cvv, "123");
    assert_eq!(
        request.credit_card.billing_address.as_ref().map(|a| a.postal_code.as_str()),
        Some("00000")
    );
    assert!(request.credit_card.options.validate);
}

#[tokio::test]
async fn test_tokenize_empty_nonce_is_missing_nonce() {
    let gateway = MockGateway {
        response: Some(Ok(PaymentNonce {
            nonce: String::new(),
            kind: "CreditCard".into(),
            description: String::new(),
        })),
        ..Default::default()
    };
    let result = tokenize_card(&gateway, &complete_visa(), None, TokenizeOptions::default()).await;
    assert_eq!(result, Err(GatewayError::MissingNonce));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tokenize_gateway_error_is_not_retried() {
    let gateway = MockGateway {
        response: Some(Err(GatewayError::Rejected {
            code: "81707".into(),
            message: "CVV must be 4 digits for American Express".into(),
        })),
        ..Default::default()
    };
    let result = tokenize_card(&gateway, &complete_visa(), None, TokenizeOptions::default()).await;
    assert!(matches!(result, Err(GatewayError::Rejected { .. })));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tokenize_incomplete_card_sends_nothing() {
    let gateway = MockGateway::default();
    let card = Card::new(CardNumber::parse(VISA_1).unwrap(), None, None);
    let result = tokenize_card(&gateway, &card, None, TokenizeOptions::default()).await;
    assert!(matches!(result, Err(GatewayError::IncompleteCard(_))));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_gateway_card_mapping() {
    let card = complete_visa();
    let gateway_card = GatewayCard::from(&card);
    assert_eq!(gateway_card.expiration_month, "12");
    assert_eq!(gateway_card.expiration_year, "30");
    assert_eq!(gateway_card.to_card(), card);
}

// =============================================================================
// SECURITY
// =============================================================================

#[test]
fn test_debug_output_never_contains_full_number() {
    let mut input = NumberInput::default();
    let outcome = input.insert_str(VISA_1);

    for debug in [
        format!("{:?}", input),
        format!("{:?}", outcome),
        format!("{:?}", complete_visa()),
        format!("{:?}", TokenizeRequest::from_card(&complete_visa(), None, TokenizeOptions::default()).unwrap()),
    ] {
        assert!(!debug.contains(VISA_1), "{}", debug);
        assert!(!debug.contains("4111-1111-1111-1111"), "{}", debug);
    }
}
