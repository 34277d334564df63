//! Simulates a user typing into a card number field.
//!
//! Run with: `cargo run --example keystrokes`

use card_input::{InputState, InvalidFlash, NumberInput, Rejection, Signal};

fn print_outcome(label: &str, input: &NumberInput, accepted: bool, signals: &[Signal]) {
    let signals: Vec<String> = signals
        .iter()
        .map(|signal| match signal {
            Signal::TextChanged(_) => "text changed".to_string(),
            Signal::Completed => "completed".to_string(),
            Signal::InvalidTerminalInput => "invalid terminal input".to_string(),
        })
        .collect();

    println!(
        "  {:<6} {:<24} {:<16} {}{}",
        label,
        format!("\"{}\"", input.text()),
        input.state().to_string(),
        if accepted { "" } else { "refused " },
        signals.join(", ")
    );
}

fn type_number(input: &mut NumberInput, number: &str) {
    for key in number.chars() {
        let outcome = input.insert_str(&key.to_string());
        print_outcome(&key.to_string(), input, outcome.accepted, &outcome.signals);
    }
}

fn main() {
    println!("=== Card Number Entry ===\n");

    // -------------------------------------------------------------------------
    // Typing a Visa number digit by digit
    // -------------------------------------------------------------------------
    println!("--- Typing a Visa number ---\n");

    let mut input = NumberInput::default();
    type_number(&mut input, "4111111111111111");

    let outcome = input.insert_str("1");
    print_outcome("1", &input, outcome.accepted, &outcome.signals);
    println!();

    // -------------------------------------------------------------------------
    // Amex groups as 4-6-5
    // -------------------------------------------------------------------------
    println!("--- Typing an Amex number ---\n");

    let mut input = NumberInput::default();
    type_number(&mut input, "378282246310005");
    println!("  Card type: {}", input.card_type().map(|r| r.name()).unwrap_or("?"));
    println!();

    // -------------------------------------------------------------------------
    // Backspace across a separator
    // -------------------------------------------------------------------------
    println!("--- Backspace ---\n");

    let mut input = NumberInput::default();
    input.insert_str("41112");
    print_outcome("start", &input, true, &[]);
    let outcome = input.delete_backward();
    print_outcome("<", &input, outcome.accepted, &outcome.signals);
    let outcome = input.apply_edit(4..5, "");
    print_outcome("<sep", &input, outcome.accepted, &outcome.signals);
    println!();

    // -------------------------------------------------------------------------
    // A refused keystroke flashes the field
    // -------------------------------------------------------------------------
    println!("--- Invalid keystroke ---\n");

    let mut input = NumberInput::default();
    input.insert_str("4111");
    let mut flash = InvalidFlash::new();

    let outcome = input.insert_str("x");
    if let Some(Rejection::Edit(err)) = &outcome.rejection {
        let ticket = flash.begin(input.text().to_string());
        println!("  refused: {}", err);
        println!("  flashing: {}", flash.is_active());
        if let Some(restored) = flash.finish(ticket) {
            println!("  restored text: \"{}\"", restored);
        }
    }
    println!();

    // -------------------------------------------------------------------------
    // Custom separator and placeholder
    // -------------------------------------------------------------------------
    println!("--- Custom separator ---\n");

    let mut input = NumberInput::default();
    input.insert_str("5500000000000004");
    if let Err(e) = input.set_separator(" ") {
        println!("  separator rejected: {}", e);
    }
    println!("  Text:        \"{}\"", input.text());
    println!("  Placeholder: \"{}\"", input.placeholder("4242424242424242"));
    println!("  Masked:      {}", input.number());
    println!(
        "  Complete:    {}",
        if input.state() == InputState::Valid { "yes" } else { "no" }
    );
}
