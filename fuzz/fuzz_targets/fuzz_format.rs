//! Fuzz target for card formatting.
//!
//! Tests that formatting functions never panic on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use card_input::CardNumberFormatter;

fuzz_target!(|data: &str| {
    for separator in ["-", " ", "", " - "] {
        let formatter = match CardNumberFormatter::default().with_separator(separator) {
            Ok(formatter) => formatter,
            Err(_) => continue,
        };

        // These should never panic
        let _ = formatter.groups(data);
        let _ = formatter.format_placeholder(data);

        // Verify roundtrip property on the digits
        let digits: String = data.chars().filter(|c| c.is_ascii_digit()).collect();
        let formatted = formatter.formatted(&digits);
        assert_eq!(
            formatter.unformatted(&formatted),
            digits,
            "Format roundtrip should preserve digits"
        );

        let len = data.chars().count();
        let _ = formatter.apply_replacement(&formatted, 0..len.min(formatted.chars().count()), data);
    }
});
