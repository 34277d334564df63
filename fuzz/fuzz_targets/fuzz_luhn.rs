//! Fuzz target for Luhn algorithm.
//!
//! Tests that luhn functions never panic and maintain invariants.

#![no_main]

use libfuzzer_sys::fuzz_target;
use card_input::luhn;

fuzz_target!(|data: &[u8]| {
    // Clamp values to valid digit range
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();

    if digits.is_empty() {
        return;
    }

    let valid = luhn::validate(&digits);
    assert_eq!(valid, luhn::compute_checksum(&digits) % 10 == 0);

    let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    assert_eq!(valid, luhn::validate_str(&text), "str and slice validation mismatch");

    // Adding check digit should make it valid
    if digits.len() <= 18 {
        let check = luhn::generate_check_digit(&digits);
        assert!(check <= 9, "Check digit should be 0-9");

        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::validate(&with_check), "Adding check digit should make valid");
    }
});
