//! Fuzz target for expiry date parsing.
//!
//! Tests that expiry parsing never panics on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use card_input::Expiry;

fuzz_target!(|data: &str| {
    // If parsing succeeds, the parts must be in range and reparse
    if let Ok(exp) = Expiry::parse(data) {
        assert!((1..=12).contains(&exp.month()));
        let _ = exp.is_expired();
        let _ = exp.month_string();
        let _ = exp.year_string();

        let reparsed = Expiry::parse(&format!("{}/{}", exp.month_string(), exp.year()));
        assert_eq!(reparsed.ok(), Some(exp));
    }
});
