//! Fuzz target for CVC parsing.
//!
//! Tests that CVC functions never panic on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use card_input::{CardTypeRegistry, Cvc};

fuzz_target!(|data: &str| {
    if let Ok(cvc) = Cvc::parse(data) {
        assert!((3..=4).contains(&cvc.len()));
        assert!(!format!("{:?}", cvc).contains(cvc.as_str()));
        assert!(!format!("{}", cvc).contains(cvc.as_str()));

        for rule in CardTypeRegistry::default().rules() {
            let _ = cvc.validate_for(rule);
        }
    }
});
