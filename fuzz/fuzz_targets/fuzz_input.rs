//! Fuzz target for the input field state machine.
//!
//! Replays arbitrary edits and checks the field never drifts from its number.

#![no_main]

use arbitrary::Arbitrary;
use card_input::{InputState, NumberInput, Signal};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Edit {
    Insert(String),
    Replace { start: u8, end: u8, text: String },
    Backspace,
    Clear,
    Prefill(String),
}

fuzz_target!(|edits: Vec<Edit>| {
    let mut input = NumberInput::default();

    for edit in edits {
        let before = input.text().to_string();
        let outcome = match edit {
            Edit::Insert(text) => input.insert_str(&text),
            Edit::Replace { start, end, text } => {
                let (start, end) = (start.min(end) as usize, start.max(end) as usize);
                input.apply_edit(start..end, &text)
            }
            Edit::Backspace => input.delete_backward(),
            Edit::Clear => input.clear(),
            Edit::Prefill(raw) => input.prefill(&raw),
        };

        if !outcome.accepted {
            assert_eq!(input.text(), before);
        }
        assert_eq!(input.formatter().formatted(input.number().as_str()), input.text());
        assert_ne!(input.state(), InputState::TooLong);
        assert!(outcome.cursor <= input.text().chars().count().max(before.chars().count()));
        if outcome.signals.contains(&Signal::Completed) {
            assert_eq!(input.state(), InputState::Valid);
        }
    }
});
