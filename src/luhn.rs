//! Luhn (mod 10) checksum.
//!
//! Every issuer in the built-in rule table except UnionPay requires the
//! number to pass this check before it counts as complete.

/// Doubled digit with the "subtract 9" step already applied.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Returns the Luhn sum of `digits` (values 0-9, not ASCII).
///
/// The rightmost digit is never doubled.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Validates a sequence of digit values.
///
/// # Example
///
/// ```
/// use card_input::luhn::validate;
///
/// assert!(validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]));
/// assert!(!validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2]));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    !digits.is_empty() && compute_checksum(digits) % 10 == 0
}

/// Validates an ASCII digit string. Any non-digit character fails the check.
///
/// ```
/// use card_input::luhn::validate_str;
///
/// assert!(validate_str("4111111111111111"));
/// assert!(!validate_str("4111-1111-1111-1111"));
/// ```
pub fn validate_str(digits: &str) -> bool {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
    validate(&values)
}

/// Computes the check digit to append to `digits` so the result passes.
///
/// ```
/// use card_input::luhn::generate_check_digit;
///
/// assert_eq!(generate_check_digit(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]), 1);
/// ```
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Appending a digit shifts every existing position one to the left,
    // so positions that were undoubled become doubled.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}
