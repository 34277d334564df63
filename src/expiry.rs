//! Card expiry dates.
//!
//! # Supported Formats
//!
//! - `MM/YY` - e.g., "12/25"
//! - `MM/YYYY` - e.g., "12/2025"
//! - `MMYY` - e.g., "1225"
//! - `MMYYYY` - e.g., "122025"
//!
//! # Example
//!
//! ```
//! use card_input::Expiry;
//!
//! let expiry = Expiry::parse("12/30").unwrap();
//! assert_eq!(expiry.month(), 12);
//! assert_eq!(expiry.year(), 2030);
//! assert_eq!(expiry.to_string(), "12/30");
//! ```

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A card expiry month.
///
/// The card is valid through the last day of this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expiry {
    /// Four-digit year (e.g., 2025). Declared first so ordering is by date.
    year: u16,
    /// Month (1-12)
    month: u8,
}

impl Expiry {
    /// Creates an expiry date.
    ///
    /// Years below 100 are taken as 20YY.
    ///
    /// ```
    /// use card_input::Expiry;
    ///
    /// assert_eq!(Expiry::new(7, 28).unwrap().year(), 2028);
    /// assert!(Expiry::new(13, 2028).is_err());
    /// ```
    pub fn new(month: u8, year: u16) -> Result<Self, ExpiryError> {
        if !(1..=12).contains(&month) {
            return Err(ExpiryError::InvalidMonth(month));
        }
        let year = if year < 100 { 2000 + year } else { year };
        Ok(Self { year, month })
    }

    /// Parses `MM/YY`, `MM/YYYY`, `MMYY` or `MMYYYY`.
    pub fn parse(input: &str) -> Result<Self, ExpiryError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ExpiryError::Empty);
        }

        if let Some((month_str, year_str)) = input.split_once('/') {
            return parse_month_year(month_str.trim(), year_str.trim());
        }

        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ExpiryError::InvalidFormat);
        }

        match input.len() {
            4 => parse_month_year(&input[0..2], &input[2..4]),
            6 => parse_month_year(&input[0..2], &input[2..6]),
            _ => Err(ExpiryError::InvalidFormat),
        }
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Month as two digits: `"03"`.
    pub fn month_string(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Year as two digits: `"25"`.
    pub fn year_string(&self) -> String {
        format!("{:02}", self.year % 100)
    }

    /// Returns true if the card has expired.
    pub fn is_expired(&self) -> bool {
        let (year, month) = current_year_month();
        self.is_expired_at(year, month)
    }

    /// Returns true if the card is expired during `month` of `year`.
    pub fn is_expired_at(&self, year: u16, month: u8) -> bool {
        (self.year, self.month) < (year, month)
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Errors that can occur during expiry date parsing/validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// The input string is empty.
    Empty,
    /// Invalid format - couldn't parse month/year.
    InvalidFormat,
    /// Month is out of range (must be 1-12).
    InvalidMonth(u8),
    /// The card has expired.
    Expired {
        /// The expiry month.
        month: u8,
        /// The expiry year.
        year: u16,
    },
}

impl fmt::Display for ExpiryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "expiry date is empty"),
            Self::InvalidFormat => {
                write!(f, "invalid expiry format (expected MM/YY or MM/YYYY)")
            }
            Self::InvalidMonth(m) => {
                write!(f, "invalid month {}: must be 1-12", m)
            }
            Self::Expired { month, year } => {
                write!(f, "card expired ({:02}/{})", month, year)
            }
        }
    }
}

impl std::error::Error for ExpiryError {}

fn parse_month_year(month_str: &str, year_str: &str) -> Result<Expiry, ExpiryError> {
    if month_str.is_empty()
        || month_str.len() > 2
        || !month_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ExpiryError::InvalidFormat);
    }
    let month: u8 = month_str.parse().map_err(|_| ExpiryError::InvalidFormat)?;

    if !matches!(year_str.len(), 2 | 4) || !year_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExpiryError::InvalidFormat);
    }
    let year: u16 = year_str.parse().map_err(|_| ExpiryError::InvalidFormat)?;

    Expiry::new(month, year)
}

/// Current UTC year and month.
fn current_year_month() -> (u16, u8) {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    year_month_from_days((secs / 86_400) as i64)
}

/// Civil year and month for a count of days since 1970-01-01.
fn year_month_from_days(days: i64) -> (u16, u8) {
    // Howard Hinnant's civil_from_days
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as u16, month as u8)
}
