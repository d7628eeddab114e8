//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `CurrencyFormat` routine used to show them to patients.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    7.5 - 5.0 is fine, but 10.1 - 8.0 = 2.0999999999999996  ❌          │
//! │                                                                         │
//! │  A patient told "Overcharged by ₹2.0999999999999996" loses trust.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    1010 - 800 = 210  →  "₹2.10"                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fairbill_core::money::{CurrencyFormat, Money};
//!
//! let charged: Money = "7.50".parse().unwrap();
//! let ceiling = Money::from_minor(500);
//!
//! let excess = charged - ceiling;
//! assert_eq!(excess.minor(), 250);
//! assert_eq!(CurrencyFormat::default().format(excess), "₹2.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Minor units per major unit (100 paise = 1 rupee).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `charged - max` can go negative
///   before being clamped by the overcharge rule
/// - **Single field tuple struct**: stored in SQLite as a plain INTEGER
/// - **No symbol in `Display`**: use [`CurrencyFormat`] for user-facing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use fairbill_core::money::Money;
    ///
    /// let price = Money::from_minor(750); // 7.50
    /// assert_eq!(price.minor(), 750);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor parts.
    ///
    /// ## Example
    /// ```rust
    /// use fairbill_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 5).minor(), 1005);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major part should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `self - other`, or zero when that would be negative.
    ///
    /// ## Example
    /// ```rust
    /// use fairbill_core::money::Money;
    ///
    /// let a = Money::from_minor(300);
    /// let b = Money::from_minor(500);
    /// assert_eq!(a.excess_over(b), Money::zero());
    /// assert_eq!(b.excess_over(a).minor(), 200);
    /// ```
    #[inline]
    pub fn excess_over(&self, other: Money) -> Money {
        if self.0 > other.0 {
            Money(self.0 - other.0)
        } else {
            Money::zero()
        }
    }

    /// Addition that returns `None` instead of overflowing.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal text such as `"7.50"`, `"7.5"`, `"7"` or `"-2.00"`.
///
/// At most two fractional digits are accepted; anything finer than one paisa
/// is rejected instead of being rounded.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| CoreError::InvalidAmount {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_str.is_empty() && minor_str.is_empty() {
            return Err(invalid("no digits"));
        }
        if !major_str.chars().all(|c| c.is_ascii_digit())
            || !minor_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("not a number"));
        }
        if minor_str.len() > 2 {
            return Err(invalid("more than two decimal places"));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| invalid("amount too large"))?
        };
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("not a number"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("not a number"))?,
        };

        let total = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Formats money for display with a configurable currency symbol.
///
/// ## Example
/// ```rust
/// use fairbill_core::money::{CurrencyFormat, Money};
///
/// let rupees = CurrencyFormat::default();
/// assert_eq!(rupees.format(Money::from_minor(250)), "₹2.50");
///
/// let dollars = CurrencyFormat::new("$");
/// assert_eq!(dollars.format(Money::from_minor(-550)), "-$5.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Symbol placed before the amount.
    pub symbol: String,
}

impl CurrencyFormat {
    /// Symbol used when none is configured.
    pub const DEFAULT_SYMBOL: &'static str = "₹";

    /// Creates a format with the given symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
        }
    }

    /// Formats an amount as `{sign}{symbol}{major}.{minor:02}`.
    pub fn format(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.symbol,
            amount.major().abs(),
            amount.minor_part()
        )
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::new(Self::DEFAULT_SYMBOL)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering without a currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display_has_no_symbol() {
        assert_eq!(Money::from_minor(750).to_string(), "7.50");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!("7.50".parse::<Money>().unwrap().minor(), 750);
        assert_eq!("7.5".parse::<Money>().unwrap().minor(), 750);
        assert_eq!("7".parse::<Money>().unwrap().minor(), 700);
        assert_eq!(" 13.00 ".parse::<Money>().unwrap().minor(), 1300);
        assert_eq!(".25".parse::<Money>().unwrap().minor(), 25);
        assert_eq!("-2.05".parse::<Money>().unwrap().minor(), -205);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_currency_format() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(Money::from_minor(250)), "₹2.50");
        assert_eq!(fmt.format(Money::from_minor(1)), "₹0.01");
        assert_eq!(fmt.format(Money::from_minor(150000)), "₹1500.00");
        assert_eq!(fmt.format(Money::from_minor(-205)), "-₹2.05");

        let custom = CurrencyFormat::new("Rs. ");
        assert_eq!(custom.format(Money::from_minor(700)), "Rs. 7.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(300);

        assert_eq!((a + b).minor(), 1300);
        assert_eq!((a - b).minor(), 700);
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_minor(1000);
        assert_eq!(a.checked_add(Money::from_minor(5)), Some(Money::from_minor(1005)));
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
    }

    #[test]
    fn test_excess_over_never_negative() {
        let charged = Money::from_minor(300);
        let max = Money::from_minor(500);
        assert_eq!(charged.excess_over(max), Money::zero());
        assert_eq!(max.excess_over(max), Money::zero());
        assert_eq!(Money::from_minor(1000).excess_over(Money::from_minor(800)).minor(), 200);
    }
}
