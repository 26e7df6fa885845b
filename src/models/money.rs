//! Money type for representing currency amounts
//!
//! Wraps an exact decimal so that sums of spreadsheet amounts never pick up
//! floating-point noise. Rounding only happens when a caller asks for it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Currency symbols tolerated in front of an amount
const CURRENCY_SYMBOLS: [char; 2] = ['€', '$'];

/// Represents a monetary amount as an exact decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use expense_report::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Add two amounts, or `None` when the sum leaves the decimal range
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Round to two decimal places (ties to even)
    pub fn round_cents(&self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Lossy conversion for chart coordinates
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "€10.50", "$10", " 3.5 "
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        // Handle negative sign at start
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, trimmed.strip_prefix('+').unwrap_or(trimmed))
        };

        // Remove currency symbol if present
        let rest = rest
            .strip_prefix(&CURRENCY_SYMBOLS[..])
            .unwrap_or(rest)
            .trim_start();

        if rest.is_empty() || rest.starts_with(['-', '+']) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(rest)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Shortest decimal rendering with at least one fractional digit
    ///
    /// `15.00` renders as `15.0`, `3.50` as `3.5`, `12.34` stays `12.34`.
    pub fn format_compact(&self) -> String {
        let text = self.0.normalize().to_string();
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    }

    /// Format with a trailing currency label, e.g. `15.0 eur.`
    pub fn format_with_label(&self, label: &str) -> String {
        format!("{} {}", self.format_compact(), label)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
