//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation so that running totals stay
//! exact no matter how many line items are summed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    MXN,
    ARS,
    CLP,
    COP,
    PEN,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::MXN => "MXN",
            Currency::ARS => "ARS",
            Currency::CLP => "CLP",
            Currency::COP => "COP",
            Currency::PEN => "PEN",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::MXN => "MX$",
            Currency::ARS => "AR$",
            Currency::CLP => "CLP$",
            Currency::COP => "COL$",
            Currency::PEN => "S/",
        }
    }

    /// Prefixes a price cell may carry, longest first.
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Currency::USD => &["USD", "US$", "$"],
            Currency::EUR => &["EUR", "\u{20ac}"],
            Currency::MXN => &["MXN", "MX$", "$"],
            Currency::ARS => &["ARS", "AR$", "$"],
            Currency::CLP => &["CLP$", "CLP", "$"],
            Currency::COP => &["COL$", "COP", "$"],
            Currency::PEN => &["PEN", "S/"],
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::CLP => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "MXN" => Some(Currency::MXN),
            "ARS" => Some(Currency::ARS),
            "CLP" => Some(Currency::CLP),
            "COP" => Some(Currency::COP),
            "PEN" => Some(Currency::PEN),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use caja_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::USD);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Parse a spreadsheet cell into a monetary amount.
    ///
    /// Accepts plain numbers (`12`, `12.5`, `1e3`), a decimal comma
    /// (`12,50`), grouped thousands (`1,234.50`, `1.234,50`) and a leading
    /// symbol or code of `currency` (`$12.50`, `USD 12.50`). Returns `None`
    /// for anything that is not a finite number or does not fit in cents.
    pub fn parse(raw: &str, currency: Currency) -> Option<Self> {
        let mut text = raw.trim();
        for prefix in currency.prefixes() {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest.trim_start();
                break;
            }
        }
        if text.is_empty() {
            return None;
        }

        let normalized = normalize_separators(text);
        let value: f64 = normalized.parse().ok()?;
        if !value.is_finite() {
            return None;
        }

        let scaled = (value * 10_i64.pow(currency.decimal_places()) as f64).round();
        if scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self::new(scaled as i64, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let decimal = self.to_decimal();
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", decimal)
    }

    /// Try to add another Money value, returning None if currencies don't
    /// match or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_sub(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

/// Rewrite `text` with `.` as the decimal point and no grouping.
///
/// With both `,` and `.` present the last one is the decimal point. A lone
/// `,` is a decimal comma.
fn normalize_separators(text: &str) -> String {
    match (text.rfind(','), text.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => text.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => text.replace(',', ""),
        (Some(_), None) => text.replace(',', "."),
        _ => text.to_string(),
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
