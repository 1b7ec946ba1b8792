//! Currency codes and display formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> &str {
        match self.0.as_str() {
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "AUD" => "A$",
            other => other,
        }
    }

    pub fn minor_units(&self) -> u8 {
        match self.0.as_str() {
            "JPY" => 0,
            "KWD" | "BHD" => 3,
            _ => 2,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders an amount with the currency symbol, digit grouping, and the
/// currency's minor-unit precision, e.g. `$1,234.50`.
pub fn format_currency(amount: f64, code: &CurrencyCode) -> String {
    let precision = code.minor_units() as usize;
    let body = format!("{:.*}", precision, amount.abs());
    let (int_part, frac_part) = match body.find('.') {
        Some(pos) => (&body[..pos], &body[pos..]),
        None => (body.as_str(), ""),
    };
    let sign = if amount < 0.0 { "-" } else { "" };
    let symbol = code.symbol();
    let spacer = if symbol.chars().count() > 1 && symbol.chars().all(char::is_alphabetic) {
        " "
    } else {
        ""
    };
    format!(
        "{}{}{}{}{}",
        sign,
        symbol,
        spacer,
        group_digits(int_part),
        frac_part
    )
}

/// Converts a major-unit amount to integer minor units (cents for USD).
pub fn to_minor_units(amount: f64, code: &CurrencyCode) -> i64 {
    let scale = 10f64.powi(code.minor_units() as i32);
    (amount * scale).round() as i64
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
