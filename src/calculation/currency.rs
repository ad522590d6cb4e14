//! Fixed currency formatter.
//!
//! Amounts are rounded half away from zero to the configured number of
//! fraction digits and grouped the Indian way: the last three integer digits,
//! then groups of two (`12,34,567`).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// ISO 4217 code.
    #[serde(default = "default_code")]
    pub code: String,
    /// Symbol prefixed to amounts.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Digits after the decimal point.
    #[serde(default)]
    pub fraction_digits: u32,
}

fn default_code() -> String {
    "INR".to_string()
}

fn default_symbol() -> String {
    "₹".to_string()
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: default_code(),
            symbol: default_symbol(),
            fraction_digits: 0,
        }
    }
}

impl CurrencyFormat {
    /// Formats `amount`.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_engine::calculation::CurrencyFormat;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let inr = CurrencyFormat::default();
    /// assert_eq!(inr.format(Decimal::from_str("3609.09").unwrap()), "₹3,609");
    /// assert_eq!(inr.format(Decimal::from(1234567)), "₹12,34,567");
    /// ```
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount
            .round_dp_with_strategy(self.fraction_digits, RoundingStrategy::MidpointAwayFromZero)
            .abs();
        let text = format!("{:.*}", self.fraction_digits as usize, rounded);
        let (integer, fraction) = match text.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (text, None),
        };

        let sign = if amount < Decimal::ZERO && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let mut out = format!("{}{}{}", sign, self.symbol, group_indian(&integer));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(&fraction);
        }
        out
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
