use serde::{Deserialize, Serialize};

use crate::types::ValueType;

/// Placeholder shown for any cell without a value.
pub const DEFAULT_PLACEHOLDER: &str = "–";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

// 2^64; every float below it converts to u64 without saturating.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Display settings for resolved values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueFormat {
    pub currency_symbol: String,
    pub placeholder: String,
}

impl Default for ValueFormat {
    fn default() -> Self {
        ValueFormat {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl ValueFormat {
    /// Format a number according to its semantic type. Non-finite input
    /// yields the placeholder.
    pub fn number(&self, value: f64, value_type: ValueType) -> String {
        if !value.is_finite() {
            return self.placeholder.clone();
        }
        match value_type {
            ValueType::Currency => self.currency(value),
            ValueType::Percentage => format!("{value:.1}%"),
            ValueType::Ratio => format!("{value:.1}"),
            ValueType::Count if value.round().abs() >= U64_LIMIT => self.placeholder.clone(),
            ValueType::Count => count(value),
            ValueType::Text => value.to_string(),
        }
    }

    /// `$1,234` for whole amounts, `$1,234.50` otherwise. Amounts whose cents
    /// do not fit in a `u64` yield the placeholder.
    pub fn currency(&self, value: f64) -> String {
        let cents = (value.abs() * 100.0).round();
        if !(cents < U64_LIMIT) {
            return self.placeholder.clone();
        }
        let cents = cents as u64;
        let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
        let whole = group_thousands(cents / 100);
        match cents % 100 {
            0 => format!("{sign}{}{whole}", self.currency_symbol),
            frac => format!("{sign}{}{whole}.{frac:02}", self.currency_symbol),
        }
    }

    pub fn placeholder(&self) -> String {
        self.placeholder.clone()
    }
}

/// Rounded integer with `,` thousands separators.
pub fn count(value: f64) -> String {
    let rounded = value.round();
    let grouped = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 { format!("-{grouped}") } else { grouped }
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
