//! Fixed-split budget arithmetic and rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default share of income reserved for essentials.
pub const DEFAULT_ESSENTIALS_SHARE: f64 = 0.50;
/// Default share of income routed to savings.
pub const DEFAULT_SAVINGS_SHARE: f64 = 0.20;

/// A three-way split of a monthly income figure.
///
/// Discretionary is the remainder after essentials and savings and is never
/// clamped: shares that sum past 100% leave it negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub income: f64,
    pub essentials_share: f64,
    pub savings_share: f64,
    pub essentials: f64,
    pub savings: f64,
    pub discretionary: f64,
}

impl BudgetSummary {
    /// Split `income` by explicit shares.
    pub fn new(income: f64, essentials_share: f64, savings_share: f64) -> Self {
        let essentials = income * essentials_share;
        let savings = income * savings_share;
        Self {
            income,
            essentials_share,
            savings_share,
            essentials,
            savings,
            discretionary: income - essentials - savings,
        }
    }

    /// Split `income` by the default 50/20 shares.
    pub fn with_default_split(income: f64) -> Self {
        Self::new(income, DEFAULT_ESSENTIALS_SHARE, DEFAULT_SAVINGS_SHARE)
    }

    /// Render the multi-line summary text, trailing newline included.
    pub fn render(&self) -> String {
        format!(
            "Monthly Budget Summary:\nTotal income: {}\nEssentials ({:.0}%): {}\nSavings ({:.0}%): {}\nDiscretionary: {}\n",
            format_inr(self.income),
            self.essentials_share * 100.0,
            format_inr(self.essentials),
            self.savings_share * 100.0,
            format_inr(self.savings),
            format_inr(self.discretionary),
        )
    }
}

impl fmt::Display for BudgetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Format a rupee amount with thousands separators and two decimal places,
/// e.g. `₹1,234,567.89`. Negative amounts render as `₹-1,000.00`.
pub fn format_inr(value: f64) -> String {
    let magnitude = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match magnitude.split_once('.') {
        Some(parts) => parts,
        None => (magnitude.as_str(), "00"),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("₹{}{}.{}", sign, grouped, frac_part)
}
