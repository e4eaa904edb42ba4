// ABOUTME: Tuition fee parsing from scraped fee strings into whole euros.
// ABOUTME: Takes the first digit run and converts USD/GBP with fixed approximate rates.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::NOT_AVAILABLE;

/// First run of digits with optional thousands separators, e.g. `12,500`.
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*").unwrap());

/// A currency recognized by its code or symbol, converted at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyRate {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Euros per 100 units of this currency.
    pub eur_per_hundred: u64,
}

impl CurrencyRate {
    fn matches(&self, text: &str) -> bool {
        text.contains(self.code) || text.contains(self.symbol)
    }

    /// Converts and truncates toward zero.
    fn to_eur(&self, amount: u64) -> Option<u64> {
        amount.checked_mul(self.eur_per_hundred).map(|v| v / 100)
    }
}

/// Checked in order; the first matching currency wins. Unmarked amounts are euros.
pub const CURRENCY_RATES: &[CurrencyRate] = &[
    CurrencyRate {
        code: "USD",
        symbol: "$",
        eur_per_hundred: 85,
    },
    CurrencyRate {
        code: "GBP",
        symbol: "£",
        eur_per_hundred: 115,
    },
];

/// Extracts a tuition amount in euros from a fee string.
///
/// Returns `None` for empty input, the `N/A` sentinel, or text without digits.
pub fn extract_tuition_amount(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || text == NOT_AVAILABLE {
        return None;
    }

    let digits: String = AMOUNT_RE
        .find(text)?
        .as_str()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let amount: u64 = digits.parse().ok()?;

    match CURRENCY_RATES.iter().find(|rate| rate.matches(text)) {
        Some(rate) => rate.to_eur(amount),
        None => Some(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_digits_are_unchanged() {
        assert_eq!(extract_tuition_amount("12000"), Some(12000));
        assert_eq!(extract_tuition_amount("0"), Some(0));
        assert_eq!(extract_tuition_amount("987654"), Some(987654));
    }

    #[test]
    fn euro_amounts_are_not_converted() {
        assert_eq!(extract_tuition_amount("€8,500 / year"), Some(8500));
        assert_eq!(extract_tuition_amount("8,500 EUR"), Some(8500));
    }

    #[test]
    fn usd_is_converted() {
        assert_eq!(extract_tuition_amount("$20,000"), Some(17000));
        assert_eq!(extract_tuition_amount("20,000 USD per year"), Some(17000));
        // 1001 * 0.85 = 850.85, truncated
        assert_eq!(extract_tuition_amount("$1001"), Some(850));
    }

    #[test]
    fn gbp_is_converted() {
        assert_eq!(extract_tuition_amount("£10,000"), Some(11500));
        assert_eq!(extract_tuition_amount("9,250 GBP"), Some(10637));
    }

    #[test]
    fn first_number_wins() {
        assert_eq!(extract_tuition_amount("12,000 - 15,000 EUR"), Some(12000));
        assert_eq!(extract_tuition_amount("Fee, per year: 4,000"), Some(4000));
    }

    #[test]
    fn sentinel_and_text_without_digits() {
        assert_eq!(extract_tuition_amount(""), None);
        assert_eq!(extract_tuition_amount("N/A"), None);
        assert_eq!(extract_tuition_amount("Free"), None);
        assert_eq!(extract_tuition_amount("contact the university"), None);
    }

    #[test]
    fn overflowing_amount_is_none() {
        assert_eq!(extract_tuition_amount("99999999999999999999999"), None);
    }
}
