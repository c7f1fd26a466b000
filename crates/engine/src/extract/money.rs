//! Currency amount parsing for liability caps.

use serde::{Deserialize, Serialize};

/// A parsed monetary cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityCap {
    /// Amount in whole currency units
    pub amount: f64,

    /// ISO 4217 code, e.g. "USD"
    pub currency: String,
}

/// Normalize a currency marker ("$", "US$", "Rs.", "euros") to an ISO code.
///
/// Unknown markers yield `None`.
pub fn normalize_currency(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().trim_end_matches('.').to_lowercase();
    let code = match lowered.as_str() {
        "$" | "us$" | "usd" | "dollar" | "dollars" => "USD",
        "€" | "eur" | "euro" | "euros" => "EUR",
        "£" | "gbp" | "pound" | "pounds" => "GBP",
        "₹" | "inr" | "rs" | "rupee" | "rupees" => "INR",
        "cad" | "c$" => "CAD",
        "aud" | "a$" => "AUD",
        _ => return None,
    };
    Some(code)
}

/// Parse an amount such as "1,000,000", "2.5" or "500,000." with an optional
/// scale word ("million", "k").
///
/// Thousands separators must be commas; anything else that does not parse as
/// a plain decimal ("1.000.000") is rejected.
pub fn parse_amount(raw: &str, scale: Option<&str>) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches(['.', ','])
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    let multiplier = match scale.map(|s| s.trim().to_lowercase()) {
        None => 1.0,
        Some(s) => match s.as_str() {
            "" => 1.0,
            "k" | "thousand" => 1_000.0,
            "m" | "mm" | "million" => 1_000_000.0,
            "bn" | "billion" => 1_000_000_000.0,
            _ => return None,
        },
    };

    Some(value * multiplier)
}

/// Build a cap from raw currency, amount and scale captures.
pub fn parse_cap(currency: &str, amount: &str, scale: Option<&str>) -> Option<LiabilityCap> {
    Some(LiabilityCap {
        amount: parse_amount(amount, scale)?,
        currency: normalize_currency(currency)?.to_string(),
    })
}
