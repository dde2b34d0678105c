//! Exchange Rates Library with Hardcoded Base Rates
//!
//! Every currency carries a single base rate expressed in US dollars; cross
//! rates are derived by dividing one base rate by another. All arithmetic uses
//! `rust_decimal::Decimal` so rates never pick up floating-point noise.
//!
//! # Adding a New Currency
//! Add a line to the `base_rates!` macro invocation:
//! ```ignore
//! base_rates! {
//!     // ... existing currencies ...
//!     "THB" => "0.0278",
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::RateTable;
//!
//! let table = RateTable::builtin();
//! let rate = table.rate("USD", "EUR").unwrap();
//! assert!(rate > rust_decimal::Decimal::ZERO);
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Digits kept on derived cross rates.
pub const RATE_PRECISION: u32 = 6;

/// Error type for rate lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Invalid base rate for {0}")]
    InvalidRate(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// BASE RATES - value of one unit in USD
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! base_rates {
    ($($code:literal => $to_usd:literal),* $(,)?) => {
        const BASE_TO_USD: &[(&str, &str)] = &[$(($code, $to_usd)),*];
    };
}

base_rates! {
    "USD" => "1",
    "EUR" => "1.087",
    "GBP" => "1.266",
    "INR" => "0.01203",
    "JPY" => "0.0067",
    "CHF" => "1.128",
    "CAD" => "0.737",
    "AUD" => "0.658",
    "NZD" => "0.608",
    "CNY" => "0.1385",
    "HKD" => "0.128",
    "SGD" => "0.744",
    "SEK" => "0.0957",
    "NOK" => "0.0937",
    "DKK" => "0.1457",
    "PLN" => "0.2513",
    "CZK" => "0.0432",
    "HUF" => "0.00277",
    "MXN" => "0.0589",
    "BRL" => "0.2024",
    "ZAR" => "0.0538",
    "TRY" => "0.0311",
    "KRW" => "0.00075",
    "KWD" => "3.25",
    "BHD" => "2.653",
}

/// Lookup table of base rates keyed by uppercase currency code.
#[derive(Debug, Clone)]
pub struct RateTable {
    to_usd: HashMap<String, Decimal>,
}

impl RateTable {
    /// Table with the built-in development rates.
    pub fn builtin() -> Self {
        let to_usd = BASE_TO_USD
            .iter()
            .filter_map(|(code, rate)| Some((code.to_string(), Decimal::from_str(rate).ok()?)))
            .collect();
        Self { to_usd }
    }

    /// Empty table, for callers that bring their own rates.
    pub fn empty() -> Self {
        Self {
            to_usd: HashMap::new(),
        }
    }

    /// Sets (or overrides) the USD value of one unit of `code`.
    pub fn with_rate(mut self, code: &str, to_usd: Decimal) -> Result<Self, RateError> {
        if to_usd <= Decimal::ZERO {
            return Err(RateError::InvalidRate(code.to_string()));
        }
        self.to_usd.insert(code.trim().to_ascii_uppercase(), to_usd);
        Ok(self)
    }

    /// USD value of one unit of `code`.
    pub fn base_to_usd_rate(&self, code: &str) -> Result<Decimal, RateError> {
        self.to_usd
            .get(code.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| RateError::UnknownCurrency(code.to_string()))
    }

    /// Units of `to` received for one unit of `from`.
    pub fn rate(&self, from: &str, to: &str) -> Result<Decimal, RateError> {
        let from_usd = self.base_to_usd_rate(from)?;
        let to_usd = self.base_to_usd_rate(to)?;
        if from.trim().eq_ignore_ascii_case(to.trim()) {
            return Ok(Decimal::ONE);
        }
        from_usd
            .checked_div(to_usd)
            .map(|rate| rate.round_dp(RATE_PRECISION))
            .ok_or_else(|| RateError::InvalidRate(to.to_string()))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
