//! Currency registry: ISO 4217 codes and their display metadata.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// A supported currency.
///
/// Values only come out of the registry, so two currencies with the same code
/// are always identical. Serialized as the bare code (`"EUR"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Currency {
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    decimal_places: u8,
}

macro_rules! define_currencies {
    ($($code:literal => ($name:literal, $symbol:literal, $decimals:expr)),* $(,)?) => {
        const CURRENCY_TABLE: &[Currency] = &[
            $(Currency {
                code: $code,
                name: $name,
                symbol: $symbol,
                decimal_places: $decimals,
            }),*
        ];
    };
}

define_currencies! {
    "USD" => ("US Dollar", "$", 2),
    "EUR" => ("Euro", "€", 2),
    "GBP" => ("British Pound", "£", 2),
    "INR" => ("Indian Rupee", "₹", 2),
    "JPY" => ("Japanese Yen", "¥", 0),
    "CHF" => ("Swiss Franc", "CHF", 2),
    "CAD" => ("Canadian Dollar", "C$", 2),
    "AUD" => ("Australian Dollar", "A$", 2),
    "NZD" => ("New Zealand Dollar", "NZ$", 2),
    "CNY" => ("Chinese Yuan", "¥", 2),
    "HKD" => ("Hong Kong Dollar", "HK$", 2),
    "SGD" => ("Singapore Dollar", "S$", 2),
    "SEK" => ("Swedish Krona", "kr", 2),
    "NOK" => ("Norwegian Krone", "kr", 2),
    "DKK" => ("Danish Krone", "kr", 2),
    "PLN" => ("Polish Zloty", "zł", 2),
    "CZK" => ("Czech Koruna", "Kč", 2),
    "HUF" => ("Hungarian Forint", "Ft", 2),
    "MXN" => ("Mexican Peso", "MX$", 2),
    "BRL" => ("Brazilian Real", "R$", 2),
    "ZAR" => ("South African Rand", "R", 2),
    "TRY" => ("Turkish Lira", "₺", 2),
    "KRW" => ("South Korean Won", "₩", 0),
    "KWD" => ("Kuwaiti Dinar", "KD", 3),
    "BHD" => ("Bahraini Dinar", "BD", 3),
}

static REGISTRY: LazyLock<HashMap<&'static str, Currency>> = LazyLock::new(|| {
    CURRENCY_TABLE
        .iter()
        .map(|currency| (currency.code, *currency))
        .collect()
});

impl Currency {
    /// Looks up a currency by its code. Surrounding whitespace and case are ignored.
    pub fn from_code(code: &str) -> Result<Self, DomainError> {
        let normalized = code.trim().to_ascii_uppercase();
        REGISTRY
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| DomainError::UnsupportedCurrency(code.trim().to_string()))
    }

    /// All registered currencies, ordered by code.
    pub fn all() -> Vec<Currency> {
        let mut all: Vec<Currency> = REGISTRY.values().copied().collect();
        all.sort_by_key(|c| c.code);
        all
    }

    /// Three-letter uppercase code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Number of digits after the decimal point in the smallest unit.
    pub fn decimal_places(&self) -> u8 {
        self.decimal_places
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::from_code(&value)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::from_code(&code).map_err(serde::de::Error::custom)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let lower = Currency::from_code("eur").unwrap();
        let upper = Currency::from_code("EUR").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.code(), "EUR");
        assert_eq!(lower.symbol(), "€");
        assert_eq!(lower.decimal_places(), 2);
    }

    #[test]
    fn test_unknown_code_fails() {
        let result = Currency::from_code("XBT");
        assert!(matches!(result, Err(DomainError::UnsupportedCurrency(code)) if code == "XBT"));
    }

    #[test]
    fn test_registry_invariants() {
        let all = Currency::all();
        assert_eq!(all.len(), CURRENCY_TABLE.len());
        for currency in all {
            assert_eq!(currency.code().len(), 3);
            assert!(currency.code().chars().all(|c| c.is_ascii_uppercase()));
            assert!(currency.decimal_places() <= 18);
        }
    }

    #[test]
    fn test_precision_varies_by_currency() {
        assert_eq!(Currency::from_code("JPY").unwrap().decimal_places(), 0);
        assert_eq!(Currency::from_code("KWD").unwrap().decimal_places(), 3);
    }

    #[test]
    fn test_serde_uses_code() {
        let usd: Currency = " usd ".parse().unwrap();
        assert_eq!(serde_json::to_string(&usd).unwrap(), "\"USD\"");

        let parsed: Currency = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(parsed.code(), "GBP");
        assert!(serde_json::from_str::<Currency>("\"ABC\"").is_err());
    }

    #[test]
    fn test_deserialize_from_borrowed_input() {
        let json = String::from(r#"["eur", " JPY "]"#);
        let parsed: Vec<Currency> = serde_json::from_str(&json).unwrap();
        let codes: Vec<&str> = parsed.iter().map(Currency::code).collect();
        assert_eq!(codes, vec!["EUR", "JPY"]);

        let err = serde_json::from_str::<Currency>("\"ABC\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported currency: ABC"));
    }
}
