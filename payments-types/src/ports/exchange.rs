//! Exchange rate provider port.
//!
//! This trait defines the interface for exchange rate services.
//! Implementations can be HTTP clients, static tables, mock providers, etc.

use rust_decimal::Decimal;

use crate::domain::Currency;

/// Error type for exchange rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Rate not available for {0} -> {1}")]
    RateNotAvailable(Currency, Currency),
}

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait ExchangeRateProvider: Send + Sync + 'static {
    /// Get the exchange rate from one currency to another.
    /// Returns how many units of `to` currency you get for 1 unit of `from` currency.
    async fn get_rate(&self, from: Currency, to: Currency) -> Result<Decimal, ExchangeError>;
}
