//! Exchange-rate port backed by the built-in rate table.

use exchange_rates::{RateError, RateTable};
use rust_decimal::Decimal;

use payments_types::{Currency, ExchangeError, ExchangeRateProvider};

/// Serves rates from an in-process [`RateTable`].
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    table: RateTable,
}

impl StaticRateProvider {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }
}

#[async_trait::async_trait]
impl ExchangeRateProvider for StaticRateProvider {
    async fn get_rate(&self, from: Currency, to: Currency) -> Result<Decimal, ExchangeError> {
        self.table
            .rate(from.code(), to.code())
            .map_err(|err| match err {
                RateError::UnknownCurrency(_) => ExchangeError::RateNotAvailable(from, to),
                RateError::InvalidRate(code) => {
                    ExchangeError::ServiceUnavailable(format!("Invalid rate configured for {}", code))
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_builtin_rate() {
        let provider = StaticRateProvider::default();
        let eur = Currency::from_code("EUR").unwrap();
        let usd = Currency::from_code("USD").unwrap();
        assert_eq!(provider.get_rate(eur, usd).await.unwrap(), dec!(1.087));
    }

    #[tokio::test]
    async fn test_missing_rate() {
        let table = RateTable::empty().with_rate("USD", dec!(1)).unwrap();
        let provider = StaticRateProvider::new(table);
        let result = provider
            .get_rate(
                Currency::from_code("USD").unwrap(),
                Currency::from_code("GBP").unwrap(),
            )
            .await;
        assert!(matches!(result, Err(ExchangeError::RateNotAvailable(_, _))));
    }
}
