//! Error types for the payment service.

use crate::domain::Currency;
use crate::ports::ExchangeError;

/// Domain-level errors (validation failures on money, currency and card values).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    InvalidAmount,

    #[error("Subtraction would produce a negative amount")]
    NegativeResult,

    #[error("Multiplication factor cannot be negative")]
    InvalidFactor,

    #[error("Discount percent must be between 0 and 100")]
    InvalidPercent,

    #[error("Number of parts must be greater than zero")]
    InvalidPartCount,

    #[error("Exchange rate must be greater than zero")]
    InvalidExchangeRate,

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: Currency, got: Currency },

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Amount overflows the supported precision")]
    AmountOverflow,

    #[error("Invalid card number")]
    InvalidCardNumber,

    #[error("Cardholder name must be between 2 and 100 characters")]
    InvalidCardholderName,

    #[error("Invalid or past expiry date")]
    InvalidExpiry,

    #[error("CVV must be 3 or 4 digits")]
    InvalidCvv,

    #[error("Card token cannot be empty")]
    EmptyToken,

    #[error("Tokenization failed: {0}")]
    Tokenization(String),
}

impl DomainError {
    /// Stable machine-readable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidAmount => "INVALID_AMOUNT",
            DomainError::NegativeResult => "NEGATIVE_RESULT",
            DomainError::InvalidFactor => "INVALID_FACTOR",
            DomainError::InvalidPercent => "INVALID_PERCENT",
            DomainError::InvalidPartCount => "INVALID_PART_COUNT",
            DomainError::InvalidExchangeRate => "INVALID_EXCHANGE_RATE",
            DomainError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            DomainError::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            DomainError::AmountOverflow => "AMOUNT_OVERFLOW",
            DomainError::InvalidCardNumber => "INVALID_CARD_NUMBER",
            DomainError::InvalidCardholderName => "INVALID_CARDHOLDER_NAME",
            DomainError::InvalidExpiry => "INVALID_EXPIRY",
            DomainError::InvalidCvv => "INVALID_CVV",
            DomainError::EmptyToken => "EMPTY_TOKEN",
            DomainError::Tokenization(_) => "TOKENIZATION_FAILED",
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ExchangeError> for AppError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::UnsupportedCurrency(code) => {
                AppError::Domain(DomainError::UnsupportedCurrency(code))
            }
            ExchangeError::RateNotAvailable(from, to) => {
                AppError::NotFound(format!("Rate not available for {} -> {}", from, to))
            }
            ExchangeError::ServiceUnavailable(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_codes_are_screaming_snake() {
        let err = DomainError::CurrencyMismatch {
            expected: Currency::from_code("EUR").unwrap(),
            got: Currency::from_code("USD").unwrap(),
        };
        assert_eq!(err.code(), "CURRENCY_MISMATCH");
        assert_eq!(err.to_string(), "Currency mismatch: expected EUR, got USD");
    }

    #[test]
    fn test_exchange_error_maps_to_app_error() {
        let err: AppError = ExchangeError::UnsupportedCurrency("XYZ".into()).into();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::UnsupportedCurrency(_))
        ));

        let err: AppError = ExchangeError::ServiceUnavailable("down".into()).into();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
