//! Data Transfer Objects (DTOs) for requests and responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CardBrand, CreditCard, Currency, Money};
use crate::error::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// Currency DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Registry entry for a currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyResponse {
    #[schema(example = "EUR")]
    pub code: String,
    #[schema(example = "Euro")]
    pub name: String,
    #[schema(example = "€")]
    pub symbol: String,
    /// Digits after the decimal point of the smallest unit
    #[schema(example = 2)]
    pub decimal_places: u8,
}

impl From<Currency> for CurrencyResponse {
    fn from(currency: Currency) -> Self {
        Self {
            code: currency.code().to_string(),
            name: currency.name().to_string(),
            symbol: currency.symbol().to_string(),
            decimal_places: currency.decimal_places(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Money DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// An amount and currency code as sent by clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoneyPayload {
    /// Decimal amount in major units, e.g. "19.99"
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    #[schema(example = "EUR")]
    pub currency: String,
}

impl TryFrom<MoneyPayload> for Money {
    type Error = DomainError;

    fn try_from(payload: MoneyPayload) -> Result<Self, Self::Error> {
        Money::of(payload.amount, &payload.currency)
    }
}

impl From<Money> for MoneyPayload {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency().code().to_string(),
        }
    }
}

/// Two amounts for add, subtract and compare.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoneyPairRequest {
    pub left: MoneyPayload,
    pub right: MoneyPayload,
}

/// Request to multiply an amount.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MultiplyRequest {
    pub money: MoneyPayload,
    /// Non-negative factor
    #[schema(value_type = String, example = "1.5")]
    pub factor: Decimal,
}

/// Request to apply a percentage discount.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiscountRequest {
    pub money: MoneyPayload,
    /// Percentage between 0 and 100
    #[schema(value_type = String, example = "20")]
    pub percent: Decimal,
}

/// Request to split an amount into equal parts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SplitRequest {
    pub money: MoneyPayload,
    #[schema(example = 3)]
    pub parts: i64,
}

/// Request to convert an amount into another currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConvertRequest {
    pub money: MoneyPayload,
    #[schema(example = "USD")]
    pub target_currency: String,
    /// Units of the target currency per source unit. Looked up when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "1.087")]
    pub exchange_rate: Option<Decimal>,
}

/// A validated amount.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoneyResponse {
    #[schema(value_type = String, example = "80.00")]
    pub amount: Decimal,
    #[schema(example = "EUR")]
    pub currency: String,
    /// Amount with currency symbol
    #[schema(example = "€80.00")]
    pub formatted: String,
}

impl From<Money> for MoneyResponse {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency().code().to_string(),
            formatted: money.to_string(),
        }
    }
}

/// Pieces of a split, in order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SplitResponse {
    pub parts: Vec<MoneyResponse>,
}

/// Result of a conversion and the rate that was applied.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    pub money: MoneyResponse,
    #[schema(value_type = String, example = "1.087")]
    pub exchange_rate: Decimal,
}

/// Ordering of `left` relative to `right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoneyOrdering {
    Less,
    Equal,
    Greater,
}

impl From<std::cmp::Ordering> for MoneyOrdering {
    fn from(ordering: std::cmp::Ordering) -> Self {
        match ordering {
            std::cmp::Ordering::Less => MoneyOrdering::Less,
            std::cmp::Ordering::Equal => MoneyOrdering::Equal,
            std::cmp::Ordering::Greater => MoneyOrdering::Greater,
        }
    }
}

/// Result of comparing two amounts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompareResponse {
    pub ordering: MoneyOrdering,
    pub is_greater_than: bool,
    /// Whether `left` covers `right`
    pub is_sufficient: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Card DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Raw card data submitted for tokenization.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenizeCardRequest {
    #[schema(example = "4111 1111 1111 1111")]
    pub card_number: String,
    #[schema(example = "Jane Doe")]
    pub cardholder_name: String,
    #[schema(example = 12)]
    pub expiry_month: u32,
    #[schema(example = 2030)]
    pub expiry_year: i32,
    #[schema(example = "123")]
    pub cvv: String,
}

impl std::fmt::Debug for TokenizeCardRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenizeCardRequest")
            .field("card_number", &"[REDACTED]")
            .field("cardholder_name", &self.cardholder_name)
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Previously tokenized card data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestoreCardRequest {
    pub token: String,
    #[schema(example = "4111********1111")]
    pub masked_number: String,
    #[schema(example = "1111")]
    pub last4_digits: String,
    pub cardholder_name: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    #[schema(example = "Visa")]
    pub card_type: String,
    #[serde(default)]
    pub brand: CardBrand,
}

/// Masked and derived card fields; never the number or CVV.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardResponse {
    pub token: String,
    #[schema(example = "4111********1111")]
    pub masked_number: String,
    #[schema(example = "1111")]
    pub last4_digits: String,
    pub cardholder_name: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    #[schema(example = "Visa")]
    pub card_type: String,
    pub brand: CardBrand,
    /// Deduplication key
    #[schema(example = "Visa_1111_122030")]
    pub unique_identifier: String,
    pub is_expired: bool,
}

impl From<&CreditCard> for CardResponse {
    fn from(card: &CreditCard) -> Self {
        Self {
            token: card.token().to_string(),
            masked_number: card.masked_number().to_string(),
            last4_digits: card.last4_digits().to_string(),
            cardholder_name: card.cardholder_name().to_string(),
            expiry_month: card.expiry_month(),
            expiry_year: card.expiry_year(),
            card_type: card.card_type().to_string(),
            brand: card.brand(),
            unique_identifier: card.unique_identifier(),
            is_expired: card.is_expired(),
        }
    }
}
