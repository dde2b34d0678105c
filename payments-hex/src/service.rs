//! Payment Application Service
//!
//! Orchestrates value-object operations and the outbound ports.
//! Contains NO infrastructure logic - pure business orchestration.

use chrono::Utc;
use rust_decimal::Decimal;

use payments_types::{
    AppError, CardResponse, CardTokenizer, CompareResponse, ConvertRequest, ConvertResponse,
    CreditCard, Currency, CurrencyResponse, DiscountRequest, DomainError, ExchangeRateProvider,
    Money, MoneyPairRequest, MoneyResponse, MultiplyRequest, RestoreCardRequest, SplitRequest,
    SplitResponse, TokenizeCardRequest,
};

/// Application service for money and card operations.
///
/// Generic over the exchange-rate provider and the card tokenizer - adapters
/// are injected at compile time.
pub struct PaymentService<X: ExchangeRateProvider, T: CardTokenizer> {
    rates: X,
    tokenizer: T,
}

impl<X: ExchangeRateProvider, T: CardTokenizer> PaymentService<X, T> {
    /// Creates a new payment service with the given adapters.
    pub fn new(rates: X, tokenizer: T) -> Self {
        Self { rates, tokenizer }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Currency Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists every supported currency.
    pub fn list_currencies(&self) -> Vec<CurrencyResponse> {
        Currency::all().into_iter().map(Into::into).collect()
    }

    /// Gets a currency by code.
    pub fn get_currency(&self, code: &str) -> Result<CurrencyResponse, AppError> {
        Currency::from_code(code)
            .map(Into::into)
            .map_err(|_| AppError::NotFound(format!("Currency {}", code)))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Money Operations
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn add(&self, req: MoneyPairRequest) -> Result<MoneyResponse, AppError> {
        let (left, right) = money_pair(req)?;
        Ok(left.add(&right)?.into())
    }

    pub fn subtract(&self, req: MoneyPairRequest) -> Result<MoneyResponse, AppError> {
        let (left, right) = money_pair(req)?;
        Ok(left.subtract(&right)?.into())
    }

    pub fn compare(&self, req: MoneyPairRequest) -> Result<CompareResponse, AppError> {
        let (left, right) = money_pair(req)?;
        Ok(CompareResponse {
            ordering: left.compare(&right)?.into(),
            is_greater_than: left.is_greater_than(&right)?,
            is_sufficient: left.is_sufficient_for(&right)?,
        })
    }

    pub fn multiply(&self, req: MultiplyRequest) -> Result<MoneyResponse, AppError> {
        let money = Money::try_from(req.money)?;
        Ok(money.multiply(req.factor)?.into())
    }

    pub fn discount(&self, req: DiscountRequest) -> Result<MoneyResponse, AppError> {
        let money = Money::try_from(req.money)?;
        Ok(money.apply_discount(req.percent)?.into())
    }

    pub fn split(&self, req: SplitRequest) -> Result<SplitResponse, AppError> {
        let money = Money::try_from(req.money)?;
        let parts = money.split(req.parts)?.map(Into::into).collect();
        Ok(SplitResponse { parts })
    }

    /// Converts an amount, asking the rate provider when no rate is given.
    pub async fn convert(&self, req: ConvertRequest) -> Result<ConvertResponse, AppError> {
        let money = Money::try_from(req.money)?;
        let target = Currency::from_code(&req.target_currency)?;

        let exchange_rate = match req.exchange_rate {
            Some(rate) => rate,
            None if target == money.currency() => Decimal::ONE,
            None => self.rates.get_rate(money.currency(), target).await?,
        };

        let converted = money.convert_to(target.code(), exchange_rate)?;
        Ok(ConvertResponse {
            money: converted.into(),
            exchange_rate,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Card Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates and tokenizes raw card data.
    pub fn tokenize_card(&self, req: TokenizeCardRequest) -> Result<CardResponse, AppError> {
        let card = CreditCard::create_with(
            &req.card_number,
            &req.cardholder_name,
            req.expiry_month,
            req.expiry_year,
            &req.cvv,
            Utc::now(),
            &self.tokenizer,
        )?;

        tracing::info!(brand = %card.brand(), last4 = card.last4_digits(), "Card tokenized");
        Ok(CardResponse::from(&card))
    }

    /// Rebuilds a card view from tokenized data.
    pub fn restore_card(&self, req: RestoreCardRequest) -> Result<CardResponse, AppError> {
        let card = CreditCard::from_token(
            req.token,
            req.masked_number,
            req.last4_digits,
            req.cardholder_name,
            req.expiry_month,
            req.expiry_year,
            req.card_type,
            req.brand,
        )?;
        Ok(CardResponse::from(&card))
    }
}

fn money_pair(req: MoneyPairRequest) -> Result<(Money, Money), DomainError> {
    Ok((Money::try_from(req.left)?, Money::try_from(req.right)?))
}
