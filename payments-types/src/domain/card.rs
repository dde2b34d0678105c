//! Credit card value object.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::Serialize;

use super::card_number::{self, CardBrand};
use super::token::LocalTokenizer;
use crate::error::DomainError;
use crate::ports::CardTokenizer;

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 100;
/// How far ahead an expiry year may lie.
const MAX_EXPIRY_YEARS_AHEAD: i32 = 20;

/// A validated, tokenized payment card.
///
/// Only masked and derived data is held: the raw number and CVV are consumed
/// by [`CreditCard::create`] and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditCard {
    masked_number: String,
    last4_digits: String,
    cardholder_name: String,
    expiry_month: u32,
    expiry_year: i32,
    card_type: String,
    brand: CardBrand,
    token: String,
}

impl CreditCard {
    /// Validates raw card data and tokenizes it with the [`LocalTokenizer`].
    pub fn create(
        card_number: &str,
        cardholder_name: &str,
        expiry_month: u32,
        expiry_year: i32,
        cvv: &str,
    ) -> Result<Self, DomainError> {
        Self::create_with(
            card_number,
            cardholder_name,
            expiry_month,
            expiry_year,
            cvv,
            Utc::now(),
            &LocalTokenizer::new(),
        )
    }

    /// Validates raw card data against `now` and tokenizes it with `tokenizer`.
    ///
    /// Checks run in order: number, cardholder name, expiry, CVV.
    pub fn create_with(
        card_number: &str,
        cardholder_name: &str,
        expiry_month: u32,
        expiry_year: i32,
        cvv: &str,
        now: DateTime<Utc>,
        tokenizer: &dyn CardTokenizer,
    ) -> Result<Self, DomainError> {
        let digits = card_number::clean(card_number);
        if !card_number::is_valid(&digits) {
            return Err(DomainError::InvalidCardNumber);
        }

        let name = cardholder_name.trim();
        let name_len = name.chars().count();
        if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&name_len) {
            return Err(DomainError::InvalidCardholderName);
        }

        validate_expiry(expiry_month, expiry_year, now)?;

        if !(3..=4).contains(&cvv.len()) || !cvv.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidCvv);
        }

        let brand = CardBrand::detect(&digits);
        let token = tokenizer
            .tokenize(&digits, cvv)
            .map_err(|e| DomainError::Tokenization(e.to_string()))?;

        Ok(Self {
            masked_number: card_number::mask(&digits),
            last4_digits: card_number::last_four(&digits).to_string(),
            cardholder_name: name.to_string(),
            expiry_month,
            expiry_year,
            card_type: brand.display_name().to_string(),
            brand,
            token,
        })
    }

    /// Rebuilds a card from previously tokenized data.
    #[allow(clippy::too_many_arguments)]
    pub fn from_token(
        token: impl Into<String>,
        masked_number: impl Into<String>,
        last4_digits: impl Into<String>,
        cardholder_name: impl Into<String>,
        expiry_month: u32,
        expiry_year: i32,
        card_type: impl Into<String>,
        brand: CardBrand,
    ) -> Result<Self, DomainError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DomainError::EmptyToken);
        }

        Ok(Self {
            masked_number: masked_number.into(),
            last4_digits: last4_digits.into(),
            cardholder_name: cardholder_name.into(),
            expiry_month,
            expiry_year,
            card_type: card_type.into(),
            brand,
            token,
        })
    }

    pub fn masked_number(&self) -> &str {
        &self.masked_number
    }

    pub fn last4_digits(&self) -> &str {
        &self.last4_digits
    }

    pub fn cardholder_name(&self) -> &str {
        &self.cardholder_name
    }

    pub fn expiry_month(&self) -> u32 {
        self.expiry_month
    }

    pub fn expiry_year(&self) -> i32 {
        self.expiry_year
    }

    pub fn card_type(&self) -> &str {
        &self.card_type
    }

    pub fn brand(&self) -> CardBrand {
        self.brand
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Last day of the expiry month, `None` for out-of-range stored values.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        last_day_of_month(self.expiry_year, self.expiry_month)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A card stays valid through the last day of its expiry month.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date()
            .is_none_or(|expiry| expiry < now.date_naive())
    }

    pub fn expires_within(&self, window: TimeDelta) -> bool {
        self.expires_within_at(window, Utc::now())
    }

    /// True when the card expires on or before `now + window`.
    pub fn expires_within_at(&self, window: TimeDelta, now: DateTime<Utc>) -> bool {
        let horizon = now
            .checked_add_signed(window)
            .map(|t| t.date_naive())
            .unwrap_or(NaiveDate::MAX);
        self.expiry_date()
            .is_none_or(|expiry| expiry <= horizon)
    }

    /// Deduplication key `"{card_type}_{last4}_{MM}{YYYY}"`. Not a secret.
    pub fn unique_identifier(&self) -> String {
        format!(
            "{}_{}_{:02}{}",
            self.card_type, self.last4_digits, self.expiry_month, self.expiry_year
        )
    }
}

fn validate_expiry(month: u32, year: i32, now: DateTime<Utc>) -> Result<(), DomainError> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::InvalidExpiry);
    }
    let current_year = now.year();
    if year < current_year || year > current_year + MAX_EXPIRY_YEARS_AHEAD {
        return Err(DomainError::InvalidExpiry);
    }
    match last_day_of_month(year, month) {
        Some(expiry) if expiry >= now.date_naive() => Ok(()),
        _ => Err(DomainError::InvalidExpiry),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TokenizerError;
    use chrono::TimeZone;

    const VISA: &str = "4111 1111 1111 1111";
    const CVV: &str = "123";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn card(
        number: &str,
        name: &str,
        month: u32,
        year: i32,
        cvv: &str,
    ) -> Result<CreditCard, DomainError> {
        CreditCard::create_with(number, name, month, year, cvv, now(), &LocalTokenizer::new())
    }

    struct FailingVault;

    impl CardTokenizer for FailingVault {
        fn tokenize(&self, _: &str, _: &str) -> Result<String, TokenizerError> {
            Err(TokenizerError("vault offline".into()))
        }
    }

    #[test]
    fn test_create_valid_card() {
        let card = card(VISA, "  Jane Doe ", 12, 2028, CVV).unwrap();
        assert_eq!(card.masked_number(), "4111********1111");
        assert_eq!(card.last4_digits(), "1111");
        assert_eq!(card.cardholder_name(), "Jane Doe");
        assert_eq!(card.brand(), CardBrand::Visa);
        assert_eq!(card.card_type(), "Visa");
        assert_eq!(card.token().len(), crate::domain::TOKEN_LENGTH);
    }

    #[test]
    fn test_create_with_wall_clock() {
        let year = Utc::now().year() + 2;
        let card = CreditCard::create("5555-5555-5555-4444", "Jo", 6, year, "1234").unwrap();
        assert_eq!(card.brand(), CardBrand::Mastercard);
        assert!(!card.is_expired());
    }

    #[test]
    fn test_raw_number_and_cvv_are_not_retained() {
        let raw = "4111111111111111";
        let card = card(raw, "Jane Doe", 12, 2028, "987").unwrap();
        let fields = [
            card.masked_number(),
            card.last4_digits(),
            card.cardholder_name(),
            card.card_type(),
            card.token(),
        ];
        for field in fields {
            assert_ne!(field, raw);
            assert_ne!(field, "987");
            assert!(!field.contains(raw));
        }
        let debug = format!("{:?}", card);
        assert!(!debug.contains(raw));
        assert!(!debug.contains("987"));
    }

    #[test]
    fn test_invalid_card_number() {
        for number in ["4111111111111112", "4111", "4111-1111-1111-111x", ""] {
            assert!(matches!(
                card(number, "Jane Doe", 12, 2028, CVV),
                Err(DomainError::InvalidCardNumber)
            ));
        }
    }

    #[test]
    fn test_invalid_cardholder_name() {
        let long = "x".repeat(101);
        for name in ["", "   ", "J", long.as_str()] {
            assert!(matches!(
                card(VISA, name, 12, 2028, CVV),
                Err(DomainError::InvalidCardholderName)
            ));
        }
        assert!(card(VISA, &"x".repeat(100), 12, 2028, CVV).is_ok());
    }

    #[test]
    fn test_invalid_expiry() {
        for (month, year) in [(0, 2028), (13, 2028), (12, 2025), (2, 2026), (1, 2047)] {
            assert!(
                matches!(card(VISA, "Jane Doe", month, year, CVV), Err(DomainError::InvalidExpiry)),
                "{month}/{year} should be rejected"
            );
        }
        // The current month is still valid, as is the last allowed year.
        assert!(card(VISA, "Jane Doe", 3, 2026, CVV).is_ok());
        assert!(card(VISA, "Jane Doe", 1, 2046, CVV).is_ok());
    }

    #[test]
    fn test_invalid_cvv() {
        for cvv in ["", "12", "12345", "12a"] {
            assert!(matches!(
                card(VISA, "Jane Doe", 12, 2028, cvv),
                Err(DomainError::InvalidCvv)
            ));
        }
    }

    #[test]
    fn test_tokenizer_failure_surfaces() {
        let result = CreditCard::create_with(VISA, "Jane Doe", 12, 2028, CVV, now(), &FailingVault);
        assert!(matches!(result, Err(DomainError::Tokenization(msg)) if msg == "vault offline"));
    }

    #[test]
    fn test_from_token_round_trip() {
        let original = card("378282246310005", "Ada Lovelace", 7, 2030, "1234").unwrap();
        let restored = CreditCard::from_token(
            original.token(),
            original.masked_number(),
            original.last4_digits(),
            original.cardholder_name(),
            original.expiry_month(),
            original.expiry_year(),
            original.card_type(),
            original.brand(),
        )
        .unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.unique_identifier(), original.unique_identifier());
    }

    #[test]
    fn test_from_token_rejects_blank_token() {
        let result = CreditCard::from_token(
            "  ",
            "4111********1111",
            "1111",
            "Jane Doe",
            1,
            2030,
            "Visa",
            CardBrand::Visa,
        );
        assert!(matches!(result, Err(DomainError::EmptyToken)));
    }

    #[test]
    fn test_expiry_checks() {
        let card = card(VISA, "Jane Doe", 4, 2026, CVV).unwrap();
        assert_eq!(card.expiry_date(), NaiveDate::from_ymd_opt(2026, 4, 30));
        assert!(!card.is_expired_at(now()));
        assert!(!card.is_expired_at(Utc.with_ymd_and_hms(2026, 4, 30, 23, 59, 59).unwrap()));
        assert!(card.is_expired_at(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()));

        assert!(card.expires_within_at(TimeDelta::days(60), now()));
        assert!(!card.expires_within_at(TimeDelta::days(30), now()));
    }

    #[test]
    fn test_unique_identifier() {
        let card = card(VISA, "Jane Doe", 3, 2029, CVV).unwrap();
        assert_eq!(card.unique_identifier(), "Visa_1111_032029");
    }
}
