//! Type-safe monetary value with embedded currency.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use crate::error::DomainError;

/// Type-safe money representation with embedded currency.
///
/// The amount is a non-negative decimal rounded half away from zero to the
/// currency's precision and always carried at exactly that scale, so `EUR 80`
/// and `EUR 80.00` are the same value. Every operation returns a new `Money`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

/// Unvalidated wire shape; decoding goes through [`Money::new`].
#[derive(Deserialize)]
struct RawMoney {
    amount: Decimal,
    currency: Currency,
}

impl TryFrom<RawMoney> for Money {
    type Error = DomainError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.amount, raw.currency)
    }
}

impl Money {
    /// Creates a new Money value, rounding to the currency precision.
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, DomainError> {
        if amount < Decimal::ZERO {
            return Err(DomainError::InvalidAmount);
        }
        Ok(Self {
            amount: round_to_currency(amount, currency)?,
            currency,
        })
    }

    /// Creates a Money value from an amount and a currency code.
    pub fn of(amount: Decimal, currency_code: &str) -> Result<Self, DomainError> {
        Self::new(amount, Currency::from_code(currency_code)?)
    }

    /// Creates a zero-value Money for the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::new(0, u32::from(currency.decimal_places())),
            currency,
        }
    }

    /// Creates a Money value from a count of the currency's smallest unit.
    pub fn from_minor_units(minor: i64, currency: Currency) -> Result<Self, DomainError> {
        if minor < 0 {
            return Err(DomainError::InvalidAmount);
        }
        Self::new(
            Decimal::new(minor, u32::from(currency.decimal_places())),
            currency,
        )
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns the amount in the smallest currency unit (cents, fils, ...).
    pub fn to_minor_units(&self) -> Result<i64, DomainError> {
        self.amount
            .checked_mul(smallest_unit_factor(self.currency)?)
            .and_then(|minor| minor.to_i64())
            .ok_or(DomainError::AmountOverflow)
    }

    /// Adds two amounts of the same currency.
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or(DomainError::AmountOverflow)?;
        Money::new(sum, self.currency)
    }

    /// Subtracts `other`, failing rather than going below zero.
    pub fn subtract(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        if self.amount < other.amount {
            return Err(DomainError::NegativeResult);
        }
        Money::new(self.amount - other.amount, self.currency)
    }

    /// Multiplies by a non-negative factor.
    pub fn multiply(&self, factor: Decimal) -> Result<Money, DomainError> {
        if factor < Decimal::ZERO {
            return Err(DomainError::InvalidFactor);
        }
        let product = self
            .amount
            .checked_mul(factor)
            .ok_or(DomainError::AmountOverflow)?;
        Money::new(product, self.currency)
    }

    /// Takes `percent` percent off the amount. `percent` must lie in `[0, 100]`.
    pub fn apply_discount(&self, percent: Decimal) -> Result<Money, DomainError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(DomainError::InvalidPercent);
        }
        let discount = self
            .amount
            .checked_mul(percent / Decimal::ONE_HUNDRED)
            .ok_or(DomainError::AmountOverflow)?;
        Money::new(self.amount - discount, self.currency)
    }

    /// Splits the amount into `parts` pieces that differ by at most one smallest unit.
    ///
    /// The leftover units go to the first pieces, so the pieces always add up
    /// to exactly the original amount.
    pub fn split(&self, parts: i64) -> Result<Split, DomainError> {
        if parts <= 0 {
            return Err(DomainError::InvalidPartCount);
        }
        let count = Decimal::from(parts);
        let unit = smallest_unit(self.currency);

        let base = (self.amount / count)
            .round_dp_with_strategy(u32::from(self.currency.decimal_places()), RoundingStrategy::ToZero);
        let leftover = self.amount - base * count;
        let remainder = (leftover / unit)
            .to_i64()
            .ok_or(DomainError::AmountOverflow)?;

        Ok(Split {
            base,
            unit,
            currency: self.currency,
            remainder,
            index: 0,
            parts,
        })
    }

    /// Orders two amounts of the same currency.
    pub fn compare(&self, other: &Money) -> Result<Ordering, DomainError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn is_greater_than(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn is_greater_or_equal(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    pub fn is_less_than(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn is_less_or_equal(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    /// Returns true if this amount covers `required`.
    pub fn is_sufficient_for(&self, required: &Money) -> Result<bool, DomainError> {
        self.is_greater_or_equal(required)
    }

    /// Converts into `target_code` at `exchange_rate` target units per source unit.
    ///
    /// Converting into the current currency returns the value unchanged.
    pub fn convert_to(&self, target_code: &str, exchange_rate: Decimal) -> Result<Money, DomainError> {
        if exchange_rate <= Decimal::ZERO {
            return Err(DomainError::InvalidExchangeRate);
        }
        let target = Currency::from_code(target_code)?;
        if target == self.currency {
            return Ok(*self);
        }
        let converted = self
            .amount
            .checked_mul(exchange_rate)
            .ok_or(DomainError::AmountOverflow)?;
        Money::new(converted, target)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency.code() != other.currency.code() {
            return Err(DomainError::CurrencyMismatch {
                expected: self.currency,
                got: other.currency,
            });
        }
        Ok(())
    }
}

impl PartialOrd for Money {
    /// Amounts in different currencies are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.*}",
            self.currency.symbol(),
            usize::from(self.currency.decimal_places()),
            self.amount
        )
    }
}

/// Iterator over the pieces produced by [`Money::split`].
///
/// Yields exactly `parts` values and cannot be restarted.
#[derive(Debug)]
pub struct Split {
    base: Decimal,
    unit: Decimal,
    currency: Currency,
    remainder: i64,
    index: i64,
    parts: i64,
}

impl Iterator for Split {
    type Item = Money;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.parts {
            return None;
        }
        let amount = if self.index < self.remainder {
            self.base + self.unit
        } else {
            self.base
        };
        self.index += 1;
        Some(Money {
            amount: at_scale(amount, self.currency),
            currency: self.currency,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.parts - self.index).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Split {}

impl FusedIterator for Split {}

/// Rounds to the currency precision and pins the scale to it.
///
/// Fails when the mantissa has no room left for the trailing zeros.
fn round_to_currency(amount: Decimal, currency: Currency) -> Result<Decimal, DomainError> {
    let places = u32::from(currency.decimal_places());
    let rounded = at_scale(
        amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero),
        currency,
    );
    if rounded.scale() != places {
        return Err(DomainError::AmountOverflow);
    }
    Ok(rounded)
}

/// Pins the scale to the currency precision. Falls short only near the top of
/// the `Decimal` range; split pieces are bounded by the original amount, which fits.
fn at_scale(mut amount: Decimal, currency: Currency) -> Decimal {
    amount.rescale(u32::from(currency.decimal_places()));
    amount
}

/// One smallest unit of the currency (0.01 for two decimal places).
fn smallest_unit(currency: Currency) -> Decimal {
    Decimal::new(1, u32::from(currency.decimal_places()))
}

fn smallest_unit_factor(currency: Currency) -> Result<Decimal, DomainError> {
    10i64
        .checked_pow(u32::from(currency.decimal_places()))
        .map(Decimal::from)
        .ok_or(DomainError::AmountOverflow)
}
