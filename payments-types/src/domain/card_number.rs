//! Card number helpers: cleaning, Luhn checksum, brand detection and masking.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shortest and longest accepted primary account numbers.
pub const MIN_CARD_DIGITS: usize = 13;
pub const MAX_CARD_DIGITS: usize = 19;

/// Card network, detected from the leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
    #[default]
    Unknown,
    Visa,
    Mastercard,
    AmericanExpress,
    Discover,
    Jcb,
    DinersClub,
}

impl CardBrand {
    /// Detects the brand from a cleaned (digits only) card number.
    pub fn detect(digits: &str) -> Self {
        let prefix = |len: usize| digits.get(..len).and_then(|p| p.parse::<u32>().ok());

        if digits.starts_with('4') {
            CardBrand::Visa
        } else if digits.starts_with('5')
            || prefix(4).is_some_and(|p| (2221..=2720).contains(&p))
        {
            CardBrand::Mastercard
        } else if matches!(prefix(2), Some(34 | 37)) {
            CardBrand::AmericanExpress
        } else if prefix(4) == Some(6011) || prefix(2) == Some(65) {
            CardBrand::Discover
        } else if prefix(2) == Some(35) {
            CardBrand::Jcb
        } else if matches!(prefix(2), Some(30 | 36 | 38)) {
            CardBrand::DinersClub
        } else {
            CardBrand::Unknown
        }
    }

    /// Human-readable card type.
    pub fn display_name(&self) -> &'static str {
        match self {
            CardBrand::Unknown => "Unknown",
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::AmericanExpress => "American Express",
            CardBrand::Discover => "Discover",
            CardBrand::Jcb => "JCB",
            CardBrand::DinersClub => "Diners Club",
        }
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Removes the spaces and dashes people type into card numbers.
pub fn clean(number: &str) -> String {
    number.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// Returns true for 13 to 19 ASCII digits that pass the Luhn checksum.
pub fn is_valid(digits: &str) -> bool {
    (MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
        && luhn_checksum(digits) == Some(0)
}

/// Luhn mod-10 sum, doubling every second digit from the right.
pub fn luhn_checksum(digits: &str) -> Option<u32> {
    let mut sum = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let mut digit = c.to_digit(10)?;
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    Some(sum % 10)
}

/// First four and last four digits visible, everything else starred.
/// Numbers of eight digits or fewer are starred entirely.
pub fn mask(digits: &str) -> String {
    let len = digits.chars().count();
    if len <= 8 {
        return "*".repeat(len);
    }
    digits
        .chars()
        .enumerate()
        .map(|(i, c)| if i < 4 || i >= len - 4 { c } else { '*' })
        .collect()
}

/// Last four characters, or the whole input when shorter.
pub fn last_four(digits: &str) -> &str {
    let start = digits
        .char_indices()
        .rev()
        .nth(3)
        .map_or(0, |(i, _)| i);
    &digits[start..]
}
