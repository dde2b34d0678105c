//! Domain models for the payment service.

pub mod card;
pub mod card_number;
pub mod currency;
pub mod money;
pub mod token;

pub use card::CreditCard;
pub use card_number::CardBrand;
pub use currency::Currency;
pub use money::{Money, Split};
pub use token::{LocalTokenizer, TOKEN_LENGTH};
