//! Card tokenization port.
//!
//! A real deployment hands the primary account number to a vault and keeps
//! only the returned reference. [`crate::domain::LocalTokenizer`] is the
//! in-process stand-in.

/// Error raised by a tokenizer backend.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TokenizerError(pub String);

/// Turns raw card data into an opaque, non-reversible token.
///
/// Implementations must never return anything from which the card number or
/// CVV can be recovered.
pub trait CardTokenizer: Send + Sync + 'static {
    fn tokenize(&self, card_number: &str, cvv: &str) -> Result<String, TokenizerError>;
}
