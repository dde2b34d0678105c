//! # Payments Types
//!
//! Value objects and port traits for the payment service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure value types (Currency, Money, CreditCard)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{CardBrand, CreditCard, Currency, LocalTokenizer, Money, Split};
pub use dto::*;
pub use error::{AppError, DomainError};
pub use ports::{CardTokenizer, ExchangeError, ExchangeRateProvider, TokenizerError};
