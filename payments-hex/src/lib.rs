//! # Payments Hex
//!
//! Application service layer and adapters for the payments service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates value-object operations)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `outbound/` - Port implementations (static exchange rates)
//!
//! The service is generic over `X: ExchangeRateProvider` and
//! `T: CardTokenizer`, allowing different adapters to be injected.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod security;
pub mod service;


pub use service::PaymentService;
