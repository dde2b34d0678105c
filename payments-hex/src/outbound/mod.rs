//! Outbound adapters implementing the service ports.

mod rates;

pub use rates::StaticRateProvider;
