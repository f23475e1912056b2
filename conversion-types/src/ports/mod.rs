//! Port traits (interfaces for adapters).
//!
//! The conversion service depends on these traits, not on a concrete
//! upstream client.

mod rates;

pub use rates::{ClientError, RateProvider};
