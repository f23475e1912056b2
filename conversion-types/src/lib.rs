//! # Conversion Types
//!
//! Domain types and port traits for the currency conversion service.
//! This crate has no IO dependencies - only data structures, conversion
//! rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Rate tables, quotes and conversions
//! - `ports/` - The rate provider port that upstream adapters implement
//! - `dto/` - Query parameters and response bodies for the HTTP boundary
//! - `error/` - Service-level error taxonomy

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{Conversion, RateQuote, RateTable, round_to_cents};
pub use dto::*;
pub use error::ConversionError;
pub use ports::{ClientError, RateProvider};
