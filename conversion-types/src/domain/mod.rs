//! Domain models for currency conversion.

pub mod conversion;
pub mod rate_table;

pub use conversion::{Conversion, RateQuote, round_to_cents};
pub use rate_table::RateTable;
