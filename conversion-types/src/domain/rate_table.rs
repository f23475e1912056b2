//! Exchange rates for a single base currency.

use std::collections::HashMap;

/// Rates from one base currency to every currency the upstream supports.
///
/// Built fresh for every request and never mutated afterwards. Currency codes
/// are kept exactly as the upstream returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Creates a rate table for `base`.
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        Self {
            base: base.into(),
            rates,
        }
    }

    /// Returns the base currency the rates are expressed against.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns how many units of `code` one unit of the base buys.
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
