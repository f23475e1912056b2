//! Results of rate lookups and currency conversions.

/// Rate between two currencies as reported by the upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub input_currency: String,
    pub output_currency: String,
    /// Units of the output currency per unit of the input currency. Unrounded.
    pub rate: f64,
}

impl RateQuote {
    /// Applies the quote to `amount`, producing a conversion rounded to cents.
    pub fn apply(self, amount: f64) -> Conversion {
        Conversion {
            converted_value: round_to_cents(self.rate * amount),
            input_currency: self.input_currency,
            output_currency: self.output_currency,
            amount,
            rate: self.rate,
        }
    }
}

/// An amount converted from one currency to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub input_currency: String,
    pub output_currency: String,
    pub amount: f64,
    pub rate: f64,
    /// `rate * amount` rounded to two decimal places, ties to even.
    pub converted_value: f64,
}

/// Rounds to two decimal places using round-half-to-even.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
