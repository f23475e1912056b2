//! Conversion Application Service
//!
//! Validates request parameters, looks up rates through the provider port and
//! converts amounts. Contains no infrastructure logic.

use conversion_types::{Conversion, ConversionError, RateProvider, RateQuote};

/// Application service for rate lookups and conversions.
///
/// Generic over `P: RateProvider` - the upstream client is injected at
/// construction, so tests can substitute a mock provider.
pub struct ConversionService<P: RateProvider> {
    provider: P,
}

impl<P: RateProvider> ConversionService<P> {
    /// Creates a new conversion service backed by the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns a reference to the underlying rate provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Looks up the rate from `input` to `output`.
    ///
    /// Every missing parameter is reported, and nothing is fetched unless
    /// both are present.
    #[tracing::instrument(skip(self))]
    pub async fn get_rate(
        &self,
        input: Option<&str>,
        output: Option<&str>,
    ) -> Result<RateQuote, ConversionError> {
        let mut errors = Vec::new();
        let input = require(input, "input_currency_type", &mut errors);
        let output = require(output, "output_currency_type", &mut errors);

        let (Some(input), Some(output)) = (input, output) else {
            return Err(ConversionError::Validation(errors));
        };

        self.quote(input, output).await
    }

    /// Converts `input_value` units of `input` into `output`.
    #[tracing::instrument(skip(self))]
    pub async fn convert(
        &self,
        input: Option<&str>,
        input_value: Option<&str>,
        output: Option<&str>,
    ) -> Result<Conversion, ConversionError> {
        let mut errors = Vec::new();
        let input = require(input, "input_currency_type", &mut errors);
        let amount = match require(input_value, "input_value", &mut errors) {
            Some(text) => {
                let parsed = parse_amount(text);
                if parsed.is_none() {
                    errors.push("input_value must be a decimal value".to_string());
                }
                parsed
            }
            None => None,
        };
        let output = require(output, "output_currency_type", &mut errors);

        let (Some(input), Some(amount), Some(output)) = (input, amount, output) else {
            return Err(ConversionError::Validation(errors));
        };

        let quote = self.quote(input, output).await?;
        tracing::debug!(amount, rate = quote.rate, "Converting amount");
        let conversion = quote.apply(amount);
        if !conversion.converted_value.is_finite() {
            return Err(ConversionError::Validation(vec![
                "input_value is too large to convert".to_string(),
            ]));
        }
        Ok(conversion)
    }

    async fn quote(&self, input: &str, output: &str) -> Result<RateQuote, ConversionError> {
        let table = self.provider.get_rates(input).await?;
        let rate = table
            .rate_for(output)
            .ok_or_else(|| ConversionError::UnknownCurrency(output.to_string()))?;

        tracing::debug!(input, output, rate, "Resolved conversion rate");
        Ok(RateQuote {
            input_currency: input.to_string(),
            output_currency: output.to_string(),
            rate,
        })
    }
}

/// Returns the trimmed value if it is present and not blank, recording an
/// error otherwise.
fn require<'a>(value: Option<&'a str>, name: &str, errors: &mut Vec<String>) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(format!("specify {name} query parameter"));
            None
        }
    }
}

/// Parses a decimal amount. Infinities and NaN are not amounts.
fn parse_amount(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}
