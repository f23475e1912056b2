//! Data Transfer Objects for the HTTP boundary.
//!
//! Field names are part of the public API and must not be renamed.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Conversion, RateQuote};

// ─────────────────────────────────────────────────────────────────────────────
// Query parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for `GET /conversion-rate`.
///
/// Every field is optional so that missing parameters reach the service and
/// are reported together instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversionRateQuery {
    /// Base currency code
    #[param(example = "USD")]
    pub input_currency_type: Option<String>,
    /// Target currency code
    #[param(example = "EUR")]
    pub output_currency_type: Option<String>,
}

/// Query parameters for `GET /conversion`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversionQuery {
    /// Currency the amount is expressed in
    #[param(example = "USD")]
    pub input_currency_type: Option<String>,
    /// Amount to convert, as a decimal string
    #[param(example = "10.50")]
    pub input_value: Option<String>,
    /// Currency to convert into
    #[param(example = "EUR")]
    pub output_currency_type: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Request parameters restated in a rate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionRateParams {
    #[schema(example = "USD")]
    pub input_currency_type: String,
    #[schema(example = "EUR")]
    pub output_currency_type: String,
}

/// Response for `GET /conversion-rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionRateResponse {
    pub params_in: ConversionRateParams,
    /// Value of one unit of the input currency in the output currency
    #[schema(example = 0.92)]
    pub conversion_rate: f64,
}

impl From<RateQuote> for ConversionRateResponse {
    fn from(quote: RateQuote) -> Self {
        Self {
            params_in: ConversionRateParams {
                input_currency_type: quote.input_currency,
                output_currency_type: quote.output_currency,
            },
            conversion_rate: quote.rate,
        }
    }
}

/// Request parameters restated in a conversion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionParams {
    #[schema(example = "USD")]
    pub input_currency: String,
    /// The amount exactly as it was sent
    #[schema(example = "10")]
    pub input_value: String,
    #[schema(example = "EUR")]
    pub output_currency_type: String,
}

/// Response for `GET /conversion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionResponse {
    pub params_in: ConversionParams,
    /// Converted amount rounded to two decimal places
    #[schema(example = 9.2)]
    pub converted_value: f64,
}

impl ConversionResponse {
    /// Builds the response, echoing the caller's original `input_value` text.
    pub fn new(conversion: Conversion, input_value: impl Into<String>) -> Self {
        Self {
            params_in: ConversionParams {
                input_currency: conversion.input_currency,
                input_value: input_value.into(),
                output_currency_type: conversion.output_currency,
            },
            converted_value: conversion.converted_value,
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = json!(["specify input_currency_type query parameter"]))]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rate_response_shape() {
        let response = ConversionRateResponse::from(RateQuote {
            input_currency: "USD".into(),
            output_currency: "EUR".into(),
            rate: 0.92,
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "params_in": {"input_currency_type": "USD", "output_currency_type": "EUR"},
                "conversion_rate": 0.92
            })
        );
    }

    #[test]
    fn test_conversion_response_echoes_raw_input_value() {
        let quote = RateQuote {
            input_currency: "USD".into(),
            output_currency: "EUR".into(),
            rate: 0.92,
        };
        let response = ConversionResponse::new(quote.apply(10.0), "10.0");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "params_in": {
                    "input_currency": "USD",
                    "input_value": "10.0",
                    "output_currency_type": "EUR"
                },
                "converted_value": 9.2
            })
        );
    }

    #[test]
    fn test_query_tolerates_missing_fields() {
        let query: ConversionQuery = serde_json::from_value(json!({"input_value": "3"})).unwrap();
        assert_eq!(query.input_value.as_deref(), Some("3"));
        assert!(query.input_currency_type.is_none());
        assert!(query.output_currency_type.is_none());
    }
}
