//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use conversion_types::dto::{
    ConversionParams, ConversionQuery, ConversionRateParams, ConversionRateQuery,
    ConversionRateResponse, ConversionResponse, ErrorResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Get the rate between two currencies
#[utoipa::path(
    get,
    path = "/conversion-rate",
    tag = "conversion",
    params(ConversionRateQuery),
    responses(
        (status = 200, description = "Value of one unit of the input currency in the output currency", body = ConversionRateResponse),
        (status = 400, description = "Missing parameter, unknown currency or upstream failure", body = ErrorResponse),
        (status = 429, description = "Too many requests from this caller")
    )
)]
async fn conversion_rate() {}

/// Convert an amount between two currencies
#[utoipa::path(
    get,
    path = "/conversion",
    tag = "conversion",
    params(ConversionQuery),
    responses(
        (status = 200, description = "Converted amount rounded to two decimal places", body = ConversionResponse),
        (status = 400, description = "Missing or invalid parameter, unknown currency or upstream failure", body = ErrorResponse),
        (status = 429, description = "Too many requests from this caller")
    )
)]
async fn conversion() {}

/// OpenAPI documentation for the Conversion API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Conversion Service API",
        version = "1.0.0",
        description = "Currency rates and conversions backed by a free upstream exchange rate API.\n\nEvery error is returned as `{\"errors\": [...]}` with status 400.",
        license(name = "MIT"),
    ),
    paths(health, conversion_rate, conversion),
    components(
        schemas(
            ConversionRateParams,
            ConversionRateResponse,
            ConversionParams,
            ConversionResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "conversion", description = "Currency rates and conversions"),
    )
)]
pub struct ApiDoc;
