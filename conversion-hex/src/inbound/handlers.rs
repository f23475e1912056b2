//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use conversion_types::{
    ConversionError, ConversionQuery, ConversionRateQuery, ConversionRateResponse,
    ConversionResponse, ErrorResponse, RateProvider,
};

use crate::ConversionService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<P: RateProvider> {
    pub service: ConversionService<P>,
}

/// Wrapper to implement IntoResponse for ConversionError (orphan rule workaround).
///
/// Every handled failure is reported as 400 with an `errors` list, whether
/// the caller or the upstream is at fault.
#[derive(Debug)]
pub struct ApiError(pub ConversionError);

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        ApiError(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(ConversionError::Validation(vec![rejection.body_text()]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_caller_error() {
            tracing::debug!(error = %self.0, "Rejected request");
        } else {
            tracing::warn!(error = %self.0, "Upstream failure");
        }

        let body = ErrorResponse {
            errors: self.0.messages(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// OpenAPI document for the service.
pub async fn openapi_json() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(ApiDoc::openapi())
}

/// Rate of one unit of the input currency in the output currency.
#[tracing::instrument(skip(state))]
pub async fn conversion_rate<P: RateProvider>(
    State(state): State<Arc<AppState<P>>>,
    query: Result<Query<ConversionRateQuery>, QueryRejection>,
) -> Result<Json<ConversionRateResponse>, ApiError> {
    let Query(query) = query?;
    let quote = state
        .service
        .get_rate(
            query.input_currency_type.as_deref(),
            query.output_currency_type.as_deref(),
        )
        .await?;

    tracing::info!(rate = quote.rate, "Conversion rate resolved");
    Ok(Json(quote.into()))
}

/// Converts an amount from the input currency to the output currency.
#[tracing::instrument(skip(state))]
pub async fn conversion<P: RateProvider>(
    State(state): State<Arc<AppState<P>>>,
    query: Result<Query<ConversionQuery>, QueryRejection>,
) -> Result<Json<ConversionResponse>, ApiError> {
    let Query(query) = query?;
    let conversion = state
        .service
        .convert(
            query.input_currency_type.as_deref(),
            query.input_value.as_deref(),
            query.output_currency_type.as_deref(),
        )
        .await?;

    tracing::info!(
        converted_value = conversion.converted_value,
        "Conversion completed"
    );
    Ok(Json(ConversionResponse::new(
        conversion,
        query.input_value.unwrap_or_default(),
    )))
}
