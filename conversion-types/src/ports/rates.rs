//! Exchange rate provider port.
//!
//! Implementations can be HTTP clients, mock providers, etc.

use crate::domain::RateTable;

/// Closed set of upstream failures a rate provider may report.
///
/// The display strings are shown to callers as-is, so transport details
/// never appear in them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The upstream answers 500 for a malformed or unknown base currency.
    #[error("Error: Possible invalid base_currency")]
    InvalidBaseCurrency,

    #[error("Slow down, this service is free and it needs you to be gentle!")]
    RateLimited,

    #[error("No exchange currencies found for {0}")]
    NotFound(String),

    #[error("We're sorry, we're experiencing degraded service.")]
    TransportFailure,

    #[error("Upstream exchange rate service returned HTTP {0}")]
    UpstreamHttp(u16),

    #[error("Unexpected response from the exchange rate service")]
    MalformedResponse,
}

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Fetches every rate for `base_currency` with a single upstream call.
    async fn get_rates(&self, base_currency: &str) -> Result<RateTable, ClientError>;
}
