//! # Rates Client
//!
//! Client for the upstream free currency exchange rate API.
//!
//! The upstream has a few quirks that this client normalizes into
//! [`ClientError`]:
//! - an unknown or malformed base currency yields HTTP 500 rather than a 4xx
//! - the API key is only honoured as the `apikey` query parameter, not as a header
//!
//! Each call makes exactly one request. Nothing is retried or cached.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use conversion_types::{ClientError, RateProvider, RateTable};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;

/// Timeout applied to every upstream request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Error raised when the client cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("No base url configured for the exchange rate client")]
    MissingBaseUrl,

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Body returned by `GET /rates`: `{"data": {"<BASE>": {"<CODE>": rate}}}`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    data: HashMap<String, HashMap<String, f64>>,
}

/// Exchange rate API client.
///
/// Holds only immutable configuration and a pooled HTTP client, so one
/// instance is built at startup and shared across requests.
#[derive(Debug, Clone)]
pub struct FreeCurrencyApiClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl FreeCurrencyApiClient {
    /// Creates a client with the default timeout.
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, ConfigurationError> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigurationError::MissingBaseUrl);
        }

        let http = Client::builder()
            .user_agent(concat!("rates-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(String::from),
            http,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_rates(&self, base_currency: &str) -> Result<RateTable, ClientError> {
        let mut req = self
            .http
            .get(format!("{}/rates", self.base_url))
            .header(header::ACCEPT, "application/json")
            .query(&[("base_currency", base_currency)]);
        if let Some(key) = &self.api_key {
            req = req.query(&[("apikey", key.as_str())]);
        }

        let resp = req.send().await.map_err(transport_failure)?;

        match resp.status() {
            StatusCode::INTERNAL_SERVER_ERROR => return Err(ClientError::InvalidBaseCurrency),
            StatusCode::TOO_MANY_REQUESTS => return Err(ClientError::RateLimited),
            StatusCode::NOT_FOUND => {
                return Err(ClientError::NotFound(base_currency.to_string()));
            }
            status if !status.is_success() => {
                return Err(ClientError::UpstreamHttp(status.as_u16()));
            }
            _ => {}
        }

        let body = resp.bytes().await.map_err(transport_failure)?;
        let parsed: RatesResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(error = %e, "Could not decode exchange rate response");
            ClientError::MalformedResponse
        })?;

        into_rate_table(base_currency, parsed.data)
    }
}

#[async_trait]
impl RateProvider for FreeCurrencyApiClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_rates(&self, base_currency: &str) -> Result<RateTable, ClientError> {
        let result = self.fetch_rates(base_currency).await;
        match &result {
            Ok(table) => tracing::debug!(rates = table.len(), "Fetched exchange rates"),
            Err(e) => tracing::info!(error = %e, "Exchange rate lookup failed"),
        }
        result
    }
}

/// Logs the underlying transport error and replaces it with a generic one.
fn transport_failure(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        tracing::error!(error = %err, "Exchange rate request timed out");
    } else if err.is_connect() {
        tracing::error!(error = %err, "Could not connect to exchange rate service");
    } else {
        tracing::error!(error = %err, "Exchange rate request failed");
    }
    ClientError::TransportFailure
}

/// Picks the rates for `base_currency` out of the `data` object.
///
/// The upstream keys the object by the base it resolved, which is normally
/// the requested code. A single entry under another key is accepted as that
/// base; several entries are ambiguous.
fn into_rate_table(
    base_currency: &str,
    mut data: HashMap<String, HashMap<String, f64>>,
) -> Result<RateTable, ClientError> {
    if let Some(rates) = data.remove(base_currency) {
        return Ok(RateTable::new(base_currency, rates));
    }

    match data.len() {
        0 => Err(ClientError::NotFound(base_currency.to_string())),
        1 => data
            .into_iter()
            .next()
            .map(|(base, rates)| RateTable::new(base, rates))
            .ok_or(ClientError::MalformedResponse),
        _ => Err(ClientError::MalformedResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USD_RATES: &str = r#"{"data": {"USD": {"EUR": 0.92, "INR": 83.12, "USD": 1}}}"#;

    async fn mount_status(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        assert!(matches!(
            FreeCurrencyApiClient::new("", None),
            Err(ConfigurationError::MissingBaseUrl)
        ));
        assert!(matches!(
            FreeCurrencyApiClient::new("   ", Some("key")),
            Err(ConfigurationError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = FreeCurrencyApiClient::new("http://localhost:8080/v1/", None).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let client = FreeCurrencyApiClient::new("http://localhost", Some("  ")).unwrap();
        assert!(!client.has_api_key());

        let client = FreeCurrencyApiClient::new("http://localhost", Some("secret")).unwrap();
        assert!(client.has_api_key());
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .and(query_param("base_currency", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USD_RATES))
            .expect(1)
            .mount(&server)
            .await;

        let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
        let table = client.get_rates("USD").await.unwrap();

        assert_eq!(table.base(), "USD");
        assert_eq!(table.rate_for("EUR"), Some(0.92));
        assert_eq!(table.rate_for("USD"), Some(1.0));
        assert_eq!(table.len(), 3);
    }

    #[tokio::test]
    async fn test_api_key_sent_as_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .and(query_param("apikey", "secret-key"))
            .and(query_param("base_currency", "EUR"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"data": {"EUR": {"USD": 1.08}}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = FreeCurrencyApiClient::new(&server.uri(), Some("secret-key")).unwrap();
        let table = client.get_rates("EUR").await.unwrap();
        assert_eq!(table.rate_for("USD"), Some(1.08));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("apikey").is_none());
        assert_eq!(
            requests[0].headers.get("accept").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_no_api_key_parameter_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USD_RATES))
            .mount(&server)
            .await;

        let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
        client.get_rates("USD").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "apikey"));
    }

    #[tokio::test]
    async fn test_status_500_means_invalid_base_currency() {
        let server = MockServer::start().await;
        mount_status(&server, 500).await;

        let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
        let err = client.get_rates("NOPE").await.unwrap_err();
        assert_eq!(err, ClientError::InvalidBaseCurrency);
    }

    #[tokio::test]
    async fn test_status_429_is_not_retried() {
        let server = MockServer::start().await;
        mount_status(&server, 429).await;

        let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
        let err = client.get_rates("USD").await.unwrap_err();
        assert_eq!(err, ClientError::RateLimited);
        // `expect(1)` is verified when the server drops.
    }

    #[tokio::test]
    async fn test_status_404_names_base_currency() {
        let server = MockServer::start().await;
        mount_status(&server, 404).await;

        let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
        let err = client.get_rates("XAU").await.unwrap_err();
        assert_eq!(err, ClientError::NotFound("XAU".into()));
        assert_eq!(err.to_string(), "No exchange currencies found for XAU");
    }

    #[tokio::test]
    async fn test_other_statuses_carry_code() {
        for status in [400, 401, 403, 502, 503] {
            let server = MockServer::start().await;
            mount_status(&server, status).await;

            let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
            let err = client.get_rates("USD").await.unwrap_err();
            assert_eq!(err, ClientError::UpstreamHttp(status));
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates": []}"#))
            .mount(&server)
            .await;

        let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
        let err = client.get_rates("USD").await.unwrap_err();
        assert_eq!(err, ClientError::MalformedResponse);
    }

    #[tokio::test]
    async fn test_empty_data_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": {}}"#))
            .mount(&server)
            .await;

        let client = FreeCurrencyApiClient::new(&server.uri(), None).unwrap();
        let err = client.get_rates("USD").await.unwrap_err();
        assert_eq!(err, ClientError::NotFound("USD".into()));
    }

    #[test_log::test(tokio::test)]
    async fn test_connection_refused_is_transport_failure() {
        // Reserve a port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = FreeCurrencyApiClient::new(&format!("http://{addr}"), None).unwrap();
        let err = client.get_rates("USD").await.unwrap_err();

        assert_eq!(err, ClientError::TransportFailure);
        assert_eq!(
            err.to_string(),
            "We're sorry, we're experiencing degraded service."
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_timeout_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(USD_RATES)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            FreeCurrencyApiClient::with_timeout(&server.uri(), None, Duration::from_millis(50))
                .unwrap();
        let err = client.get_rates("USD").await.unwrap_err();
        assert_eq!(err, ClientError::TransportFailure);
    }

    #[test]
    fn test_single_entry_under_other_key_is_accepted() {
        let data = HashMap::from([(
            "USD".to_string(),
            HashMap::from([("EUR".to_string(), 0.92)]),
        )]);
        let table = into_rate_table("usd", data).unwrap();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.rate_for("EUR"), Some(0.92));
    }

    #[test]
    fn test_several_entries_without_requested_base_are_ambiguous() {
        let data = HashMap::from([
            ("EUR".to_string(), HashMap::new()),
            ("GBP".to_string(), HashMap::new()),
        ]);
        assert_eq!(
            into_rate_table("USD", data),
            Err(ClientError::MalformedResponse)
        );
    }
}
