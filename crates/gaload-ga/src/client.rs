//! HTTP client for the Reporting API v4.
//!
//! Wraps `reqwest` with the service-account token exchange, typed request
//! construction, and error-envelope handling. The client issues exactly one
//! `reports:batchGet` call per query; there is no pagination loop and no
//! retry.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::auth::{fetch_access_token, ServiceAccountKey};
use crate::error::GaError;
use crate::types::{
    BatchGetRequest, BatchGetResponse, DateRange, DimensionRef, MetricRef, Report, ReportRequest,
};

const DEFAULT_BASE_URL: &str = "https://analyticsreporting.googleapis.com/";
const BATCH_GET_PATH: &str = "v4/reports:batchGet";

/// Read scope for the Reporting API.
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// The report to fetch: view, date range, and ordered dimension and metric
/// names. Built once per run; the ordering here fixes the column order of
/// everything downstream.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub view_id: String,
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
}

/// Client for the Reporting API v4.
///
/// Use [`GaClient::new`] for production or [`GaClient::with_access_token`]
/// to point at a mock server in tests without a token exchange.
pub struct GaClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl GaClient {
    /// Creates a client pointed at the production Reporting API,
    /// performing one token exchange with the given service-account key.
    ///
    /// # Errors
    ///
    /// Returns [`GaError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, [`GaError::Key`] if the key cannot sign an
    /// assertion, or [`GaError::Auth`] if the token exchange is rejected.
    pub async fn new(key: &ServiceAccountKey, timeout_secs: u64) -> Result<Self, GaError> {
        let client = build_http_client(timeout_secs)?;
        let access_token = fetch_access_token(&client, key, ANALYTICS_READONLY_SCOPE).await?;
        Self::assemble(client, access_token, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL with a pre-obtained
    /// access token. Used by wiremock tests; also handy when the token
    /// endpoint itself is mocked.
    ///
    /// # Errors
    ///
    /// Returns [`GaError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`GaError::Api`] if `base_url` is not a valid URL.
    pub fn with_access_token(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GaError> {
        let client = build_http_client(timeout_secs)?;
        Self::assemble(client, access_token.to_owned(), base_url)
    }

    /// As [`GaClient::new`], but exchanging the token against a custom base
    /// URL's endpoint is left to the key's own `token_uri`; only the
    /// reporting endpoint is redirected.
    ///
    /// # Errors
    ///
    /// Same as [`GaClient::new`], plus [`GaError::Api`] for an invalid
    /// `base_url`.
    pub async fn with_base_url(
        key: &ServiceAccountKey,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GaError> {
        let client = build_http_client(timeout_secs)?;
        let access_token = fetch_access_token(&client, key, ANALYTICS_READONLY_SCOPE).await?;
        Self::assemble(client, access_token, base_url)
    }

    fn assemble(client: Client, access_token: String, base_url: &str) -> Result<Self, GaError> {
        // Normalise: a trailing slash makes Url::join append the path
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GaError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            access_token,
            base_url,
        })
    }

    /// Issues exactly one `reports:batchGet` request and returns the first
    /// report from the response.
    ///
    /// # Errors
    ///
    /// - [`GaError::Api`] if the API rejects the query (unknown view id,
    ///   bad dimension/metric name) or returns no report.
    /// - [`GaError::Http`] on network failure.
    /// - [`GaError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn batch_get(&self, query: &ReportQuery) -> Result<Report, GaError> {
        let url = self
            .base_url
            .join(BATCH_GET_PATH)
            .map_err(|e| GaError::Api(format!("cannot build request URL: {e}")))?;

        let body = BatchGetRequest {
            report_requests: vec![ReportRequest {
                view_id: query.view_id.clone(),
                date_ranges: vec![DateRange {
                    start_date: query.start_date.clone(),
                    end_date: query.end_date.clone(),
                }],
                dimensions: query
                    .dimensions
                    .iter()
                    .map(|name| DimensionRef { name: name.clone() })
                    .collect(),
                metrics: query
                    .metrics
                    .iter()
                    .map(|expression| MetricRef {
                        expression: expression.clone(),
                    })
                    .collect(),
            }],
        };

        tracing::info!(view_id = %query.view_id, start = %query.start_date, end = %query.end_date, "fetching report");

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::api_error(status, &text));
        }

        let parsed: BatchGetResponse =
            serde_json::from_str(&text).map_err(|source| GaError::Deserialize {
                context: format!("batchGet(view_id={})", query.view_id),
                source,
            })?;

        parsed
            .reports
            .into_iter()
            .next()
            .ok_or_else(|| GaError::Api("response contained no reports".to_string()))
    }

    /// Maps a non-2xx response to a typed error, extracting the message
    /// from Google's `{"error": {"message": ...}}` envelope when present.
    fn api_error(status: reqwest::StatusCode, body: &str) -> GaError {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")?
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            GaError::Auth(message)
        } else {
            GaError::Api(message)
        }
    }
}

fn build_http_client(timeout_secs: u64) -> Result<Client, GaError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent("gaload/0.1 (analytics-warehouse-loader)")
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_rejects_invalid_base_url() {
        let result = GaClient::with_access_token("token", 30, "not a url");
        assert!(matches!(result, Err(GaError::Api(_))));
    }

    #[test]
    fn api_error_extracts_google_envelope_message() {
        let body = r#"{"error": {"code": 400, "message": "Unknown dimension ga:bogus", "status": "INVALID_ARGUMENT"}}"#;
        let err = GaClient::api_error(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(
            matches!(err, GaError::Api(ref m) if m.contains("Unknown dimension")),
            "got: {err:?}"
        );
    }

    #[test]
    fn api_error_maps_401_to_auth() {
        let body = r#"{"error": {"code": 401, "message": "Invalid Credentials", "status": "UNAUTHENTICATED"}}"#;
        let err = GaClient::api_error(reqwest::StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, GaError::Auth(_)), "got: {err:?}");
    }

    #[test]
    fn api_error_falls_back_to_status_on_opaque_body() {
        let err = GaClient::api_error(reqwest::StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(
            matches!(err, GaError::Api(ref m) if m.contains("502")),
            "got: {err:?}"
        );
    }
}
