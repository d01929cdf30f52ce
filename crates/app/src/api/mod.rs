//! Marketplace REST API client.
//!
//! Every endpoint answers with the same JSON envelope:
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "optional" }
//! ```
//!
//! A `success: false` body (or a missing `data` where one is expected) is a
//! rejection carrying the server's human-readable message.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;

pub mod orders;
pub mod payments;

pub use orders::{MockOrdersApi, OrdersApi};
pub use payments::{MockPaymentsApi, PaymentIntent, PaymentProof, PaymentsApi};

/// Errors that can occur when calling the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The API returned a non-2xx response without a readable envelope.
    #[error("unexpected response from API: {0}")]
    UnexpectedResponse(String),
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the request was accepted.
    pub success: bool,

    /// Payload on success.
    pub data: Option<T>,

    /// Human-readable detail, usually present on failure.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload of an accepted response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the request was refused or carried
    /// no payload.
    pub fn into_data(self) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "response carried no data".to_string()),
            )),
            (false, _) => Err(rejection(self.message)),
        }
    }

    /// Check an accepted response whose payload is not needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the request was refused.
    pub fn into_ack(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(rejection(self.message))
        }
    }
}

fn rejection(message: Option<String>) -> ApiError {
    ApiError::Rejected(message.unwrap_or_else(|| "request was rejected".to_string()))
}

/// HTTP client for the marketplace API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            http,
        })
    }

    /// Replace the bearer token, e.g. after signing in.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B>(&self, path: &str, body: &B) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path);

        debug!(%url, "POST");

        let mut request = self.http.post(&url).json(body);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            // Error statuses usually still carry the envelope and its message.
            return match serde_json::from_str::<Envelope<serde_json::Value>>(&text) {
                Ok(envelope) => Err(rejection(envelope.message)),
                Err(_) => Err(ApiError::UnexpectedResponse(format!(
                    "POST {path} failed with status {status}: {text}"
                ))),
            };
        }

        Ok(response)
    }

    /// POST `body` and return the envelope's payload.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = self.send(path, body).await?.json().await?;

        envelope.into_data()
    }

    /// POST `body` and only check that it was accepted.
    pub(crate) async fn post_ack<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let envelope: Envelope<serde_json::Value> = self.send(path, body).await?.json().await?;

        envelope.into_ack()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn config(url: &str) -> ApiConfig {
        ApiConfig {
            api_url: url.to_string(),
            api_token: None,
            http_timeout_ms: 1_000,
        }
    }

    #[test]
    fn accepted_envelope_yields_data() -> TestResult {
        let envelope: Envelope<u32> = serde_json::from_str(r#"{"success":true,"data":7}"#)?;

        assert_eq!(envelope.into_data()?, 7);

        Ok(())
    }

    #[test]
    fn refused_envelope_carries_the_server_message() -> TestResult {
        let envelope: Envelope<u32> = serde_json::from_str(
            r#"{"success":false,"message":"Seller is not accepting orders"}"#,
        )?;

        let error = envelope.into_data().err().ok_or("expected a rejection")?;

        assert_eq!(error.to_string(), "Seller is not accepting orders");

        Ok(())
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Listing {
        name: String,
    }

    fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, ApiError> {
        serde_json::from_str::<Envelope<T>>(raw)
            .map_err(|error| ApiError::UnexpectedResponse(error.to_string()))?
            .into_data()
    }

    #[test]
    fn payloads_need_not_implement_default() -> TestResult {
        let listing: Listing = decode(r#"{"success":true,"data":{"name":"Onion"}}"#)?;

        assert_eq!(listing.name, "Onion");
        assert!(matches!(
            decode::<Listing>(r#"{"success":true}"#),
            Err(ApiError::Rejected(_))
        ));

        Ok(())
    }

    #[test]
    fn accepted_envelope_without_data_is_a_rejection() -> TestResult {
        let envelope: Envelope<u32> = serde_json::from_str(r#"{"success":true}"#)?;

        assert!(matches!(envelope.into_data(), Err(ApiError::Rejected(_))));

        Ok(())
    }

    #[test]
    fn ack_ignores_missing_data() -> TestResult {
        let accepted: Envelope<serde_json::Value> = serde_json::from_str(r#"{"success":true}"#)?;
        let refused: Envelope<serde_json::Value> = serde_json::from_str(r#"{"success":false}"#)?;

        assert!(accepted.into_ack().is_ok());
        assert!(matches!(
            refused.into_ack(),
            Err(ApiError::Rejected(message)) if message == "request was rejected"
        ));

        Ok(())
    }

    #[test]
    fn urls_join_without_doubled_slashes() -> TestResult {
        let client = ApiClient::new(&config("http://localhost:5000/api/"))?;

        assert_eq!(client.url("/orders"), "http://localhost:5000/api/orders");
        assert_eq!(
            client.url("payments/verify"),
            "http://localhost:5000/api/payments/verify"
        );

        Ok(())
    }
}
