//! HTTP client for DualTab backend requests.
//!
//! This module provides a low-level HTTP client wrapper for making
//! requests to the DualTab admin API, handling authentication, the
//! response envelope, and error message extraction.

use super::error::ApiError;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Response envelope wrapping every backend payload.
///
#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<T>,
}

/// Makes requests to the DualTab backend and unwraps the response
/// envelope into typed data.
///
/// The session credential is a field of this client, threaded in by the
/// caller; a missing credential means anonymous requests (no header),
/// never an error.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    access_token: Option<String>,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and optional
    /// session token.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never
    /// happen in practice as reqwest::Client::builder().build() only
    /// fails on invalid configuration, which we don't use.
    pub fn new(base_url: &str, access_token: Option<&str>) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token: access_token.map(str::to_owned),
            http_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// Replace the session token attached to subsequent requests.
    ///
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    /// Make a request expecting a data payload and deserialize it.
    ///
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Option<Vec<(&str, String)>>,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let bytes = self.call(method, path, params, body).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Make a request whose success response carries no data payload.
    ///
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        params: Option<Vec<(&str, String)>>,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        self.call(method, path, params, body).await?;
        Ok(())
    }

    /// Send the request, check the status, and return the raw body.
    ///
    /// Non-success statuses are turned into `ApiError::Server` with the
    /// envelope's `msg` field when the body parses, or a generic
    /// fallback message otherwise.
    async fn call(
        &self,
        method: Method,
        path: &str,
        params: Option<Vec<(&str, String)>>,
        body: Option<Value>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http_client.request(method, &url);

        if let Some(params) = params {
            request = request.query(&params);
        }
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<Value>>(&bytes)
                .ok()
                .map(|envelope| envelope.msg)
                .filter(|msg| !msg.is_empty())
                .unwrap_or_else(|| format!("request failed with status {}", status));
            log::error!("API request to {} failed: {}", url, message);
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(bytes.to_vec())
    }
}
