//! Health Stats REST API Client
//!
//! Thin wrapper over `reqwest` that resolves paths against the configured
//! base URL, attaches the bearer token from the session store, and
//! normalizes every outcome into a [`Payload`] or a [`ClientError`].

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::error::{ClientError, ClientResult, GENERIC_FAILURE_MESSAGE};
use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Parsed body of a successful response
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The server sent an empty body
    NoContent,
    /// The server sent a JSON document
    Json(Value),
}

impl Payload {
    /// Parse raw response text. Empty text is `NoContent`.
    pub fn parse(text: &str) -> ClientResult<Self> {
        if text.trim().is_empty() {
            return Ok(Payload::NoContent);
        }

        serde_json::from_str(text)
            .map(Payload::Json)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::NoContent)
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Payload::NoContent => None,
            Payload::Json(value) => Some(value),
        }
    }

    /// Deserialize the JSON body into a typed value
    pub fn decode<T: DeserializeOwned>(self) -> ClientResult<T> {
        match self {
            Payload::NoContent => Err(ClientError::MalformedResponse(
                "empty response body".to_string(),
            )),
            Payload::Json(value) => serde_json::from_value(value)
                .map_err(|e| ClientError::MalformedResponse(e.to_string())),
        }
    }
}

/// REST API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a new client for the configured backend.
    ///
    /// Fails only if the HTTP stack cannot be initialized; nothing is sent.
    pub fn new(
        config: &ApiConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get(&self, path: &str) -> ClientResult<Payload> {
        self.request::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Payload> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Payload> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Payload> {
        self.request::<()>(Method::DELETE, path, None).await
    }

    /// Send a request and normalize the response
    ///
    /// The body, when given, is sent as JSON. The response body is read in
    /// full and parsed before the status is inspected, so a non-JSON body is
    /// always `MalformedResponse`.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Payload> {
        let url = self.url(path);
        let mut builder = self.client.request(method.clone(), &url);

        if let Some(body) = body {
            builder = builder.json(body);
        }

        if let Some(token) = self.store.read()? {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        tracing::debug!(method = %method, url = %url, "Sending API request");

        let response = builder.send().await.map_err(ClientError::Network)?;
        let status = response.status();
        let text = response.text().await.map_err(ClientError::Network)?;

        tracing::debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            body_len = text.len(),
            "Received API response"
        );

        let payload = Payload::parse(&text).map_err(|e| {
            tracing::warn!(url = %url, status = status.as_u16(), "Unparseable response body");
            e
        })?;

        if !status.is_success() {
            let message = payload
                .clone()
                .into_value()
                .and_then(|v| error_message(&v))
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(payload)
    }
}

/// Extract a human-readable error message from an error body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`.
pub fn error_message(body: &Value) -> Option<String> {
    let candidate = match body.get("error") {
        Some(Value::String(message)) => Some(message.as_str()),
        Some(Value::Object(error)) => error.get("message").and_then(Value::as_str),
        _ => None,
    }
    .or_else(|| body.get("message").and_then(Value::as_str));

    candidate
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
