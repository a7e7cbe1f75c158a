//! HTTP transport for the chat backend.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::debug;

use super::{ChatRequest, Transport, TransportError, TransportErrorKind, USER_AGENT};
use crate::config::Config;

/// reqwest-backed client for `POST /chat` and `GET /status`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport for `base_url` (no trailing slash).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<std::time::Duration>,
    ) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a transport from configuration (env > config > default URL).
    ///
    /// # Errors
    /// Returns an error if the backend URL is invalid or the client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.effective_backend_url()?, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one chat request and returns the reply text.
    ///
    /// # Errors
    /// Returns a `TransportError` for network failures, non-2xx statuses, and
    /// bodies without a string `response`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, TransportError> {
        let url = format!("{}/chat", self.base_url);
        debug!(%url, history_len = request.history.len(), "sending chat request");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_reqwest_error)?;
        if !status.is_success() {
            return Err(TransportError::http_status(status.as_u16(), &body));
        }

        super::parse_chat_response(&body)
    }

    /// Probes `GET /status`; any 2xx means the backend is reachable.
    ///
    /// # Errors
    /// Returns a `TransportError` when the request fails or the status is not 2xx.
    pub async fn check_status(&self) -> Result<(), TransportError> {
        let url = format!("{}/status", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(TransportError::http_status(status.as_u16(), &body))
        }
    }
}

impl Transport for HttpTransport {
    fn send_chat(&self, request: ChatRequest) -> BoxFuture<'static, Result<String, TransportError>> {
        let this = self.clone();
        async move { this.chat(&request).await }.boxed()
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        TransportError::network(format!("Connection failed: {e}"))
    } else if e.is_decode() {
        TransportError::new(TransportErrorKind::Parse, format!("Decode error: {e}"))
    } else if e.is_request() {
        TransportError::network(format!("Request error: {e}"))
    } else {
        TransportError::network(format!("Network error: {e}"))
    }
}
