//! Backend transport: wire types, error type, and the `Transport` seam.

mod http;

use std::fmt;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use http::HttpTransport;

use crate::session::Sender;

/// Standard User-Agent header for backend requests.
pub const USER_AGENT: &str = concat!("vidchat/", env!("CARGO_PKG_VERSION"));

/// One history entry as the backend sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub message: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Media item the conversation is about (`null` when unknown).
    pub video_id: Option<String>,
    pub history: Vec<HistoryEntry>,
}

/// Body of a successful `POST /chat` response.
#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    response: Option<String>,
}

/// Extracts the reply text from a response body.
///
/// A body that is not JSON, or lacks a string `response`, is a parse failure.
pub fn parse_chat_response(body: &str) -> Result<String, TransportError> {
    let parsed: ChatResponseBody = serde_json::from_str(body)
        .map_err(|e| TransportError::parse(format!("Invalid response body: {e}"), body))?;
    parsed
        .response
        .ok_or_else(|| TransportError::parse("Response body has no `response` field", body))
}

/// Sends chat requests to the backend.
///
/// Returned futures are `'static` so the session can spawn them.
pub trait Transport: Send + Sync {
    fn send_chat(&self, request: ChatRequest) -> BoxFuture<'static, Result<String, TransportError>>;
}

/// Transport error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset, etc.
    Network,
    /// Request or connect timeout
    Timeout,
    /// Non-2xx response
    HttpStatus,
    /// Body was not the expected JSON shape
    Parse,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Network => write!(f, "network"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::HttpStatus => write!(f, "http_status"),
            TransportErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured transport failure with kind and details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportError {
    /// Error category
    pub kind: TransportErrorKind,
    /// One-line summary suitable for logs
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl TransportError {
    /// Creates a new transport error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    /// Creates a parse error, keeping the offending body as details.
    pub fn parse(message: impl Into<String>, body: &str) -> Self {
        Self {
            kind: TransportErrorKind::Parse,
            message: message.into(),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates an HTTP status error.
    ///
    /// The backend reports failures as `{"error": "..."}`; when present that
    /// text is folded into the message.
    pub fn http_status(status: u16, body: &str) -> Self {
        if let Ok(json) = serde_json::from_str::<Value>(body)
            && let Some(msg) = json.get("error").and_then(Value::as_str)
        {
            return Self {
                kind: TransportErrorKind::HttpStatus,
                message: format!("HTTP {status}: {msg}"),
                details: Some(body.to_string()),
            };
        }
        Self {
            kind: TransportErrorKind::HttpStatus,
            message: format!("HTTP {status}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}
