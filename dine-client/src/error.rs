//! Client error types

use thiserror::Error;

use crate::storage::StorageError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL cannot carry API paths
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Session expired or missing (HTTP 401)
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected (HTTP 400 / 422)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api { status: u16, message: Option<String> },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Message suitable for showing to a diner.
    ///
    /// Prefers the server-provided message and falls back to the transport
    /// error text.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::NotFound(message) | ClientError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
