//! Bookstore REST backend client.
//!
//! # Architecture
//!
//! - One async method per backend endpoint, JSON over `reqwest`
//! - The backend is the source of truth for books and carts; nothing is cached
//! - Authenticated calls carry `Authorization: Bearer <token>`
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstore_storefront::bookstore::BookstoreClient;
//!
//! let client = BookstoreClient::new(&config.bookstore);
//! let books = client.list_books().await?;
//! client.add_to_cart(&token, books[0].id).await?;
//! let cart = client.get_cart(&token).await?;
//! ```

mod client;
pub mod types;

pub use client::BookstoreClient;

use thiserror::Error;

/// Errors that can occur when talking to the bookstore backend.
#[derive(Debug, Error)]
pub enum BookstoreError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {}", .message.as_deref().unwrap_or("(no message)"))]
    Status {
        status: reqwest::StatusCode,
        /// The backend's `message` field, when the body carried one.
        message: Option<String>,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Sign-in succeeded but the response had no token.
    #[error("login response did not include a token")]
    MissingToken,

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BookstoreError {
    /// The backend's own explanation, if it sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_only_for_status_errors() {
        let err = BookstoreError::Status {
            status: reqwest::StatusCode::CONFLICT,
            message: Some("Email already registered".to_string()),
        };
        assert_eq!(err.backend_message(), Some("Email already registered"));
        assert_eq!(BookstoreError::MissingToken.backend_message(), None);
    }

    #[test]
    fn test_status_display_without_message() {
        let err = BookstoreError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "backend returned 500 Internal Server Error: (no message)"
        );
    }
}
