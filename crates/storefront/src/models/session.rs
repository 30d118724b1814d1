//! Session-related types.
//!
//! Everything the storefront remembers about a visitor lives in their
//! server-side session under one of the [`keys`].

use core::fmt;

use bookstore_core::OrderNumber;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Bearer token issued by the backend at sign-in.
///
/// Its presence in the session is the only signal that the visitor is
/// signed in. Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl ExposeSecret<str> for SessionToken {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl Serialize for SessionToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> Deserialize<'de> for SessionToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// An order that was just placed, waiting to be shown once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: OrderNumber,
}

/// Severity of a banner message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

/// A banner shown on the next rendered page, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Whether this banner reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == FlashKind::Error
    }
}

/// Session keys.
pub mod keys {
    /// Key for the backend bearer token.
    pub const TOKEN: &str = "bookstore_token";

    /// Key for the customer's `CheckoutFlow`.
    pub const CHECKOUT_FLOW: &str = "checkout_flow";

    /// Key for the one-shot `PlacedOrder` read by the confirmation page.
    pub const PLACED_ORDER: &str = "placed_order";

    /// Key for the pending banner message.
    pub const FLASH: &str = "flash";
}
