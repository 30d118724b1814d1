//! Application state shared across handlers.

use std::sync::Arc;

use crate::bookstore::BookstoreClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone via `Arc`. The session store's database pool is owned by
/// the session layer, not by the state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    bookstore: BookstoreClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let bookstore = BookstoreClient::new(&config.bookstore);

        Self {
            inner: Arc::new(AppStateInner { config, bookstore }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the bookstore backend client.
    #[must_use]
    pub fn bookstore(&self) -> &BookstoreClient {
        &self.inner.bookstore
    }
}
