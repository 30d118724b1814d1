//! Integration test harness for the Bookstore storefront.
//!
//! Every test gets its own in-process bookstore backend double and its own
//! storefront, both bound to ephemeral ports. Sessions live in a
//! `MemoryStore`, so no database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookstore-integration-tests
//! ```

#![allow(
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::unwrap_used
)]

pub mod backend;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use bookstore_storefront::config::{BookstoreApiConfig, StoreContactConfig, StorefrontConfig};
use bookstore_storefront::middleware::create_session_layer;
use bookstore_storefront::routes;
use bookstore_storefront::state::AppState;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

pub use backend::{MockBackend, ORDER_ID, PASSWORD, RecordedRequest};

/// Email used by [`TestApp::sign_in`].
pub const CUSTOMER_EMAIL: &str = "reader@example.com";

/// A running storefront wired to a [`MockBackend`].
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub backend: MockBackend,
}

impl TestApp {
    /// Start a storefront over a backend stocked with `book_count` books.
    pub async fn spawn(book_count: i64) -> Self {
        let backend = MockBackend::start(book_count).await;
        let config = test_config(&backend);
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let app = routes::app(AppState::new(config)).layer(session_layer);

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind storefront listener");
        let addr = listener.local_addr().expect("Storefront has no local address");
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Storefront server failed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            backend,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn get_html(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Sign in with the backend's accepted password.
    pub async fn sign_in(&self) {
        let resp = self
            .post_form("/signin", &[("email", CUSTOMER_EMAIL), ("password", PASSWORD)])
            .await;
        assert_eq!(location(&resp), "/");
    }

    /// Walk the checkout to the summary step with a complete address.
    pub async fn reach_summary(&self) {
        let resp = self.post_form("/cart/continue", &[]).await;
        assert_eq!(location(&resp), "/cart");
        let resp = self.post_form("/cart/details", &complete_details()).await;
        assert_eq!(location(&resp), "/cart");
    }
}

/// A fully filled customer details form.
#[must_use]
pub fn complete_details() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Asha Rao"),
        ("phone_number", "9876543210"),
        ("pincode", "560102"),
        ("locality", "HSR Layout"),
        ("address", "12, 5th Main"),
        ("city", "Bengaluru"),
        ("landmark", "Near the park"),
        ("address_type", "Home"),
    ]
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(resp: &Response) -> &str {
    assert!(
        resp.status().is_redirection(),
        "expected a redirect, got {}",
        resp.status()
    );
    resp.headers()
        .get(reqwest::header::LOCATION)
        .expect("Redirect without Location")
        .to_str()
        .expect("Location is not ASCII")
}

/// Count the rendered catalog cards.
#[must_use]
pub fn book_cards(html: &str) -> usize {
    html.matches("class=\"book-card\"").count()
}

/// The cart badge as rendered in the header.
#[must_use]
pub fn badge(count: usize) -> String {
    format!("<span class=\"badge\">{count}</span>")
}

fn test_config(backend: &MockBackend) -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        bookstore: BookstoreApiConfig::parse(&backend.base_url())
            .expect("Backend URL should parse"),
        store: StoreContactConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
