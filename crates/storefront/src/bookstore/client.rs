//! `BookstoreClient` implementation.

use std::sync::Arc;

use bookstore_core::{
    Book, BookId, Cart, CartLineId, Credentials, CustomerDetails, OrderNumber, Registration,
};
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::BookstoreError;
use super::types::{
    BookDto, CartLineDto, EmptyBody, ErrorBody, LoginRequest, LoginResponse, OrderPlacedResponse,
    OrderRequest, RegistrationRequest, cart_from_lines,
};
use crate::config::BookstoreApiConfig;
use crate::models::SessionToken;

/// Longest slice of a response body written to the logs.
const LOGGED_BODY_CHARS: usize = 500;

/// Client for the bookstore REST backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BookstoreClient {
    inner: Arc<BookstoreClientInner>,
}

struct BookstoreClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BookstoreClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BookstoreApiConfig) -> Self {
        Self {
            inner: Arc::new(BookstoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BookstoreError> {
        let url = self.inner.base_url.join(path)?;
        Ok(self.inner.client.request(method, url))
    }

    fn authed(
        &self,
        method: Method,
        path: &str,
        token: &SessionToken,
    ) -> Result<RequestBuilder, BookstoreError> {
        Ok(self
            .request(method, path)?
            .bearer_auth(token.expose_secret()))
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, BookstoreError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Bookstore API returned non-success status"
            );
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty());
            return Err(BookstoreError::Status { status, message });
        }

        Ok(body)
    }

    /// Send a request and parse the JSON body of a successful response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BookstoreError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse Bookstore API response"
            );
            BookstoreError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the full book list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a book list.
    #[instrument(skip(self))]
    pub async fn list_books(&self) -> Result<Vec<Book>, BookstoreError> {
        let books: Vec<BookDto> = self
            .send_json(self.request(Method::GET, "book/allBooks")?)
            .await?;
        debug!(count = books.len(), "Fetched catalog");
        Ok(books.into_iter().map(Book::from).collect())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a book to the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn add_to_cart(
        &self,
        token: &SessionToken,
        book_id: BookId,
    ) -> Result<(), BookstoreError> {
        let path = format!("cartApi/addTooCart/{book_id}");
        self.send(self.authed(Method::POST, &path, token)?.json(&EmptyBody {}))
            .await?;
        Ok(())
    }

    /// Fetch the customer's full cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a cart.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &SessionToken) -> Result<Cart, BookstoreError> {
        let lines: Vec<CartLineDto> = self
            .send_json(self.authed(Method::GET, "cartApi/getAllCartById", token)?)
            .await?;
        Ok(cart_from_lines(lines))
    }

    /// Increase a cart line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn increase_quantity(
        &self,
        token: &SessionToken,
        cart_id: CartLineId,
    ) -> Result<(), BookstoreError> {
        let path = format!("cartApi/updateCartAdd/{cart_id}");
        self.send(self.authed(Method::PATCH, &path, token)?.json(&EmptyBody {}))
            .await?;
        Ok(())
    }

    /// Decrease a cart line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn decrease_quantity(
        &self,
        token: &SessionToken,
        cart_id: CartLineId,
    ) -> Result<(), BookstoreError> {
        let path = format!("cartApi/updateCartRmv/{cart_id}");
        self.send(self.authed(Method::PATCH, &path, token)?.json(&EmptyBody {}))
            .await?;
        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn remove_line(
        &self,
        token: &SessionToken,
        cart_id: CartLineId,
    ) -> Result<(), BookstoreError> {
        let path = format!("cartApi/removeFromCart/{cart_id}");
        self.send(self.authed(Method::DELETE, &path, token)?)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no order ID.
    #[instrument(skip(self, token, details))]
    pub async fn place_order(
        &self,
        token: &SessionToken,
        details: &CustomerDetails,
    ) -> Result<OrderNumber, BookstoreError> {
        let response: OrderPlacedResponse = self
            .send_json(
                self.authed(Method::POST, "orderApi/orderPlace", token)?
                    .json(&OrderRequest::from(details)),
            )
            .await?;
        debug!(order_id = %response.order_id, "Order placed");
        Ok(response.order_id)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), BookstoreError> {
        self.send(
            self.request(Method::POST, "user/userRegistration")?
                .json(&RegistrationRequest::from(registration)),
        )
        .await?;
        Ok(())
    }

    /// Sign in and return the session token.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` if the backend accepted the credentials without
    /// issuing a token, or another error if the request failed.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, BookstoreError> {
        let response: LoginResponse = self
            .send_json(
                self.request(Method::POST, "user/login")?
                    .json(&LoginRequest::from(credentials)),
            )
            .await?;
        response
            .token
            .filter(|t| !t.trim().is_empty())
            .map(SessionToken::new)
            .ok_or(BookstoreError::MissingToken)
    }
}
