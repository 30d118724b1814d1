//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Catalog (?page=N)
//! GET  /health                        - Liveness check
//!
//! # Cart and checkout
//! GET  /cart                          - Current checkout step
//! POST /cart/add/{book_id}            - Add to bag, back to the catalog page
//! POST /cart/lines/{cart_id}/increase - Quantity +1
//! POST /cart/lines/{cart_id}/decrease - Quantity -1
//! POST /cart/lines/{cart_id}/remove   - Remove line
//! POST /cart/continue                 - My Cart -> Customer Details
//! POST /cart/details                  - Customer Details -> Order Summary
//! POST /cart/back                     - One step back
//! POST /cart/checkout                 - Place the order
//! GET  /order                         - Order confirmation (shown once)
//!
//! # Auth
//! GET  /signin, POST /signin          - Sign in (POST rate limited)
//! GET  /signup, POST /signup          - Sign up (POST rate limited)
//! POST /logout                        - Sign out
//!
//! # Other
//! GET  /upcoming                      - Coming soon placeholder
//! *                                   - Redirect to /
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod pages;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use bookstore_core::Cart;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    CustomerSession, auth_rate_limiter, request_id_middleware, security_headers_middleware,
};
use crate::models::{Flash, SessionToken};
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

// =============================================================================
// Shared page data
// =============================================================================

/// Header and banner data every page renders.
pub struct PageChrome {
    pub signed_in: bool,
    /// Distinct lines in the cart, shown on the cart icon.
    pub badge_count: usize,
    pub flash: Option<Flash>,
}

impl PageChrome {
    /// Build the chrome from a cart the handler already loaded.
    pub async fn with_cart(session: &CustomerSession, signed_in: bool, cart: &Cart) -> Self {
        Self {
            signed_in,
            badge_count: cart.badge_count(),
            flash: session.take_flash().await,
        }
    }

    /// Build the chrome for a page that has no cart of its own.
    ///
    /// Signed-in visitors get a cart fetch for the badge. A failed fetch
    /// shows an empty badge.
    pub async fn load(state: &AppState, session: &CustomerSession) -> Self {
        let token = session.token().await;
        let cart = match &token {
            Some(token) => load_cart_or_empty(state, token).await,
            None => Cart::empty(),
        };
        Self::with_cart(session, token.is_some(), &cart).await
    }
}

/// Fetch the cart, logging and swallowing failures.
pub async fn load_cart_or_empty(state: &AppState, token: &SessionToken) -> Cart {
    match state.bookstore().get_cart(token).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load cart");
            Cart::empty()
        }
    }
}

/// Resolve a cover reference to an image URL.
///
/// Bare file names live in the static cover directory; absolute URLs and
/// rooted paths are used as given.
#[must_use]
pub fn cover_url(cover: Option<&str>) -> String {
    match cover.map(str::trim) {
        Some(c) if c.starts_with("http://") || c.starts_with("https://") || c.starts_with('/') => {
            c.to_string()
        }
        Some(c) if !c.is_empty() => format!("/static/covers/{c}"),
        _ => "/static/img/no-cover.svg".to_string(),
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the cart and checkout routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{book_id}", post(cart::add))
        .route("/lines/{cart_id}/increase", post(cart::increase))
        .route("/lines/{cart_id}/decrease", post(cart::decrease))
        .route("/lines/{cart_id}/remove", post(cart::remove))
        .route("/continue", post(cart::continue_to_details))
        .route("/details", post(cart::submit_details))
        .route("/back", post(cart::back))
        .route("/checkout", post(cart::checkout))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/signin",
            get(auth::signin_page).merge(post(auth::signin).layer(auth_rate_limiter())),
        )
        .route(
            "/signup",
            get(auth::signup_page).merge(post(auth::signup).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .nest("/cart", cart_routes())
        .route("/order", get(order::show))
        .route("/upcoming", get(pages::upcoming))
        .merge(auth_routes())
}

/// Build the storefront application without its session layer.
///
/// The caller adds a `SessionManagerLayer` over whichever store it uses.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(|| async { Redirect::to("/") })
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<axum::body::Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            },
        ))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url_for_file_name() {
        assert_eq!(cover_url(Some("dune.jpg")), "/static/covers/dune.jpg");
    }

    #[test]
    fn test_cover_url_keeps_absolute_urls() {
        assert_eq!(
            cover_url(Some("https://img.example.com/a.png")),
            "https://img.example.com/a.png"
        );
        assert_eq!(cover_url(Some("/media/a.png")), "/media/a.png");
    }

    #[test]
    fn test_cover_url_placeholder() {
        assert_eq!(cover_url(None), "/static/img/no-cover.svg");
        assert_eq!(cover_url(Some("  ")), "/static/img/no-cover.svg");
    }
}
