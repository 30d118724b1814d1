//! Session context and sign-in extractors.
//!
//! The backend token in the session is the only sign-in state. Handlers get
//! at it through [`CustomerSession`], which also owns the checkout flow, the
//! one-shot placed order and the pending banner.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use bookstore_core::CheckoutFlow;
use tower_sessions::Session;

use crate::models::{Flash, PlacedOrder, SessionToken, session_keys};

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Rejection when the session layer is not installed.
#[derive(Debug)]
pub struct MissingSession;

impl IntoResponse for MissingSession {
    fn into_response(self) -> Response {
        tracing::error!("Session layer missing from the middleware stack");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Typed access to the visitor's session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(customer: CustomerSession) -> impl IntoResponse {
///     if customer.is_signed_in().await { "welcome back" } else { "hello" }
/// }
/// ```
#[derive(Clone)]
pub struct CustomerSession(Session);

impl<S> FromRequestParts<S> for CustomerSession
where
    S: Send + Sync,
{
    type Rejection = MissingSession;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self)
            .ok_or(MissingSession)
    }
}

impl CustomerSession {
    /// The stored backend token, if the visitor is signed in.
    ///
    /// An unreadable token counts as signed out.
    pub async fn token(&self) -> Option<SessionToken> {
        self.0
            .get::<SessionToken>(session_keys::TOKEN)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read session token");
                None
            })
    }

    pub async fn is_signed_in(&self) -> bool {
        self.token().await.is_some()
    }

    /// Store the token, rotating the session ID first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn sign_in(&self, token: &SessionToken) -> SessionResult<()> {
        self.0.cycle_id().await?;
        self.0.insert(session_keys::TOKEN, token).await
    }

    /// Drop the token and everything else held for this visitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be cleared.
    pub async fn sign_out(&self) -> SessionResult<()> {
        self.0.flush().await
    }

    /// Queue a banner for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_flash(&self, flash: Flash) -> SessionResult<()> {
        self.0.insert(session_keys::FLASH, flash).await
    }

    /// Take the pending banner, if any. It is shown once.
    pub async fn take_flash(&self) -> Option<Flash> {
        self.0
            .remove::<Flash>(session_keys::FLASH)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read flash message");
                None
            })
    }

    /// The visitor's checkout flow, starting fresh when none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn checkout_flow(&self) -> SessionResult<CheckoutFlow> {
        Ok(self
            .0
            .get::<CheckoutFlow>(session_keys::CHECKOUT_FLOW)
            .await?
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save_checkout_flow(&self, flow: &CheckoutFlow) -> SessionResult<()> {
        self.0.insert(session_keys::CHECKOUT_FLOW, flow).await
    }

    /// Remember a placed order for the confirmation page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_placed_order(&self, order: &PlacedOrder) -> SessionResult<()> {
        self.0.insert(session_keys::PLACED_ORDER, order).await
    }

    /// Take the placed order. A second call returns `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn take_placed_order(&self) -> SessionResult<Option<PlacedOrder>> {
        self.0.remove::<PlacedOrder>(session_keys::PLACED_ORDER).await
    }
}

/// Extractor that requires a signed-in visitor.
///
/// Redirects to the sign-in page when no token is stored, so a gated action
/// never reaches the backend.
pub struct RequireToken(pub SessionToken);

/// Rejection for [`RequireToken`].
pub enum TokenRejection {
    /// No token in the session.
    RedirectToSignIn,
    /// Session layer missing.
    MissingSession(MissingSession),
}

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to("/signin").into_response(),
            Self::MissingSession(rejection) => rejection.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireToken
where
    S: Send + Sync,
{
    type Rejection = TokenRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = CustomerSession::from_request_parts(parts, state)
            .await
            .map_err(TokenRejection::MissingSession)?;

        session
            .token()
            .await
            .map(Self)
            .ok_or(TokenRejection::RedirectToSignIn)
    }
}

/// Extractor that optionally gets the visitor's token.
///
/// Unlike `RequireToken`, this does not reject signed-out visitors.
pub struct OptionalToken(pub Option<SessionToken>);

impl<S> FromRequestParts<S> for OptionalToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = match parts.extensions.get::<Session>() {
            Some(session) => CustomerSession(session.clone()).token().await,
            None => None,
        };

        Ok(Self(token))
    }
}
