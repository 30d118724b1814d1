//! Sign-in, sign-up and sign-out handlers.
//!
//! Credentials go straight to the bookstore backend. Outcomes are reported
//! with a banner on the page the visitor lands on next.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use bookstore_core::{Credentials, RegistrationForm, Role};
use tracing::instrument;

use super::PageChrome;
use crate::bookstore::BookstoreError;
use crate::error::Result;
use crate::filters;
use crate::middleware::CustomerSession;
use crate::models::Flash;
use crate::state::AppState;

const LOGIN_OK: &str = "Login successful!";
const LOGIN_NO_TOKEN: &str = "Login failed | Please check your credentials.";
const LOGIN_FAILED: &str = "Login failed | Please try again.";
const REGISTRATION_OK: &str = "Registration successful!";
const REGISTRATION_FAILED: &str = "Email ID Already Taken | Try With Different Email.";

/// Banner text for a failed sign-in.
fn login_failure_message(err: &BookstoreError) -> String {
    match err {
        BookstoreError::MissingToken => LOGIN_NO_TOKEN.to_string(),
        other => other
            .backend_message()
            .map_or_else(|| LOGIN_FAILED.to_string(), String::from),
    }
}

/// Banner text for a failed sign-up.
fn registration_failure_message(err: &BookstoreError) -> String {
    err.backend_message()
        .map_or_else(|| REGISTRATION_FAILED.to_string(), String::from)
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signin.html")]
pub struct SignInTemplate {
    pub chrome: PageChrome,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignUpTemplate {
    pub chrome: PageChrome,
    /// Role values offered in the role select.
    pub roles: Vec<&'static str>,
}

// =============================================================================
// Sign In
// =============================================================================

/// Display the sign-in page.
pub async fn signin_page(State(state): State<AppState>, session: CustomerSession) -> SignInTemplate {
    SignInTemplate {
        chrome: PageChrome::load(&state, &session).await,
    }
}

/// Handle sign-in form submission.
#[instrument(skip(state, session, credentials), fields(email = %credentials.email))]
pub async fn signin(
    State(state): State<AppState>,
    session: CustomerSession,
    Form(credentials): Form<Credentials>,
) -> Result<Redirect> {
    match state.bookstore().login(&credentials).await {
        Ok(token) => {
            session.sign_in(&token).await?;
            session.set_flash(Flash::success(LOGIN_OK)).await?;
            tracing::info!("Customer signed in");
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in failed");
            session
                .set_flash(Flash::error(login_failure_message(&e)))
                .await?;
            Ok(Redirect::to("/signin"))
        }
    }
}

// =============================================================================
// Sign Up
// =============================================================================

/// Display the sign-up page.
pub async fn signup_page(State(state): State<AppState>, session: CustomerSession) -> SignUpTemplate {
    SignUpTemplate {
        chrome: PageChrome::load(&state, &session).await,
        roles: Role::ALL.iter().map(Role::as_str).collect(),
    }
}

/// Handle sign-up form submission.
///
/// An incomplete form never reaches the backend.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: CustomerSession,
    Form(form): Form<RegistrationForm>,
) -> Result<Redirect> {
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(e) => {
            session.set_flash(Flash::error(e.to_string())).await?;
            return Ok(Redirect::to("/signup"));
        }
    };

    match state.bookstore().register(&registration).await {
        Ok(()) => {
            tracing::info!("Customer registered");
            session.set_flash(Flash::success(REGISTRATION_OK)).await?;
            Ok(Redirect::to("/signin"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-up failed");
            session
                .set_flash(Flash::error(registration_failure_message(&e)))
                .await?;
            Ok(Redirect::to("/signup"))
        }
    }
}

// =============================================================================
// Sign Out
// =============================================================================

/// Sign out and start from a clean session.
#[instrument(skip(session))]
pub async fn logout(session: CustomerSession) -> Result<Redirect> {
    session.sign_out().await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_login_failure_prefers_backend_message() {
        let err = BookstoreError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: Some("Invalid password".to_string()),
        };
        assert_eq!(login_failure_message(&err), "Invalid password");
    }

    #[test]
    fn test_login_failure_fallbacks() {
        let err = BookstoreError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(login_failure_message(&err), LOGIN_FAILED);
        assert_eq!(
            login_failure_message(&BookstoreError::MissingToken),
            LOGIN_NO_TOKEN
        );
    }

    #[test]
    fn test_registration_failure_fallback() {
        let err = BookstoreError::Status {
            status: StatusCode::BAD_REQUEST,
            message: None,
        };
        assert_eq!(registration_failure_message(&err), REGISTRATION_FAILED);
    }
}
