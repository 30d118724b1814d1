//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. Session layer (tower-sessions, added by the binary or the tests)
//! 3. `TraceLayer` (request spans)
//! 4. Request ID (recorded on the span)
//! 5. Security headers
//! 6. Rate limiting on the credential forms (governor)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{CustomerSession, OptionalToken, RequireToken};
pub use rate_limit::auth_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
