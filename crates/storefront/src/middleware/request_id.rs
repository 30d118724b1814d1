//! Request ID middleware for tracing and correlation.
//!
//! An upstream `x-request-id` is kept when it looks sane, otherwise a UUID v4
//! is minted. The ID ends up on the tracing span, as a Sentry tag, in the
//! request extensions and on the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound request ID that is trusted as-is.
const MAX_INBOUND_LEN: usize = 128;

/// The ID assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

fn inbound_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let value = value.trim();
    let sane = !value.is_empty()
        && value.len() <= MAX_INBOUND_LEN
        && value.chars().all(|c| c.is_ascii_graphic());
    sane.then(|| value.to_string())
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = inbound_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn with_header(value: &str) -> Request {
        Request::builder()
            .header(REQUEST_ID_HEADER, value)
            .body(Body::empty())
            .unwrap_or_default()
    }

    #[test]
    fn test_inbound_id_is_kept() {
        assert_eq!(
            inbound_id(&with_header("abc-123")),
            Some("abc-123".to_string())
        );
    }

    #[test]
    fn test_oversized_or_odd_ids_are_replaced() {
        assert_eq!(inbound_id(&with_header(&"x".repeat(200))), None);
        assert_eq!(inbound_id(&with_header("has space")), None);
        assert_eq!(inbound_id(&Request::new(Body::empty())), None);
    }
}
