//! In-process double of the bookstore REST backend.
//!
//! Serves the endpoints the storefront calls, keeps one cart per bearer
//! token, and records every request so tests can assert on what reached the
//! backend.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// The only password the double accepts.
pub const PASSWORD: &str = "secret";

/// Order ID returned by a successful order placement.
pub const ORDER_ID: i64 = 123;

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub token: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
struct Line {
    cart_id: i64,
    book_id: i64,
    quantity: i64,
}

#[derive(Default)]
struct BackendState {
    books: Vec<Value>,
    carts: HashMap<String, Vec<Line>>,
    users: Vec<String>,
    requests: Vec<RecordedRequest>,
    next_cart_id: i64,
    fail_orders: bool,
}

type Shared = Arc<Mutex<BackendState>>;

/// Handle to a running backend double.
#[derive(Clone)]
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    /// Start a backend stocked with books `1..=book_count`.
    ///
    /// Book 2 is out of stock. Book `n` costs `100 + n`.
    pub async fn start(book_count: i64) -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            books: (1..=book_count).map(book_json).collect(),
            next_cart_id: 1,
            ..BackendState::default()
        }));

        let app = Router::new()
            .route("/book/allBooks", get(all_books))
            .route("/user/login", post(login))
            .route("/user/userRegistration", post(register))
            .route("/cartApi/addTooCart/{book_id}", post(add_to_cart))
            .route("/cartApi/getAllCartById", get(get_cart))
            .route("/cartApi/updateCartAdd/{cart_id}", patch(increase))
            .route("/cartApi/updateCartRmv/{cart_id}", patch(decrease))
            .route("/cartApi/removeFromCart/{cart_id}", delete(remove))
            .route("/orderApi/orderPlace", post(place_order))
            .with_state(state.clone());

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind backend listener");
        let addr = listener.local_addr().expect("Backend has no local address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Backend server failed");
        });

        Self { addr, state }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests whose path starts with `prefix`.
    #[must_use]
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }

    /// Make every order placement fail with a 500.
    pub fn fail_orders(&self) {
        self.state.lock().unwrap().fail_orders = true;
    }

    /// Register an account up front.
    pub fn add_user(&self, email: &str) {
        self.state.lock().unwrap().users.push(email.to_string());
    }
}

fn book_json(n: i64) -> Value {
    json!({
        "bookId": n,
        "bookName": format!("Book {n}"),
        "bookAuthor": format!("Author {n}"),
        "bookPrice": 100 + n,
        "bookLogoMultipart": format!("book{n}.jpg"),
        "bookQuantity": if n == 2 { 0 } else { 5 },
        "bookDescription": format!("Description of book {n}"),
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(String::from)
}

fn record(
    state: &Shared,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &Bytes,
) -> Option<String> {
    let token = bearer(headers);
    state.lock().unwrap().requests.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        token: token.clone(),
        body: serde_json::from_slice(body).unwrap_or(Value::Null),
    });
    token
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

async fn all_books(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    record(&state, method, &uri, &headers, &Bytes::new());
    Json(Value::Array(state.lock().unwrap().books.clone()))
}

async fn login(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, method, &uri, &headers, &body);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let email = body["email"].as_str().unwrap_or_default();

    if body["password"] == PASSWORD && !email.is_empty() {
        Json(json!({ "token": format!("token-{email}") })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn register(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, method, &uri, &headers, &body);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let email = body["email"].as_str().unwrap_or_default().to_string();

    let mut state = state.lock().unwrap();
    if state.users.contains(&email) {
        // No message body, so the storefront falls back to its own text
        return StatusCode::CONFLICT.into_response();
    }
    state.users.push(email);
    Json(json!({ "message": "User registered" })).into_response()
}

async fn add_to_cart(
    State(state): State<Shared>,
    Path(book_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(token) = record(&state, method, &uri, &headers, &body) else {
        return unauthorized();
    };

    let mut state = state.lock().unwrap();
    let next_id = state.next_cart_id;
    let lines = state.carts.entry(token).or_default();
    if let Some(line) = lines.iter_mut().find(|l| l.book_id == book_id) {
        line.quantity += 1;
    } else {
        lines.push(Line {
            cart_id: next_id,
            book_id,
            quantity: 1,
        });
        state.next_cart_id += 1;
    }
    Json(json!({})).into_response()
}

async fn get_cart(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(token) = record(&state, method, &uri, &headers, &Bytes::new()) else {
        return unauthorized();
    };

    let state = state.lock().unwrap();
    let lines: Vec<Value> = state
        .carts
        .get(&token)
        .map(|lines| {
            lines
                .iter()
                .filter_map(|line| {
                    let book = state
                        .books
                        .iter()
                        .find(|b| b["bookId"] == line.book_id)?;
                    Some(json!({
                        "cartId": line.cart_id,
                        "cartQuantity": line.quantity,
                        "book": {
                            "bookId": line.book_id,
                            "title": book["bookName"],
                            "author": book["bookAuthor"],
                            "price": book["bookPrice"],
                            "imageUrl": book["bookLogoMultipart"],
                        },
                    }))
                })
                .collect()
        })
        .unwrap_or_default();
    Json(Value::Array(lines)).into_response()
}

fn update_line(
    state: &Shared,
    token: &str,
    cart_id: i64,
    change: impl FnOnce(&mut Vec<Line>, usize),
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(lines) = state.carts.get_mut(token) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(index) = lines.iter().position(|l| l.cart_id == cart_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    change(lines, index);
    Json(json!({})).into_response()
}

async fn increase(
    State(state): State<Shared>,
    Path(cart_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(token) = record(&state, method, &uri, &headers, &Bytes::new()) else {
        return unauthorized();
    };
    update_line(&state, &token, cart_id, |lines, i| lines[i].quantity += 1)
}

async fn decrease(
    State(state): State<Shared>,
    Path(cart_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(token) = record(&state, method, &uri, &headers, &Bytes::new()) else {
        return unauthorized();
    };
    update_line(&state, &token, cart_id, |lines, i| {
        lines[i].quantity = (lines[i].quantity - 1).max(1);
    })
}

async fn remove(
    State(state): State<Shared>,
    Path(cart_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(token) = record(&state, method, &uri, &headers, &Bytes::new()) else {
        return unauthorized();
    };
    update_line(&state, &token, cart_id, |lines, i| {
        lines.remove(i);
    })
}

async fn place_order(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(token) = record(&state, method, &uri, &headers, &body) else {
        return unauthorized();
    };

    let mut state = state.lock().unwrap();
    if state.fail_orders {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    state.carts.remove(&token);
    Json(json!({ "orderId": ORDER_ID })).into_response()
}
