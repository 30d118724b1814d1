//! Integration tests for the details and summary steps and order placement.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bookstore_integration_tests::{ORDER_ID, TestApp, complete_details, location};

const FIELD_MESSAGES: [&str; 8] = [
    "Name is required",
    "Phone number is required",
    "Pincode is required",
    "Locality is required",
    "Address is required",
    "City/Town is required",
    "Landmark is required",
    "Type is required",
];

async fn app_with_bag() -> TestApp {
    let app = TestApp::spawn(5).await;
    app.sign_in().await;
    app.post_form("/cart/add/1", &[]).await;
    app.post_form("/cart/add/3", &[]).await;
    app
}

#[tokio::test]
async fn test_continue_shows_details_form() {
    let app = app_with_bag().await;

    app.post_form("/cart/continue", &[]).await;
    let html = app.get_html("/cart").await;

    assert!(html.contains("<h1>Customer Details</h1>"));
    assert!(html.contains("name=\"phone_number\""));
    assert!(html.contains("value=\"Home\""));
    assert!(!html.contains("My Cart ("));
}

#[tokio::test]
async fn test_empty_details_show_every_message() {
    let app = app_with_bag().await;
    app.post_form("/cart/continue", &[]).await;

    let resp = app.post_form("/cart/details", &[]).await;
    assert!(resp.status().is_success());
    let html = resp.text().await.unwrap();

    for message in FIELD_MESSAGES {
        assert!(html.contains(message), "missing {message}");
    }
    assert!(html.contains("<h1>Customer Details</h1>"));
}

#[tokio::test]
async fn test_partial_details_keep_typed_values() {
    let app = app_with_bag().await;
    app.post_form("/cart/continue", &[]).await;

    let resp = app
        .post_form("/cart/details", &[("name", "Asha Rao"), ("city", "Bengaluru")])
        .await;
    let html = resp.text().await.unwrap();

    assert!(html.contains("value=\"Asha Rao\""));
    assert!(html.contains("value=\"Bengaluru\""));
    assert!(!html.contains("Name is required"));
    assert!(html.contains("Pincode is required"));
}

#[tokio::test]
async fn test_summary_total() {
    let app = app_with_bag().await;
    app.post_form("/cart/lines/1/increase", &[]).await;

    app.reach_summary().await;
    let html = app.get_html("/cart").await;

    assert!(html.contains("<h1>Order Summary</h1>"));
    assert!(html.contains("Book 1 (x2)"));
    assert!(html.contains("Rs. 202"));
    assert!(html.contains("Book 3 (x1)"));
    assert!(html.contains("Total Price: Rs. 305"));
}

#[tokio::test]
async fn test_back_returns_to_details_with_values() {
    let app = app_with_bag().await;
    app.reach_summary().await;

    let resp = app.post_form("/cart/back", &[]).await;
    assert_eq!(location(&resp), "/cart");

    let html = app.get_html("/cart").await;
    assert!(html.contains("<h1>Customer Details</h1>"));
    assert!(html.contains("value=\"560102\""));
}

#[tokio::test]
async fn test_place_order() {
    let app = app_with_bag().await;
    app.reach_summary().await;

    let resp = app.post_form("/cart/checkout", &[]).await;
    assert_eq!(location(&resp), "/order");

    let html = app.get_html("/order").await;
    assert!(html.contains("Order Placed Successfully"));
    assert!(html.contains(&format!("<strong>#{ORDER_ID}</strong>")));
    assert!(html.contains("Order placed successfully!"));
    assert!(html.contains("admin@bookstore.com"));

    let orders = app.backend.requests_to("/orderApi/orderPlace");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].body["name"], "Asha Rao");
    assert_eq!(orders[0].body["phoneNumber"], "9876543210");
    assert_eq!(orders[0].body["type"], "Home");
}

#[tokio::test]
async fn test_confirmation_is_shown_once() {
    let app = app_with_bag().await;
    app.reach_summary().await;
    app.post_form("/cart/checkout", &[]).await;

    app.get_html("/order").await;
    let resp = app.get("/order").await;

    assert_eq!(location(&resp), "/cart");
}

#[tokio::test]
async fn test_direct_order_visit_redirects_to_cart() {
    let app = TestApp::spawn(3).await;

    let resp = app.get("/order").await;

    assert_eq!(location(&resp), "/cart");
}

#[tokio::test]
async fn test_flow_restarts_after_order() {
    let app = app_with_bag().await;
    app.reach_summary().await;
    app.post_form("/cart/checkout", &[]).await;
    app.get_html("/order").await;

    let html = app.get_html("/cart").await;

    assert!(html.contains("My Cart (0)"));
}

#[tokio::test]
async fn test_failed_order_stays_on_summary() {
    let app = app_with_bag().await;
    app.backend.fail_orders();
    app.reach_summary().await;

    let resp = app.post_form("/cart/checkout", &[]).await;
    assert_eq!(location(&resp), "/cart");

    let html = app.get_html("/cart").await;
    assert!(html.contains("Order failed"));
    assert!(html.contains("<h1>Order Summary</h1>"));
}

#[tokio::test]
async fn test_checkout_outside_summary_is_ignored() {
    let app = app_with_bag().await;

    let resp = app.post_form("/cart/checkout", &[]).await;

    assert_eq!(location(&resp), "/cart");
    assert!(app.backend.requests_to("/orderApi").is_empty());
}

#[test]
fn test_complete_details_cover_every_field() {
    assert_eq!(complete_details().len(), FIELD_MESSAGES.len());
}
