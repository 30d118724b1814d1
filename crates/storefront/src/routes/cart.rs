//! Cart and checkout route handlers.
//!
//! Every mutation goes to the backend and then redirects to `/cart`, which
//! re-fetches the whole cart. The checkout step lives in the session as a
//! `CheckoutFlow`; handlers only move it through its guarded transitions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use bookstore_core::{
    AddressType, BookId, Cart, CartLine, CartLineId, CheckoutFlow, CheckoutStep,
    CustomerDetailsForm, CustomerField, FieldErrors, TransitionError,
};
use serde::Deserialize;
use tracing::instrument;

use super::{PageChrome, catalog::parse_page, cover_url, load_cart_or_empty};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CustomerSession, RequireToken};
use crate::models::{Flash, PlacedOrder};
use crate::state::AppState;

const ORDER_PLACED: &str = "Order placed successfully!";
const ORDER_FAILED: &str = "Order failed";

// =============================================================================
// View Types
// =============================================================================

/// Progress indicator entry.
pub struct StepView {
    pub number: usize,
    pub label: &'static str,
    pub active: bool,
    pub done: bool,
}

fn step_views(current: CheckoutStep) -> Vec<StepView> {
    CheckoutStep::ALL
        .into_iter()
        .map(|step| StepView {
            number: step.index() + 1,
            label: step.label(),
            active: step == current,
            done: step.index() < current.index(),
        })
        .collect()
}

/// Cart line display data for templates.
pub struct LineView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub unit_price: String,
    pub quantity: i64,
    pub line_total: String,
    pub image_url: String,
}

impl From<&CartLine> for LineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.as_i64(),
            title: line.book.title.clone(),
            author: line.book.author.clone(),
            unit_price: line.book.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
            image_url: cover_url(line.book.image_url.as_deref()),
        }
    }
}

/// A text input on the customer details form.
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<&'static str>,
    pub multiline: bool,
}

/// An address type radio button.
pub struct AddressOption {
    pub value: &'static str,
    pub checked: bool,
}

const fn field_label(field: CustomerField) -> &'static str {
    match field {
        CustomerField::Name => "Name",
        CustomerField::PhoneNumber => "Phone number",
        CustomerField::Pincode => "Pincode",
        CustomerField::Locality => "Locality",
        CustomerField::Address => "Address",
        CustomerField::City => "City/Town",
        CustomerField::Landmark => "Landmark",
        CustomerField::AddressType => "Type",
    }
}

fn field_value(draft: &CustomerDetailsForm, field: CustomerField) -> &str {
    match field {
        CustomerField::Name => &draft.name,
        CustomerField::PhoneNumber => &draft.phone_number,
        CustomerField::Pincode => &draft.pincode,
        CustomerField::Locality => &draft.locality,
        CustomerField::Address => &draft.address,
        CustomerField::City => &draft.city,
        CustomerField::Landmark => &draft.landmark,
        CustomerField::AddressType => &draft.address_type,
    }
}

/// Customer details form display data.
pub struct DetailsFormView {
    pub fields: Vec<FieldView>,
    pub address_options: Vec<AddressOption>,
    pub address_type_error: Option<&'static str>,
}

impl DetailsFormView {
    fn new(draft: &CustomerDetailsForm, errors: &FieldErrors) -> Self {
        let fields = CustomerField::ALL
            .into_iter()
            .filter(|f| *f != CustomerField::AddressType)
            .map(|f| FieldView {
                name: f.form_name(),
                label: field_label(f),
                value: field_value(draft, f).to_string(),
                error: errors.get(f.form_name()),
                multiline: f == CustomerField::Address,
            })
            .collect();
        let address_options = AddressType::ALL
            .into_iter()
            .map(|t| AddressOption {
                value: t.as_str(),
                checked: draft.address_type.trim() == t.as_str(),
            })
            .collect();

        Self {
            fields,
            address_options,
            address_type_error: errors.get(CustomerField::AddressType.form_name()),
        }
    }
}

/// Cart page template, one section per checkout step.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub chrome: PageChrome,
    pub steps: Vec<StepView>,
    pub at_cart: bool,
    pub at_details: bool,
    pub at_summary: bool,
    pub lines: Vec<LineView>,
    pub line_count: usize,
    pub total: String,
    pub form: DetailsFormView,
}

async fn render(
    session: &CustomerSession,
    cart: &Cart,
    flow: &CheckoutFlow,
    errors: &FieldErrors,
) -> CartTemplate {
    let step = flow.step();
    CartTemplate {
        chrome: PageChrome::with_cart(session, true, cart).await,
        steps: step_views(step),
        at_cart: step == CheckoutStep::Cart,
        at_details: step == CheckoutStep::Details,
        at_summary: step == CheckoutStep::Summary,
        lines: cart.lines.iter().map(LineView::from).collect(),
        line_count: cart.lines.len(),
        total: cart.total().to_string(),
        form: DetailsFormView::new(flow.draft(), errors),
    }
}

fn to_cart() -> Redirect {
    Redirect::to("/cart")
}

// =============================================================================
// Cart Routes
// =============================================================================

/// Display the current checkout step.
///
/// The cart is re-fetched on every view. An empty cart pulls the flow back
/// to the first step.
#[instrument(skip(state, session, token))]
pub async fn show(
    State(state): State<AppState>,
    session: CustomerSession,
    RequireToken(token): RequireToken,
) -> Result<CartTemplate> {
    let cart = load_cart_or_empty(&state, &token).await;
    let mut flow = session.checkout_flow().await?;
    if flow.reconcile(&cart) {
        session.save_checkout_flow(&flow).await?;
    }

    Ok(render(&session, &cart, &flow, &FieldErrors::default()).await)
}

/// Form data posted by "Add to Bag".
#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    /// Catalog page to return to.
    pub page: Option<String>,
}

/// Add one unit of a book to the cart.
///
/// Always calls the backend, even for a book that is already in the cart.
#[instrument(skip(state, token, form))]
pub async fn add(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    Path(book_id): Path<BookId>,
    Form(form): Form<AddForm>,
) -> Redirect {
    add_breadcrumb(
        "cart",
        "Added book to bag",
        Some(&[("book_id", &book_id.to_string())]),
    );

    if let Err(e) = state.bookstore().add_to_cart(&token, book_id).await {
        tracing::error!(error = %e, "Failed to add book to cart");
    }

    let page = parse_page(form.page.as_deref());
    Redirect::to(&format!("/?page={page}"))
}

/// Increase a line's quantity by one.
#[instrument(skip(state, token))]
pub async fn increase(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    Path(cart_id): Path<CartLineId>,
) -> Redirect {
    if let Err(e) = state.bookstore().increase_quantity(&token, cart_id).await {
        tracing::error!(error = %e, "Failed to increase cart quantity");
    }
    to_cart()
}

/// Decrease a line's quantity by one.
#[instrument(skip(state, token))]
pub async fn decrease(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    Path(cart_id): Path<CartLineId>,
) -> Redirect {
    if let Err(e) = state.bookstore().decrease_quantity(&token, cart_id).await {
        tracing::error!(error = %e, "Failed to decrease cart quantity");
    }
    to_cart()
}

/// Remove a line from the cart.
#[instrument(skip(state, token))]
pub async fn remove(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    Path(cart_id): Path<CartLineId>,
) -> Redirect {
    if let Err(e) = state.bookstore().remove_line(&token, cart_id).await {
        tracing::error!(error = %e, "Failed to remove cart line");
    }
    to_cart()
}

// =============================================================================
// Checkout Routes
// =============================================================================

/// My Cart -> Customer Details. Does nothing when the cart is empty.
#[instrument(skip(state, session, token))]
pub async fn continue_to_details(
    State(state): State<AppState>,
    session: CustomerSession,
    RequireToken(token): RequireToken,
) -> Result<Redirect> {
    let cart = load_cart_or_empty(&state, &token).await;
    let mut flow = session.checkout_flow().await?;

    match flow.proceed_to_details(&cart) {
        Ok(()) => {
            add_breadcrumb("checkout", "Entered customer details", None);
            session.save_checkout_flow(&flow).await?;
        }
        Err(e) => tracing::debug!(error = %e, "Stayed on cart step"),
    }

    Ok(to_cart())
}

/// Customer Details -> Order Summary.
///
/// A submission with missing fields re-renders the form with one message per
/// missing field and keeps what was typed.
#[instrument(skip(state, session, token, form))]
pub async fn submit_details(
    State(state): State<AppState>,
    session: CustomerSession,
    RequireToken(token): RequireToken,
    Form(form): Form<CustomerDetailsForm>,
) -> Result<Response> {
    let mut flow = session.checkout_flow().await?;

    match flow.submit_details(form) {
        Ok(()) => {
            add_breadcrumb("checkout", "Reviewed order summary", None);
            session.save_checkout_flow(&flow).await?;
            Ok(to_cart().into_response())
        }
        Err(TransitionError::InvalidDetails(errors)) => {
            session.save_checkout_flow(&flow).await?;
            let cart = load_cart_or_empty(&state, &token).await;
            Ok(render(&session, &cart, &flow, &errors).await.into_response())
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignored details submission");
            Ok(to_cart().into_response())
        }
    }
}

/// Step back one step.
#[instrument(skip(session, _token))]
pub async fn back(session: CustomerSession, RequireToken(_token): RequireToken) -> Result<Redirect> {
    let mut flow = session.checkout_flow().await?;
    flow.back();
    session.save_checkout_flow(&flow).await?;
    Ok(to_cart())
}

/// Place the order from the summary step.
///
/// On success the flow starts over and the order ID is handed to the
/// confirmation page. On failure the flow stays on the summary step with the
/// entered details intact.
#[instrument(skip(state, session, token))]
pub async fn checkout(
    State(state): State<AppState>,
    session: CustomerSession,
    RequireToken(token): RequireToken,
) -> Result<Redirect> {
    let mut flow = session.checkout_flow().await?;
    let details = match flow.details_for_order() {
        Ok(details) => details.clone(),
        Err(e) => {
            tracing::debug!(error = %e, "Checkout requested outside the summary step");
            return Ok(to_cart());
        }
    };

    match state.bookstore().place_order(&token, &details).await {
        Ok(order_id) => {
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[("order_id", order_id.as_str())]),
            );
            tracing::info!(order_id = %order_id, "Order placed");

            session.set_placed_order(&PlacedOrder { order_id }).await?;
            flow.reset();
            session.save_checkout_flow(&flow).await?;
            session.set_flash(Flash::success(ORDER_PLACED)).await?;
            Ok(Redirect::to("/order"))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to place order");
            session.set_flash(Flash::error(ORDER_FAILED)).await?;
            Ok(to_cart())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_step_views_mark_progress() {
        let steps = step_views(CheckoutStep::Details);
        assert!(steps[0].done && !steps[0].active);
        assert!(steps[1].active && !steps[1].done);
        assert!(!steps[2].active && !steps[2].done);
        assert_eq!(steps[2].label, "Order Summary");
    }

    #[test]
    fn test_details_form_view_carries_errors_and_values() {
        let draft = CustomerDetailsForm {
            name: "Asha".to_string(),
            address_type: "Work".to_string(),
            ..CustomerDetailsForm::default()
        };
        let errors = draft.validate().unwrap_err();
        let view = DetailsFormView::new(&draft, &errors);

        assert_eq!(view.fields.len(), 7);
        assert_eq!(view.fields[0].value, "Asha");
        assert!(view.fields[0].error.is_none());
        assert_eq!(view.fields[5].error, Some("City/Town is required"));
        assert!(view.address_type_error.is_none());
        assert!(view.address_options.iter().any(|o| o.value == "Work" && o.checked));
    }
}
