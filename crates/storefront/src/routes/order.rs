//! Order confirmation handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use super::PageChrome;
use crate::error::Result;
use crate::filters;
use crate::middleware::CustomerSession;
use crate::state::AppState;

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/success.html")]
pub struct OrderTemplate {
    pub chrome: PageChrome,
    pub order_id: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address_lines: Vec<String>,
}

/// Show the order that was just placed.
///
/// The order is taken from the session, so a reload or a direct visit finds
/// nothing and goes back to the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: CustomerSession) -> Result<Response> {
    let Some(order) = session.take_placed_order().await? else {
        return Ok(Redirect::to("/cart").into_response());
    };

    let store = &state.config().store;
    Ok(OrderTemplate {
        chrome: PageChrome::load(&state, &session).await,
        order_id: order.order_id.to_string(),
        contact_email: store.email.clone(),
        contact_phone: store.phone.clone(),
        address_lines: store.address_lines.clone(),
    }
    .into_response())
}
