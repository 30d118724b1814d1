//! Static page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use super::PageChrome;
use crate::filters;
use crate::middleware::CustomerSession;
use crate::state::AppState;

/// Placeholder for profile, orders and wishlist.
#[derive(Template, WebTemplate)]
#[template(path = "pages/upcoming.html")]
pub struct UpcomingTemplate {
    pub chrome: PageChrome,
}

/// Display the "coming soon" placeholder.
pub async fn upcoming(State(state): State<AppState>, session: CustomerSession) -> UpcomingTemplate {
    UpcomingTemplate {
        chrome: PageChrome::load(&state, &session).await,
    }
}
