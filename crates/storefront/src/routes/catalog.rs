//! Catalog route handler.
//!
//! The full book list is fetched on every view and paginated here, 16 books
//! to a page. Signed-in visitors also get their cart loaded so the badge and
//! the "Added to Bag" marks reflect the backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use bookstore_core::{BOOKS_PER_PAGE, Book, Cart, CatalogPage};
use serde::Deserialize;
use tracing::instrument;

use super::{PageChrome, cover_url, load_cart_or_empty};
use crate::filters;
use crate::middleware::{CustomerSession, OptionalToken};
use crate::state::AppState;

/// Query parameters for the catalog.
///
/// `page` is kept as text so a malformed value falls back to page 1 instead
/// of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<String>,
}

/// Parse a 1-based page number, defaulting to the first page.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Book card display data for templates.
pub struct BookCard {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub price: String,
    pub description: String,
    pub cover_url: String,
    pub in_stock: bool,
    /// A line for this book is already in the cart.
    pub added: bool,
}

impl BookCard {
    fn new(book: &Book, cart: &Cart) -> Self {
        Self {
            id: book.id.as_i64(),
            name: book.name.clone(),
            author: book.author.clone(),
            price: book.price.to_string(),
            description: book.description.clone(),
            cover_url: cover_url(book.cover.as_deref()),
            in_stock: book.in_stock(),
            added: cart.contains_book(book.id),
        }
    }
}

/// One entry in the pagination control.
pub struct PageLink {
    pub number: usize,
    pub current: bool,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub chrome: PageChrome,
    pub books: Vec<BookCard>,
    pub current_page: usize,
    pub pages: Vec<PageLink>,
    pub show_pagination: bool,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
}

/// Display the catalog.
///
/// A failed catalog fetch renders an empty catalog; the failure is only
/// logged.
#[instrument(skip(state, session, token))]
pub async fn index(
    State(state): State<AppState>,
    session: CustomerSession,
    OptionalToken(token): OptionalToken,
    Query(query): Query<CatalogQuery>,
) -> CatalogTemplate {
    let books = match state.bookstore().list_books().await {
        Ok(books) => books,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch catalog");
            Vec::new()
        }
    };

    let cart = match &token {
        Some(token) => load_cart_or_empty(&state, token).await,
        None => Cart::empty(),
    };

    let page = CatalogPage::paginate(&books, parse_page(query.page.as_deref()), BOOKS_PER_PAGE);
    let cards = page
        .items
        .iter()
        .map(|book| BookCard::new(book, &cart))
        .collect();
    let pages = page
        .page_numbers()
        .into_iter()
        .map(|number| PageLink {
            number,
            current: number == page.current_page,
        })
        .collect();

    CatalogTemplate {
        chrome: PageChrome::with_cart(&session, token.is_some(), &cart).await,
        books: cards,
        current_page: page.current_page,
        pages,
        show_pagination: page.total_pages > 1,
        previous_page: page.has_previous().then(|| page.current_page - 1),
        next_page: page.has_next().then(|| page.current_page + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
    }
}
