//! Catalog check against the bookstore backend.
//!
//! Fetches every book and logs the requested page, paginated exactly as the
//! storefront paginates it. Useful for checking `BOOKSTORE_API_URL` before
//! a deploy.

use bookstore_core::{BOOKS_PER_PAGE, CatalogPage};
use bookstore_storefront::bookstore::BookstoreClient;
use bookstore_storefront::config::BookstoreApiConfig;

const DEFAULT_API_URL: &str = "http://localhost:8080/";

/// Log one page of the catalog.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the backend request fails.
pub async fn list(api_url: Option<&str>, page: usize) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let raw = match api_url {
        Some(url) => url.to_string(),
        None => std::env::var("BOOKSTORE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
    };
    let config = BookstoreApiConfig::parse(&raw)?;
    let client = BookstoreClient::new(&config);

    tracing::info!(backend = %client.base_url(), "Fetching catalog");
    let books = client.list_books().await?;
    let catalog = CatalogPage::paginate(&books, page, BOOKS_PER_PAGE);

    tracing::info!(
        total = books.len(),
        page = catalog.current_page,
        pages = catalog.total_pages,
        "Catalog loaded"
    );
    for book in &catalog.items {
        tracing::info!(
            id = %book.id,
            price = %book.price,
            in_stock = book.in_stock(),
            "{} by {}",
            book.name,
            book.author
        );
    }

    Ok(())
}
