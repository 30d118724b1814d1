//! Books and the shopping cart.
//!
//! The remote catalog and the remote cart are the source of truth. These
//! types are snapshots taken from the last successful fetch.

use serde::{Deserialize, Serialize};

use super::id::{BookId, CartLineId};
use super::price::Price;

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub author: String,
    pub price: Price,
    /// Cover image file name, relative to the cover asset directory.
    pub cover: Option<String>,
    /// Units available; zero or less means out of stock.
    pub quantity: i64,
    pub description: String,
}

impl Book {
    /// Whether the book can be added to the bag.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Book fields denormalized onto a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Not every backend build includes the book ID on cart lines.
    pub book_id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub price: Price,
    pub image_url: Option<String>,
}

/// One book-and-quantity entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub book: BookSnapshot,
    pub quantity: i64,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.book.price.times(self.quantity)
    }
}

/// The customer's cart as last reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Create a cart from its lines.
    #[must_use]
    pub const fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// An empty cart, used when the cart could not be loaded.
    #[must_use]
    pub const fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of unit price times quantity over every line.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Count shown on the cart badge.
    ///
    /// One per distinct line, so adding a book that is already in the cart
    /// leaves the badge unchanged even though the quantity grows.
    #[must_use]
    pub fn badge_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether a line for this book is present.
    #[must_use]
    pub fn contains_book(&self, id: BookId) -> bool {
        self.lines.iter().any(|line| line.book.book_id == Some(id))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn line(id: i64, book_id: i64, price: i64, quantity: i64) -> CartLine {
        CartLine {
            id: CartLineId::new(id),
            book: BookSnapshot {
                book_id: Some(BookId::new(book_id)),
                title: format!("Book {book_id}"),
                author: "Author".to_string(),
                price: Price::from(price),
                image_url: None,
            },
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::line;
    use super::*;

    #[test]
    fn test_total_sums_line_totals() {
        let cart = Cart::new(vec![line(1, 10, 100, 2), line(2, 11, 250, 3)]);
        assert_eq!(cart.total(), Price::from(950));
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::empty().total(), Price::ZERO);
        assert!(Cart::empty().is_empty());
    }

    #[test]
    fn test_badge_counts_lines_not_units() {
        let cart = Cart::new(vec![line(1, 10, 100, 5)]);
        assert_eq!(cart.badge_count(), 1);
    }

    #[test]
    fn test_contains_book() {
        let cart = Cart::new(vec![line(1, 10, 100, 1)]);
        assert!(cart.contains_book(BookId::new(10)));
        assert!(!cart.contains_book(BookId::new(11)));
    }

    #[test]
    fn test_in_stock() {
        let mut book = Book {
            id: BookId::new(1),
            name: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            price: Price::from(499),
            cover: None,
            quantity: 1,
            description: String::new(),
        };
        assert!(book.in_stock());
        book.quantity = 0;
        assert!(!book.in_stock());
        book.quantity = -3;
        assert!(!book.in_stock());
    }
}
