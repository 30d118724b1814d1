//! Wire types for the bookstore REST backend.
//!
//! The backend speaks camelCase JSON. These types mirror it exactly and
//! convert into the domain types from `bookstore_core`.

use std::str::FromStr;

use bookstore_core::{
    Book, BookId, BookSnapshot, Cart, CartLine, CartLineId, Credentials, CustomerDetails,
    OrderNumber, Price, Registration,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Responses
// =============================================================================

/// A book as returned by `GET book/allBooks`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub book_id: i64,
    #[serde(default)]
    pub book_name: String,
    #[serde(default)]
    pub book_author: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub book_price: Price,
    #[serde(default)]
    pub book_logo_multipart: Option<String>,
    #[serde(default)]
    pub book_quantity: i64,
    #[serde(default)]
    pub book_description: Option<String>,
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Self {
            id: BookId::new(dto.book_id),
            name: dto.book_name,
            author: dto.book_author,
            price: dto.book_price,
            cover: dto.book_logo_multipart.filter(|c| !c.trim().is_empty()),
            quantity: dto.book_quantity,
            description: dto.book_description.unwrap_or_default(),
        }
    }
}

/// The book embedded in a cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBookDto {
    #[serde(default)]
    pub book_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A cart line as returned by `GET cartApi/getAllCartById`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub cart_id: i64,
    pub cart_quantity: i64,
    pub book: CartBookDto,
}

impl From<CartLineDto> for CartLine {
    fn from(dto: CartLineDto) -> Self {
        Self {
            id: CartLineId::new(dto.cart_id),
            book: BookSnapshot {
                book_id: dto.book.book_id.map(BookId::new),
                title: dto.book.title,
                author: dto.book.author,
                price: dto.book.price,
                image_url: dto.book.image_url.filter(|u| !u.trim().is_empty()),
            },
            quantity: dto.cart_quantity,
        }
    }
}

/// Convert a full cart response into the domain cart.
pub fn cart_from_lines(lines: Vec<CartLineDto>) -> Cart {
    Cart::new(lines.into_iter().map(CartLine::from).collect())
}

/// Response of `POST user/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Response of `POST orderApi/orderPlace`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub order_id: OrderNumber,
}

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST user/login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(creds: &'a Credentials) -> Self {
        Self {
            email: creds.email.trim(),
            password: &creds.password,
        }
    }
}

/// Body of `POST user/userRegistration`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub dob: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'static str,
}

impl<'a> From<&'a Registration> for RegistrationRequest<'a> {
    fn from(r: &'a Registration) -> Self {
        Self {
            first_name: &r.first_name,
            last_name: &r.last_name,
            dob: &r.dob,
            email: &r.email,
            password: &r.password,
            role: r.role.as_str(),
        }
    }
}

/// Body of `POST orderApi/orderPlace`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest<'a> {
    pub name: &'a str,
    pub phone_number: &'a str,
    pub pincode: &'a str,
    pub locality: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub landmark: &'a str,
    #[serde(rename = "type")]
    pub address_type: &'static str,
}

impl<'a> From<&'a CustomerDetails> for OrderRequest<'a> {
    fn from(d: &'a CustomerDetails) -> Self {
        Self {
            name: &d.name,
            phone_number: &d.phone_number,
            pincode: &d.pincode,
            locality: &d.locality,
            address: &d.address,
            city: &d.city,
            landmark: &d.landmark,
            address_type: d.address_type.as_str(),
        }
    }
}

/// Empty JSON object sent with body-less mutations.
#[derive(Serialize)]
pub struct EmptyBody {}

// =============================================================================
// Helpers
// =============================================================================

/// Prices arrive as JSON numbers, occasionally as strings.
///
/// Numbers go through their textual form so `499.99` stays exact.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    };
    Decimal::from_str(text.trim())
        .map(Price::new)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstore_core::{AddressType, CustomerDetailsForm, Role};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_book_from_backend_json() {
        let dto: BookDto = serde_json::from_value(json!({
            "bookId": 7,
            "bookName": "Dune",
            "bookAuthor": "Frank Herbert",
            "bookPrice": 499.99,
            "bookLogoMultipart": "dune.jpg",
            "bookQuantity": 3,
            "bookDescription": "Spice."
        }))
        .unwrap();
        let book = Book::from(dto);

        assert_eq!(book.id, BookId::new(7));
        assert_eq!(book.price.to_string(), "Rs. 499.99");
        assert_eq!(book.cover.as_deref(), Some("dune.jpg"));
        assert!(book.in_stock());
    }

    #[test]
    fn test_book_tolerates_missing_optional_fields() {
        let dto: BookDto = serde_json::from_value(json!({
            "bookId": 1,
            "bookPrice": "100",
            "bookLogoMultipart": ""
        }))
        .unwrap();
        let book = Book::from(dto);
        assert!(book.cover.is_none());
        assert!(!book.in_stock());
        assert_eq!(book.description, "");
    }

    #[test]
    fn test_cart_line_from_backend_json() {
        let lines: Vec<CartLineDto> = serde_json::from_value(json!([
            {
                "cartId": 11,
                "cartQuantity": 2,
                "book": { "title": "Book A", "author": "Author A", "price": 100, "imageUrl": "" }
            },
            {
                "cartId": 12,
                "cartQuantity": 1,
                "book": { "bookId": 4, "title": "Book B", "author": "Author B", "price": 250.5 }
            }
        ]))
        .unwrap();
        let cart = cart_from_lines(lines);

        assert_eq!(cart.badge_count(), 2);
        assert_eq!(cart.total().to_string(), "Rs. 450.5");
        assert!(cart.contains_book(BookId::new(4)));
        assert!(cart.lines[0].book.image_url.is_none());
    }

    #[test]
    fn test_order_request_uses_backend_field_names() {
        let form = CustomerDetailsForm {
            name: "Asha Rao".to_string(),
            phone_number: "9876543210".to_string(),
            pincode: "560034".to_string(),
            locality: "HSR Layout".to_string(),
            address: "12 Main Road".to_string(),
            city: "Bangalore".to_string(),
            landmark: "Near park".to_string(),
            address_type: AddressType::Work.to_string(),
        };
        let details = form.validate().unwrap();
        let value = serde_json::to_value(OrderRequest::from(&details)).unwrap();

        assert_eq!(value["phoneNumber"], "9876543210");
        assert_eq!(value["type"], "Work");
        assert!(value.get("address_type").is_none());
    }

    #[test]
    fn test_registration_request_shape() {
        let registration = bookstore_core::RegistrationForm {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            dob: "1990-04-01".to_string(),
            email: "asha@example.com".to_string(),
            password: "hunter22".to_string(),
            role: Role::Admin.to_string(),
        }
        .validate()
        .unwrap();
        let value = serde_json::to_value(RegistrationRequest::from(&registration)).unwrap();

        assert_eq!(value["firstName"], "Asha");
        assert_eq!(value["role"], "ADMIN");
    }

    #[test]
    fn test_order_id_accepts_number() {
        let response: OrderPlacedResponse =
            serde_json::from_value(json!({ "orderId": 123 })).unwrap();
        assert_eq!(response.order_id.as_str(), "123");
    }

    #[test]
    fn test_bad_price_is_a_parse_error() {
        let result: Result<CartBookDto, _> =
            serde_json::from_value(json!({ "title": "X", "price": "cheap" }));
        assert!(result.is_err());
    }
}
