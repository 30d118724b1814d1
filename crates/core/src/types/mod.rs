//! Core types for the Bookstore storefront.
//!
//! This module provides type-safe wrappers for the bookstore domain.

pub mod account;
pub mod catalog;
pub mod customer;
pub mod id;
pub mod page;
pub mod price;

pub use account::{Credentials, Registration, RegistrationError, RegistrationForm, Role};
pub use catalog::{Book, BookSnapshot, Cart, CartLine};
pub use customer::{
    AddressType, CustomerDetails, CustomerDetailsForm, CustomerField, FieldErrors,
    UnknownAddressType,
};
pub use id::*;
pub use page::{BOOKS_PER_PAGE, CatalogPage};
pub use price::Price;
