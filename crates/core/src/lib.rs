//! Bookstore Core - Shared domain types.
//!
//! This crate provides the types used by every Bookstore component:
//! - `storefront` - Public-facing bookstore site
//! - `cli` - Command-line tools for operators
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, books, carts, customer details
//! - [`checkout`] - The cart → details → summary state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod types;

pub use checkout::{CheckoutFlow, CheckoutStep, TransitionError};
pub use types::*;
