//! Online bookstore storefront library.
//!
//! Server-rendered catalog, cart, checkout and sign-in pages in front of the
//! bookstore REST backend. Exposed as a library so the binary, the CLI and
//! the integration tests share one router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bookstore;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
