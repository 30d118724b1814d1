//! Session-stored models for the storefront.

pub mod session;

pub use session::{Flash, FlashKind, PlacedOrder, SessionToken, keys as session_keys};
