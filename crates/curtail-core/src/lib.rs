//! Core types and traits for the Curtail URL shortener.
//!
//! This crate provides the shared domain types (short codes, link records,
//! owner identifiers), the error taxonomy, and the two storage-side traits
//! ([`LinkStore`] and [`ResolutionCache`]) implemented by the storage and
//! cache crates.

pub mod cache;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod store;

pub use cache::{ResolutionCache, RESOLUTION_TTL};
pub use error::{CacheError, CoreError, StoreError};
pub use record::{LinkRecord, OwnerId};
pub use shortcode::ShortCode;
pub use store::LinkStore;
