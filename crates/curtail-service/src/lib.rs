//! Link service orchestration.
//!
//! [`LinkService`] ties the pieces together: code generation against the
//! durable store's uniqueness gate on create, cache-aside lookup with
//! detached hit accounting on resolve. [`Links`] is the object-safe
//! surface the transport layer programs against.

pub mod error;
pub mod hits;
pub mod service;

pub use error::LinkError;
pub use hits::HitRecorder;
pub use service::{LinkService, Links};
