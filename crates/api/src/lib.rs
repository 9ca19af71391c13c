//! # OpenSlot API
//!
//! HTTP facade for the availability service.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Route definitions and request handlers
//! - The JSON response envelope and error mapping
//! - Server lifecycle and the binary entry point
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Exposes the REST endpoints consumed by clients

pub mod context;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

// Re-export for convenience
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
