//! DocuVault - Document Library Client
//!
//! Core library providing the client-side document collection: payload
//! normalization, search and filtering, pagination, and the delete and
//! upload workflows against the documents backend.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
