pub mod api;
pub mod delete;
pub mod error;
pub mod events;
pub mod filter;
pub mod library;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod store;
pub mod upload;

pub use error::{LibraryError, Result};
pub use library::Library;
