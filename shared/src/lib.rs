//! Shared types and pure logic for the inventory console
//!
//! This crate contains the models and the view-model pipeline shared between
//! the console client and the browser build (via WASM).

pub mod filter;
pub mod format;
pub mod models;
pub mod query;
pub mod types;
pub mod validation;
pub mod view_model;

pub use filter::*;
pub use format::*;
pub use models::*;
pub use query::*;
pub use types::*;
pub use validation::*;
pub use view_model::*;
