//! Inventory Console - client library
//!
//! The inventory list page of the administration console: fetches monthly
//! inventory snapshots from the REST backend, shapes them into a filtered,
//! paginated table, and records low-stock audits after an import.

pub mod config;
pub mod error;
pub mod external;
pub mod render;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
