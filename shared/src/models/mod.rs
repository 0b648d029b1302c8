//! Domain models for the inventory console

mod audit;
mod inventory;
mod material;
mod user;

pub use audit::*;
pub use inventory::*;
pub use material::*;
pub use user::*;
