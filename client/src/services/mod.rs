//! Client-side services for the inventory page

pub mod alerts;
pub mod audit;
pub mod authorization;
pub mod inventory;
pub mod session;

pub use alerts::{Alert, AlertLevel, Alerts};
pub use audit::{AuditQueue, AuditSink, AuditSummary, AuditTicket};
pub use inventory::{InventoryPage, InventorySource, LoadOutcome};
pub use session::{FileStore, MemoryStore, Session, SessionStore};
