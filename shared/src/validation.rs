//! Validation utilities for inventory payloads and view inputs
//!
//! Payload checks here never reject data: the backend is the source of truth,
//! so callers use them to log inconsistencies and carry on.

use std::collections::HashSet;
use thiserror::Error;

use crate::models::{MonthlySnapshot, StockEntry};
use crate::types::MonthKey;

/// Errors raised while parsing view inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid month key: {0} (expected YYYY-MM)")]
    InvalidMonthKey(String),

    #[error("Month {0} is not in the loaded inventory")]
    UnknownMonth(String),

    #[error("Unknown material category: {0}")]
    UnknownCategory(String),

    #[error("Unknown stock status filter: {0}")]
    UnknownStatus(String),

    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },
}

// ============================================================================
// Payload Consistency Checks
// ============================================================================

/// Entries whose `total_qty` differs from `purchased_qty - usage_qty`
pub fn unbalanced_entries(snapshot: &MonthlySnapshot) -> Vec<&StockEntry> {
    snapshot
        .inventory_info
        .iter()
        .filter(|entry| !entry.is_balanced())
        .collect()
}

/// Entries with no matching material in the same snapshot
pub fn unmatched_entries(snapshot: &MonthlySnapshot) -> Vec<&StockEntry> {
    snapshot
        .inventory_info
        .iter()
        .filter(|entry| {
            !snapshot
                .materials
                .iter()
                .any(|m| m.material_id == entry.material_id)
        })
        .collect()
}

/// Month keys that appear in more than one snapshot, in first-repeat order
pub fn duplicate_months(snapshots: &[MonthlySnapshot]) -> Vec<MonthKey> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for snapshot in snapshots {
        if !seen.insert(&snapshot.month_year) && !duplicates.contains(&snapshot.month_year) {
            duplicates.push(snapshot.month_year.clone());
        }
    }
    duplicates
}

// ============================================================================
// Input Validations
// ============================================================================

/// Validate a requested page against the filtered row count
pub fn validate_page(page: u32, total_pages: u32) -> Result<(), ValidationError> {
    if page == 0 || page > total_pages {
        return Err(ValidationError::PageOutOfRange { page, total_pages });
    }
    Ok(())
}
