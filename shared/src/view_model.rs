//! Inventory view-model builder
//!
//! Turns the per-month payloads of `GET /inventory/lists` into month buckets
//! of [`DisplayRow`]s plus the month selector options.
//!
//! Joining is lenient: an entry whose material is missing from its snapshot
//! still produces a row, with empty code/description/unit. A category on the
//! entry itself takes precedence over the material's; with neither, the row
//! falls under `other`. Month order is the backend's order; nothing is re-sorted.

use serde::{Deserialize, Serialize};

use crate::models::{DisplayRow, MaterialCategory, MaterialRecord, MonthlySnapshot, StockEntry};
use crate::types::{MonthKey, MonthOption};

/// Join a stock entry with the first material carrying the same id
pub fn join_material(entry: &StockEntry, materials: &[MaterialRecord], month: &MonthKey) -> DisplayRow {
    let material = materials.iter().find(|m| m.material_id == entry.material_id);

    DisplayRow {
        month_year: month.clone(),
        material_id: entry.material_id,
        material_code: material.map(|m| m.material_code.clone()).unwrap_or_default(),
        material_desc: material.map(|m| m.material_desc.clone()).unwrap_or_default(),
        unit: material.map(|m| m.unit.clone()).unwrap_or_default(),
        material_category: entry
            .material_category
            .or_else(|| material.map(|m| m.material_category))
            .unwrap_or(MaterialCategory::Other),
        purchased_qty: entry.purchased_qty,
        usage_qty: entry.usage_qty,
        total_qty: entry.total_qty,
        stock_status: entry.stock_status,
    }
}

/// All rows of one snapshot, in `inventory_info` order
pub fn build_month_rows(snapshot: &MonthlySnapshot) -> Vec<DisplayRow> {
    snapshot
        .inventory_info
        .iter()
        .map(|entry| join_material(entry, &snapshot.materials, &snapshot.month_year))
        .collect()
}

/// Distinct month keys as selector options, first occurrence wins
pub fn month_options(snapshots: &[MonthlySnapshot]) -> Vec<MonthOption> {
    let mut options: Vec<MonthOption> = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        if !options.iter().any(|o| o.value == snapshot.month_year) {
            options.push(MonthOption::from(&snapshot.month_year));
        }
    }
    options
}

/// Rows of one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthBucket {
    pub month: MonthKey,
    pub rows: Vec<DisplayRow>,
}

/// Month-bucketed rows built once per fetch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryViewModel {
    months: Vec<MonthOption>,
    buckets: Vec<MonthBucket>,
}

impl InventoryViewModel {
    pub fn build(snapshots: &[MonthlySnapshot]) -> Self {
        let buckets = snapshots
            .iter()
            .map(|snapshot| MonthBucket {
                month: snapshot.month_year.clone(),
                rows: build_month_rows(snapshot),
            })
            .collect();

        Self {
            months: month_options(snapshots),
            buckets,
        }
    }

    pub fn month_options(&self) -> &[MonthOption] {
        &self.months
    }

    /// Month shown when the user has not picked one
    pub fn default_month(&self) -> Option<&MonthKey> {
        self.months.first().map(|o| &o.value)
    }

    pub fn month_index(&self, month: &MonthKey) -> Option<usize> {
        self.months.iter().position(|o| &o.value == month)
    }

    pub fn month_at(&self, index: usize) -> Option<&MonthOption> {
        self.months.get(index)
    }

    /// Rows of `month`; the first bucket wins if the backend repeated a month
    pub fn rows_for(&self, month: &MonthKey) -> &[DisplayRow] {
        self.buckets
            .iter()
            .find(|b| &b.month == month)
            .map(|b| b.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Every row across all buckets
    pub fn all_rows(&self) -> impl Iterator<Item = &DisplayRow> {
        self.buckets.iter().flat_map(|b| b.rows.iter())
    }

    pub fn low_stock_rows(&self) -> impl Iterator<Item = &DisplayRow> {
        self.all_rows().filter(|row| row.is_low_stock())
    }

    /// True when the fetch returned no months at all
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
