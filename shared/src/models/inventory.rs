//! Monthly inventory snapshots and display rows

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MaterialCategory, MaterialRecord};
use crate::types::MonthKey;

/// Stock classification supplied by the backend per entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
        }
    }

    /// Selector value used by the status filter
    pub fn filter_value(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in-stock",
            StockStatus::LowStock => "low-stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One material's stock figures for a month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockEntry {
    pub material_id: i64,
    pub purchased_qty: Decimal,
    pub usage_qty: Decimal,
    /// Computed by the backend, never re-derived here
    pub total_qty: Decimal,
    pub stock_status: StockStatus,
    /// Some backends repeat the category on the entry; it wins over the material's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_category: Option<MaterialCategory>,
}

impl StockEntry {
    /// Whether `total_qty` agrees with `purchased_qty - usage_qty`
    pub fn is_balanced(&self) -> bool {
        self.purchased_qty - self.usage_qty == self.total_qty
    }
}

/// One month of inventory data as returned by `GET /inventory/lists`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySnapshot {
    pub month_year: MonthKey,
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
    #[serde(default)]
    pub inventory_info: Vec<StockEntry>,
}

/// A stock entry joined with its material, ready for the table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayRow {
    pub month_year: MonthKey,
    pub material_id: i64,
    pub material_code: String,
    pub material_desc: String,
    pub unit: String,
    pub material_category: MaterialCategory,
    pub purchased_qty: Decimal,
    pub usage_qty: Decimal,
    pub total_qty: Decimal,
    pub stock_status: StockStatus,
}

impl DisplayRow {
    pub fn is_low_stock(&self) -> bool {
        self.stock_status == StockStatus::LowStock
    }
}
