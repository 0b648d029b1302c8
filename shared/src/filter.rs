//! Search and filter predicate for the inventory table

use serde::{Deserialize, Serialize};

use crate::models::{DisplayRow, MaterialCategory, StockStatus};
use crate::validation::ValidationError;

/// Category selector value; `""` and `"all"` both mean no filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MaterialCategory),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "" | "all" => Ok(CategoryFilter::All),
            other => MaterialCategory::parse(other)
                .map(CategoryFilter::Only)
                .ok_or_else(|| ValidationError::UnknownCategory(other.to_string())),
        }
    }

    pub fn matches(&self, category: MaterialCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CategoryFilter::parse(&value)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category.as_str().to_string(),
        }
    }
}

/// Status selector value: `in-stock`, `low-stock`, or `""`/`"all"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(StockStatus),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "" | "all" => Ok(StatusFilter::All),
            "in-stock" => Ok(StatusFilter::Only(StockStatus::InStock)),
            "low-stock" => Ok(StatusFilter::Only(StockStatus::LowStock)),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }

    pub fn matches(&self, status: StockStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StatusFilter::parse(&value)
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::All => "all".to_string(),
            StatusFilter::Only(status) => status.filter_value().to_string(),
        }
    }
}

/// Conjunction of search term, category and status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub status: StatusFilter,
}

impl InventoryFilter {
    /// Case-insensitive substring match on code or description; empty term matches
    pub fn matches_search(&self, row: &DisplayRow) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        row.material_code.to_lowercase().contains(&term)
            || row.material_desc.to_lowercase().contains(&term)
    }

    pub fn matches(&self, row: &DisplayRow) -> bool {
        self.matches_search(row)
            && self.category.matches(row.material_category)
            && self.status.matches(row.stock_status)
    }

    pub fn apply<'a>(&self, rows: &'a [DisplayRow]) -> Vec<&'a DisplayRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}
