//! Common types used across the console

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ValidationError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month key in `YYYY-MM` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Self::first_day(value)?;
        Ok(Self(value.to_string()))
    }

    fn first_day(value: &str) -> Result<NaiveDate, ValidationError> {
        if value.len() != 7 {
            return Err(ValidationError::InvalidMonthKey(value.to_string()));
        }
        NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidMonthKey(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Selector label, e.g. `March 2024`
    pub fn display(&self) -> String {
        match Self::first_day(&self.0) {
            Ok(date) => format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year()),
            Err(_) => self.0.clone(),
        }
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MonthKey::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entry of the month selector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthOption {
    pub display: String,
    pub value: MonthKey,
}

impl From<&MonthKey> for MonthOption {
    fn from(key: &MonthKey) -> Self {
        Self {
            display: key.display(),
            value: key.clone(),
        }
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

/// Rows per page of the inventory table
pub const DEFAULT_PAGE_SIZE: u32 = 8;

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Number of pages needed for `total_items`; zero when there is nothing to show
    pub fn total_pages(&self, total_items: usize) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        total_items.div_ceil(self.per_page as usize) as u32
    }

    /// Whether `page` addresses an existing page of `total_items`
    pub fn contains_page(&self, page: u32, total_items: usize) -> bool {
        page >= 1 && page <= self.total_pages(total_items)
    }

    /// Rows of the current page; empty when the page is out of range
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if !self.contains_page(self.page, items.len()) {
            return &[];
        }
        let start = (self.page as usize - 1) * self.per_page as usize;
        let end = (start + self.per_page as usize).min(items.len());
        &items[start..end]
    }

    pub fn meta(&self, total_items: usize) -> PaginationMeta {
        PaginationMeta {
            page: self.page,
            per_page: self.per_page,
            total_items: total_items as u64,
            total_pages: self.total_pages(total_items),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}
