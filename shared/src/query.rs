//! Table query state and page rendering
//!
//! [`InventoryQuery`] is the user's current selection: month, search term,
//! category and status filters, and page number. Every setter that changes
//! what is shown sends the page back to 1, so a page number from a larger
//! result set can never point past the end of a smaller one.

use serde::{Deserialize, Serialize};

use crate::filter::{CategoryFilter, InventoryFilter, StatusFilter};
use crate::models::DisplayRow;
use crate::types::{MonthKey, MonthOption, Pagination, PaginationMeta};
use crate::validation::{validate_page, ValidationError};
use crate::view_model::InventoryViewModel;

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuery {
    #[serde(default)]
    month: Option<MonthKey>,
    #[serde(flatten)]
    filter: InventoryFilter,
    #[serde(default = "first_page")]
    page: u32,
}

impl Default for InventoryQuery {
    fn default() -> Self {
        Self {
            month: None,
            filter: InventoryFilter::default(),
            page: first_page(),
        }
    }
}

impl InventoryQuery {
    pub fn month(&self) -> Option<&MonthKey> {
        self.month.as_ref()
    }

    pub fn filter(&self) -> &InventoryFilter {
        &self.filter
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
        self.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filter.status = status;
        self.page = 1;
    }

    pub fn set_month(&mut self, month: Option<MonthKey>) {
        self.month = month;
        self.page = 1;
    }

    /// Move to `page`, which must exist for `total_pages`
    pub fn set_page(&mut self, page: u32, total_pages: u32) -> Result<(), ValidationError> {
        validate_page(page, total_pages)?;
        self.page = page;
        Ok(())
    }

    /// The month being shown: the selection, else the first loaded month
    pub fn resolve_month<'a>(&'a self, view: &'a InventoryViewModel) -> Option<&'a MonthKey> {
        self.month.as_ref().or_else(|| view.default_month())
    }

    /// Rows of the shown month that pass the filter
    pub fn filtered_rows<'a>(&self, view: &'a InventoryViewModel) -> Vec<&'a DisplayRow> {
        match self.resolve_month(view) {
            Some(month) => self.filter.apply(view.rows_for(month)),
            None => Vec::new(),
        }
    }
}

/// Everything the table, month header and pager need for one render
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryPageView {
    pub month: Option<MonthOption>,
    pub months: Vec<MonthOption>,
    pub has_previous_month: bool,
    pub has_next_month: bool,
    pub rows: Vec<DisplayRow>,
    pub pagination: PaginationMeta,
}

impl InventoryPageView {
    /// True for the "No inventory lists found." state
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn render_page(view: &InventoryViewModel, query: &InventoryQuery, per_page: u32) -> InventoryPageView {
    let filtered = query.filtered_rows(view);
    let pagination = Pagination::new(query.page(), per_page);
    let rows = pagination.slice(&filtered).iter().map(|r| (*r).clone()).collect();

    let month = query.resolve_month(view);
    let index = month.and_then(|m| view.month_index(m));

    InventoryPageView {
        month: month.map(MonthOption::from),
        months: view.month_options().to_vec(),
        has_previous_month: matches!(index, Some(i) if i > 0),
        has_next_month: matches!(index, Some(i) if i + 1 < view.month_options().len()),
        rows,
        pagination: pagination.meta(filtered.len()),
    }
}
