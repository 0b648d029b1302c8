//! Plain-text rendering of the inventory page for the terminal

use shared::{number_with_commas, DisplayRow};
use std::fmt::Write;

use crate::services::alerts::AlertLevel;
use crate::services::InventoryPage;

pub const COLUMN_NAMES: [&str; 7] = [
    "Item Code",
    "Description",
    "Unit",
    "Purchased Qty",
    "Usage Qty",
    "Total Qty",
    "Status",
];

/// Columns 3..=5 hold quantities and are right-aligned
const NUMERIC_COLUMNS: std::ops::RangeInclusive<usize> = 3..=5;

fn cells(row: &DisplayRow) -> [String; 7] {
    [
        row.material_code.clone(),
        row.material_desc.clone(),
        row.unit.clone(),
        number_with_commas(row.purchased_qty),
        number_with_commas(row.usage_qty),
        number_with_commas(row.total_qty),
        row.stock_status.to_string(),
    ]
}

fn level_tag(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Information => "info",
        AlertLevel::Success => "success",
        AlertLevel::Warning => "warning",
        AlertLevel::Critical => "critical",
    }
}

pub fn render_page(page: &InventoryPage) -> String {
    let mut out = String::new();

    for (index, alert) in page.alerts().iter().enumerate() {
        let _ = writeln!(out, "[{}] #{} {}", level_tag(alert.level), index, alert.message);
    }

    let index = page.current_month_index();
    let month_count = page.month_options().len();
    let prev = if matches!(index, Some(i) if i > 0) { "<" } else { " " };
    let next = if matches!(index, Some(i) if i + 1 < month_count) { ">" } else { " " };
    let _ = writeln!(out, "Inventory  {} {} {}", prev, page.selected_month_display(), next);

    if page.is_loading() {
        out.push_str("Loading...\n");
        return out;
    }

    let rows: Vec<[String; 7]> = page.page_rows().into_iter().map(cells).collect();
    if rows.is_empty() {
        out.push_str("No inventory lists found.\n");
        return out;
    }

    let mut widths = COLUMN_NAMES.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<&str> = COLUMN_NAMES.to_vec();
    write_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, &rule, &widths);
    for row in &rows {
        write_line(&mut out, row, &widths);
    }

    let _ = writeln!(
        out,
        "Page {} of {} ({} items)",
        page.query().page(),
        page.total_pages(),
        page.filtered_rows().len()
    );
    out
}

fn write_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            if NUMERIC_COLUMNS.contains(&i) {
                format!("{:>width$}", cell.as_ref(), width = widths[i])
            } else {
                format!("{:<width$}", cell.as_ref(), width = widths[i])
            }
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}
