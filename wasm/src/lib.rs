//! WebAssembly module for the inventory console
//!
//! Lets the browser page run the same view-model pipeline as the terminal
//! client: join, month options, filter and pagination all happen here, and
//! JavaScript only fetches the payload and draws the result.

use rust_decimal::Decimal;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{number_with_commas, render_page, InventoryQuery, InventoryViewModel};

/// Either the raw `{ "data": [...] }` response or the bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Wrapped { data: Vec<MonthlySnapshot> },
    Bare(Vec<MonthlySnapshot>),
}

impl Payload {
    fn into_snapshots(self) -> Vec<MonthlySnapshot> {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(data) => data,
        }
    }
}

fn parse_payload(payload_json: &str) -> Result<Vec<MonthlySnapshot>, String> {
    serde_json::from_str::<Payload>(payload_json)
        .map(Payload::into_snapshots)
        .map_err(|e| format!("Invalid inventory payload: {}", e))
}

fn page_json(payload_json: &str, query_json: &str, per_page: u32) -> Result<String, String> {
    let snapshots = parse_payload(payload_json)?;
    let query: InventoryQuery = if query_json.trim().is_empty() {
        InventoryQuery::default()
    } else {
        serde_json::from_str(query_json).map_err(|e| format!("Invalid query JSON: {}", e))?
    };

    let view = InventoryViewModel::build(&snapshots);
    let page = render_page(&view, &query, per_page);
    serde_json::to_string(&page).map_err(|e| e.to_string())
}

fn options_json(payload_json: &str) -> Result<String, String> {
    let snapshots = parse_payload(payload_json)?;
    let view = InventoryViewModel::build(&snapshots);
    serde_json::to_string(view.month_options()).map_err(|e| e.to_string())
}

fn js_error(message: String) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

/// Build one rendered page of the inventory table
///
/// `query_json` carries `month`, `search`, `category`, `status` and `page`;
/// every field is optional. Returns the page view as JSON.
#[wasm_bindgen]
pub fn build_inventory_page(payload_json: &str, query_json: &str) -> Result<String, JsValue> {
    page_json(payload_json, query_json, DEFAULT_PAGE_SIZE).map_err(js_error)
}

/// Month selector options, in backend order, as JSON
#[wasm_bindgen]
pub fn inventory_month_options(payload_json: &str) -> Result<String, JsValue> {
    options_json(payload_json).map_err(js_error)
}

/// Format a quantity with thousands separators
#[wasm_bindgen]
pub fn format_quantity(value: f64) -> String {
    let decimal = Decimal::try_from(value).unwrap_or(Decimal::ZERO);
    number_with_commas(decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const PAYLOAD: &str = r#"{"data":[
        {"month_year":"2024-03","materials":[
            {"material_id":1,"material_code":"M-01","material_desc":"Beef Trim","unit":"kg","material_category":"meat_material"},
            {"material_id":2,"material_code":"P-10","material_desc":"Carton Box","unit":"pc","material_category":"packaging"}
        ],"inventory_info":[
            {"material_id":1,"purchased_qty":1500,"usage_qty":1450,"total_qty":50,"stock_status":"Low Stock"},
            {"material_id":2,"purchased_qty":2000,"usage_qty":500,"total_qty":1500,"stock_status":"In Stock"}
        ]},
        {"month_year":"2024-04","materials":[],"inventory_info":[]}
    ]}"#;

    #[test]
    fn test_page_defaults_to_first_month() {
        let page: Value = serde_json::from_str(&page_json(PAYLOAD, "", 8).unwrap()).unwrap();
        assert_eq!(page["month"]["display"], "March 2024");
        assert_eq!(page["rows"].as_array().unwrap().len(), 2);
        assert_eq!(page["has_next_month"], true);
    }

    #[test]
    fn test_page_applies_query() {
        let query = r#"{"search":"box","status":"in-stock"}"#;
        let page: Value = serde_json::from_str(&page_json(PAYLOAD, query, 8).unwrap()).unwrap();
        let rows = page["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["material_code"], "P-10");
    }

    #[test]
    fn test_bare_array_payload() {
        let bare = r#"[{"month_year":"2024-05","materials":[],"inventory_info":[]}]"#;
        let options: Value = serde_json::from_str(&options_json(bare).unwrap()).unwrap();
        assert_eq!(options[0]["display"], "May 2024");
        assert_eq!(options[0]["value"], "2024-05");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1234567.0), "1,234,567");
        assert_eq!(format_quantity(1500.5), "1,500.5");
    }
}
