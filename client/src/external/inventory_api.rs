//! REST client for the inventory backend
//!
//! Covers the two endpoints the inventory page talks to:
//! `GET /inventory/lists` and `POST /auditlogs/logsaudit`.

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use shared::{AuditLogEntry, MonthlySnapshot};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::services::audit::AuditSink;

/// Inventory API client
#[derive(Clone)]
pub struct InventoryApiClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl InventoryApiClient {
    /// Create a new client from configuration
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn ensure_success(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Upstream { status, body })
    }

    /// Fetch every monthly snapshot in backend order
    pub async fn fetch_inventory_lists(&self) -> AppResult<Vec<MonthlySnapshot>> {
        let url = format!("{}/inventory/lists", self.base_url);
        tracing::debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;

        parse_inventory_lists(&body)
    }

    /// Append one audit record; the response body is ignored
    pub async fn append_audit_log(&self, entry: &AuditLogEntry) -> AppResult<()> {
        let url = format!("{}/auditlogs/logsaudit", self.base_url);
        tracing::debug!("POST {} ({})", url, entry.material_code);

        let response = self.authorize(self.client.post(&url)).json(entry).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

impl AuditSink for InventoryApiClient {
    async fn append(&self, entry: &AuditLogEntry) -> AppResult<()> {
        self.append_audit_log(entry).await
    }
}

/// Classify and decode a `GET /inventory/lists` body
///
/// A body that is not JSON, or whose `data` field is absent or empty-valued,
/// yields [`AppError::NoData`]; a present `data` that is not an array, or an
/// array whose elements do not decode, yields [`AppError::MalformedPayload`].
pub fn parse_inventory_lists(body: &str) -> AppResult<Vec<MonthlySnapshot>> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return Err(AppError::NoData),
    };

    match value.get("data") {
        None => Err(AppError::NoData),
        Some(data) if is_empty_value(data) => Err(AppError::NoData),
        Some(data @ Value::Array(_)) => Ok(serde_json::from_value(data.clone())?),
        Some(other) => Err(AppError::MalformedPayload(format!(
            "expected data to be an array, got {}",
            kind_of(other)
        ))),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let body = r#"{"data":[{"month_year":"2024-03","materials":[],"inventory_info":[]}]}"#;
        let snapshots = parse_inventory_lists(body).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].month_year.as_str(), "2024-03");
    }

    #[test]
    fn test_incomplete_material_still_parses() {
        let body = r#"{"data":[{"month_year":"2024-03","materials":[
            {"material_id":1,"material_code":"M-01","material_desc":null,"unit":"kg"},
            {"material_id":2,"material_desc":"Carton"}
        ],"inventory_info":[]}]}"#;
        let snapshots = parse_inventory_lists(body).unwrap();
        let materials = &snapshots[0].materials;
        assert_eq!(materials[0].material_desc, "");
        assert_eq!(materials[1].material_code, "");
        assert_eq!(materials[1].unit, "");
    }

    #[test]
    fn test_empty_array_is_data() {
        let snapshots = parse_inventory_lists(r#"{"data":[]}"#).unwrap();
        assert!(snapshots.is_empty());
    }

    #[test]
    fn test_missing_data_is_no_data() {
        assert!(matches!(parse_inventory_lists("{}"), Err(AppError::NoData)));
        assert!(matches!(
            parse_inventory_lists(r#"{"data":null}"#),
            Err(AppError::NoData)
        ));
        assert!(matches!(
            parse_inventory_lists("<html>gateway</html>"),
            Err(AppError::NoData)
        ));
    }

    #[test]
    fn test_non_array_is_malformed() {
        assert!(matches!(
            parse_inventory_lists(r#"{"data":{"month_year":"2024-03"}}"#),
            Err(AppError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_inventory_lists(r#"{"data":"oops"}"#),
            Err(AppError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_bad_elements_are_malformed() {
        let body = r#"{"data":[{"month_year":"March","materials":[],"inventory_info":[]}]}"#;
        assert!(matches!(
            parse_inventory_lists(body),
            Err(AppError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = InventoryApiClient::with_base_url("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }
}
