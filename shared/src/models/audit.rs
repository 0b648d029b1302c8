//! Audit log models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::DisplayRow;

/// Body of `POST /auditlogs/logsaudit`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AuditLogEntry {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    pub action: AuditAction,
    #[validate(length(min = 1))]
    pub act: String,
    pub material_code: String,
    pub material_desc: String,
}

/// Audit action categories understood by the audit log endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Stock,
}

impl AuditLogEntry {
    /// Audit record for a material that came back from an import as low stock
    pub fn low_stock(user_id: Option<i64>, row: &DisplayRow) -> Self {
        Self {
            user_id,
            action: AuditAction::Stock,
            act: "low stock".to_string(),
            material_code: row.material_code.clone(),
            material_desc: row.material_desc.clone(),
        }
    }
}
