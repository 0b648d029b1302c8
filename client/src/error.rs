//! Error handling for the inventory console
//!
//! Every failure maps to an alert the page can show; nothing escapes the page
//! controller as a panic or an unhandled error.

use thiserror::Error;

use crate::services::alerts::AlertLevel;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Payload errors
    #[error("Inventory response carried no data")]
    NoData,

    #[error("Malformed inventory payload: {0}")]
    MalformedPayload(String),

    // Transport errors
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    // Authorization errors
    #[error("Not authorized to {action}")]
    Unauthorized { action: &'static str },

    // Local state errors
    #[error("Session store error: {0}")]
    Session(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] shared::ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Audit queue closed")]
    QueueClosed,
}

impl AppError {
    /// Message for the alert banner; `None` means the failure stays silent
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::NoData => Some("No data retrieved.".to_string()),
            AppError::MalformedPayload(_) => Some("Error retrieving inventory lists.".to_string()),
            AppError::Transport(_) | AppError::Upstream { .. } => None,
            AppError::Unauthorized { action } => {
                Some(format!("You are not authorized to {}.", action))
            }
            AppError::Session(_) | AppError::QueueClosed => None,
            AppError::Validation(e) => Some(e.to_string()),
            AppError::Configuration(msg) => Some(format!("Configuration error: {}", msg)),
        }
    }

    pub fn alert_level(&self) -> AlertLevel {
        match self {
            AppError::Validation(_) => AlertLevel::Warning,
            _ => AlertLevel::Critical,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedPayload(e.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Configuration(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Configuration(e.to_string())
    }
}

/// Result type alias for console operations
pub type AppResult<T> = Result<T, AppError>;
