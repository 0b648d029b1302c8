//! Dismissible alert banners shown above the inventory table

use serde::Serialize;

/// Banner severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Information,
    Success,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// Ordered stack of banners; each can be dismissed independently
#[derive(Debug, Clone, Default, Serialize)]
pub struct Alerts {
    items: Vec<Alert>,
}

impl Alerts {
    pub fn push(&mut self, level: AlertLevel, message: impl Into<String>) {
        self.items.push(Alert {
            level,
            message: message.into(),
        });
    }

    /// Remove the banner at `index`; out-of-range indexes are ignored
    pub fn dismiss(&mut self, index: usize) -> Option<Alert> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|a| a.message.as_str()).collect()
    }
}
