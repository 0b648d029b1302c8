//! Role gating for restricted inventory actions

use shared::{CurrentUser, SystemRole};

use crate::error::{AppError, AppResult};

/// Inventory actions that need a system role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictedAction {
    ImportInventory,
    ArchiveInventory,
}

impl RestrictedAction {
    pub fn required_role(&self) -> SystemRole {
        match self {
            RestrictedAction::ImportInventory => SystemRole::ImportInventory,
            RestrictedAction::ArchiveInventory => SystemRole::ArchiveInventory,
        }
    }

    /// Phrase used in the denial banner
    pub fn description(&self) -> &'static str {
        match self {
            RestrictedAction::ImportInventory => "import inventory files",
            RestrictedAction::ArchiveInventory => "delete/archive files",
        }
    }
}

/// Check the user's role codes; a signed-out user is always denied
pub fn authorize(user: Option<&CurrentUser>, action: RestrictedAction) -> AppResult<()> {
    match user {
        Some(user) if user.has_role(action.required_role()) => Ok(()),
        _ => Err(AppError::Unauthorized {
            action: action.description(),
        }),
    }
}
