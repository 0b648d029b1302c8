//! Signed-in user record and role codes

use serde::{Deserialize, Serialize};

/// The `currentUser` record kept in the session store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CurrentUser {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub roles: Vec<i64>,
}

/// System role codes that gate restricted inventory actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRole {
    ImportInventory,
    ArchiveInventory,
}

impl SystemRole {
    pub fn code(&self) -> i64 {
        match self {
            SystemRole::ImportInventory => 6,
            SystemRole::ArchiveInventory => 8,
        }
    }
}

impl CurrentUser {
    pub fn has_role(&self, role: SystemRole) -> bool {
        self.roles.contains(&role.code())
    }
}
