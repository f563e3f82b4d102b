//! Supplier Model

use serde::{Deserialize, Serialize};

/// Supplier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub team_id: i64,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    /// Soft-delete timestamp (Unix millis)
    pub deleted_at: Option<i64>,
    pub created_at: i64,
}

impl Supplier {
    /// Active and not soft-deleted
    pub fn is_available(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}
