//! Team (tenant) model

use serde::{Deserialize, Serialize};

/// Team entity. Every procurement record belongs to exactly one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}
