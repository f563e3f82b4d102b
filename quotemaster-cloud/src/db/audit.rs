//! Audit log operations

use sqlx::{PgExecutor, PgPool};

use super::BoxError;

/// Write an audit log entry
pub async fn log<'e>(
    db: impl PgExecutor<'e>,
    team_id: i64,
    action: &str,
    detail: Option<&serde_json::Value>,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        "INSERT INTO audit_logs (team_id, action, detail, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(team_id)
    .bind(action)
    .bind(detail)
    .bind(now)
    .execute(db)
    .await?;
    Ok(())
}

/// Query audit log entries for a team (paginated)
#[derive(sqlx::FromRow, serde::Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub detail: Option<serde_json::Value>,
    pub created_at: i64,
}

pub async fn query(
    pool: &PgPool,
    team_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditEntry>, BoxError> {
    let rows: Vec<AuditEntry> = sqlx::query_as(
        "SELECT id, action, detail, created_at FROM audit_logs WHERE team_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    )
    .bind(team_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
