//! Team and kitchen lookups

use shared::models::Team;
use sqlx::{PgExecutor, PgPool};

use super::BoxError;

pub async fn find_team(pool: &PgPool, team_id: i64) -> Result<Option<Team>, BoxError> {
    let team: Option<Team> =
        sqlx::query_as("SELECT id, name, created_at FROM teams WHERE id = $1")
            .bind(team_id)
            .fetch_optional(pool)
            .await?;
    Ok(team)
}

/// Subset of `kitchen_ids` that belong to the team
pub async fn existing_kitchen_ids<'e>(
    db: impl PgExecutor<'e>,
    team_id: i64,
    kitchen_ids: &[i64],
) -> Result<Vec<i64>, BoxError> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT id FROM kitchens WHERE team_id = $1 AND id = ANY($2)")
            .bind(team_id)
            .bind(kitchen_ids)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}
