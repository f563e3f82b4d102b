//! Team-scoped API endpoints, split into sub-modules by domain

mod audit;
mod demand;
mod matrix;
mod price_history;
mod quotation;

use shared::error::{AppError, ErrorCode};

use crate::db::teams;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Team query error: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// Verify that the team exists.
pub async fn verify_team(state: &AppState, team_id: i64) -> Result<(), AppError> {
    teams::find_team(&state.pool, team_id)
        .await
        .map_err(|e| {
            tracing::error!("Team verification error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::TeamNotFound).with_detail("team_id", team_id))?;
    Ok(())
}

/// Clamp `limit`/`offset` query parameters
fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

// Re-export all handlers for route registration
pub use audit::audit_log;
pub use demand::upsert_demands;
pub use matrix::get_matrix;
pub use price_history::get_price_history;
pub use quotation::{
    approve_quotation, create_quotation, get_quotation, list_quotations, negotiate_quotation,
    reject_quotation,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_bounds() {
        assert_eq!(page(None, None), (50, 0));
        assert_eq!(page(Some(0), Some(-5)), (1, 0));
        assert_eq!(page(Some(1000), Some(40)), (200, 40));
    }
}
