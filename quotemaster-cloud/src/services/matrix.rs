//! Matrix loading: gathers engine inputs from the database and runs the
//! pure builder.

use std::collections::HashMap;

use shared::error::AppError;
use shared::models::{ComparisonMatrix, MatrixQuery};
use shared::period::{PeriodKey, resolve_previous};
use shared::util::{is_blank, now_millis};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::matrix::{self, MatrixInput, PreviousPrices};

/// Validated matrix request
#[derive(Debug, Clone)]
pub struct MatrixRequest {
    pub period: PeriodKey,
    pub region: String,
    pub category: String,
}

impl TryFrom<MatrixQuery> for MatrixRequest {
    type Error = AppError;

    fn try_from(query: MatrixQuery) -> Result<Self, Self::Error> {
        if is_blank(&query.region) {
            return Err(AppError::required("region"));
        }
        if is_blank(&query.category) {
            return Err(AppError::required("category"));
        }
        let period: PeriodKey = query.period.trim().parse()?;
        Ok(Self {
            period,
            region: query.region.trim().to_string(),
            category: query.category.trim().to_string(),
        })
    }
}

/// Build the comparison matrix for a team
pub async fn build_matrix(
    pool: &PgPool,
    team_id: i64,
    request: MatrixRequest,
    lookback_months: u32,
) -> ServiceResult<ComparisonMatrix> {
    let period = request.period.to_string();
    let region = request.region.as_str();
    let category = request.category.as_str();

    let (products, suppliers, demands, lines, previous) = tokio::try_join!(
        db::catalog::list_active_products(pool, team_id, category),
        db::matrix::list_supplier_quotes(pool, team_id, &period, region),
        db::demand::list_for_category(pool, team_id, &period, region, category),
        db::matrix::list_quote_lines(pool, team_id, &period, region, category),
        load_previous(pool, team_id, &request, lookback_months),
    )?;

    tracing::debug!(
        team_id,
        period = %period,
        region,
        category,
        products = products.len(),
        suppliers = suppliers.len(),
        lines = lines.len(),
        previous = ?previous.as_ref().map(|p| p.period.to_string()),
        "Building comparison matrix"
    );

    Ok(matrix::build(MatrixInput {
        period: request.period,
        region: request.region,
        category: request.category,
        products,
        suppliers,
        demands,
        lines,
        previous,
        generated_at: now_millis(),
    }))
}

/// Resolve the previous period and load its lowest approved prices
async fn load_previous(
    pool: &PgPool,
    team_id: i64,
    request: &MatrixRequest,
    lookback_months: u32,
) -> Result<Option<PreviousPrices>, db::BoxError> {
    let floor = request.period.lookback_floor(lookback_months);
    let current = request.period.to_string();

    let periods = db::price_history::periods_with_history(
        pool,
        team_id,
        &request.region,
        &request.category,
        &floor,
        &current,
    )
    .await?;

    let candidates: Vec<PeriodKey> = periods
        .iter()
        .filter_map(|raw| match raw.parse() {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(period = %raw, error = %e, "Skipping malformed period in price history");
                None
            }
        })
        .collect();

    let Some(previous) = resolve_previous(&request.period, &candidates, lookback_months) else {
        return Ok(None);
    };

    let prices = db::price_history::lowest_prices(
        pool,
        team_id,
        &request.region,
        &request.category,
        &previous.to_string(),
    )
    .await?;

    Ok(Some(PreviousPrices {
        period: previous,
        prices: prices.into_iter().collect::<HashMap<_, _>>(),
    }))
}
