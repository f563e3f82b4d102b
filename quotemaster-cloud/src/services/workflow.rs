//! Quotation workflow: submit → negotiate → approve (or reject)
//!
//! Each operation runs in one transaction. The quotation row is locked with
//! `FOR UPDATE` before its status is checked, so item updates, the status
//! transition, price history and the audit entry commit together.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ApproveRequest, ApprovedPrice, NegotiateRequest, Quotation, QuotationCreate, QuotationDetail,
    QuotationStatus, QuoteItem, RejectRequest,
};
use shared::period::PeriodKey;
use shared::util::{is_blank, now_millis};
use sqlx::{PgConnection, PgPool};

use crate::db;
use crate::db::price_history::NewPriceHistory;
use crate::error::{ServiceError, ServiceResult};
use crate::matrix::money::{MAX_PRICE, with_vat};

// ── Validation ──

fn check_price(field: &str, price: Decimal) -> Result<(), AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::invalid_price(field, price));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("{field} exceeds maximum allowed ({MAX_PRICE}), got {price}"),
        )
        .with_detail("field", field)
        .with_detail("max", MAX_PRICE.to_string()));
    }
    Ok(())
}

fn check_vat_rate(vat_rate: Decimal) -> Result<(), AppError> {
    if vat_rate < Decimal::ZERO || vat_rate > Decimal::ONE_HUNDRED {
        return Err(AppError::with_message(
            ErrorCode::InvalidVatRate,
            format!("vat_rate must be between 0 and 100, got {vat_rate}"),
        ));
    }
    Ok(())
}

/// Validate a submission payload, returning the parsed period
pub fn validate_submission(request: &QuotationCreate) -> Result<PeriodKey, AppError> {
    if is_blank(&request.region) {
        return Err(AppError::required("region"));
    }
    let period: PeriodKey = request.period.trim().parse()?;
    if request.items.is_empty() {
        return Err(AppError::new(ErrorCode::QuotationEmpty));
    }

    let mut seen = HashSet::with_capacity(request.items.len());
    for item in &request.items {
        if !seen.insert(item.product_id) {
            return Err(AppError::new(ErrorCode::DuplicateQuotationItem)
                .with_detail("product_id", item.product_id));
        }
        check_price("initial_price", item.initial_price)
            .map_err(|e| e.with_detail("product_id", item.product_id))?;
        if let Some(vat_rate) = item.vat_rate {
            check_vat_rate(vat_rate)?;
        }
    }
    Ok(period)
}

/// Check a negotiation payload on its own: non-empty, unique items,
/// positive prices
pub fn validate_negotiation_payload(request: &NegotiateRequest) -> Result<(), AppError> {
    if request.items.is_empty() {
        return Err(AppError::validation("At least one negotiated price is required"));
    }
    let mut seen = HashSet::with_capacity(request.items.len());
    for price in &request.items {
        if !seen.insert(price.item_id) {
            return Err(AppError::new(ErrorCode::DuplicateQuotationItem)
                .with_detail("item_id", price.item_id));
        }
        check_price("negotiated_price", price.negotiated_price)
            .map_err(|e| e.with_detail("item_id", price.item_id))?;
    }
    Ok(())
}

/// Validate negotiated prices against the quotation's items
pub fn validate_negotiation(items: &[QuoteItem], request: &NegotiateRequest) -> Result<(), AppError> {
    validate_negotiation_payload(request)?;
    let known: HashSet<i64> = items.iter().map(|i| i.id).collect();
    if let Some(price) = request.items.iter().find(|p| !known.contains(&p.item_id)) {
        return Err(AppError::new(ErrorCode::QuotationItemNotFound)
            .with_detail("item_id", price.item_id));
    }
    Ok(())
}

/// Check an approval payload on its own
pub fn validate_approval_payload(request: &ApproveRequest) -> Result<(), AppError> {
    if is_blank(&request.approved_by) {
        return Err(AppError::required("approved_by"));
    }
    let mut seen = HashSet::with_capacity(request.items.len());
    for o in &request.items {
        check_price("approved_price", o.approved_price)
            .map_err(|e| e.with_detail("item_id", o.item_id))?;
        if !seen.insert(o.item_id) {
            return Err(AppError::new(ErrorCode::DuplicateQuotationItem)
                .with_detail("item_id", o.item_id));
        }
    }
    Ok(())
}

pub fn validate_rejection(request: &RejectRequest) -> Result<(), AppError> {
    if is_blank(&request.reason) {
        return Err(AppError::required("reason"));
    }
    Ok(())
}

/// Final price of one item on approval
#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
    pub item_id: i64,
    pub product_id: i64,
    pub price: Decimal,
    pub vat_rate: Decimal,
    pub price_with_vat: Decimal,
}

/// Resolve the approved price of every item: override ?? negotiated ?? initial.
///
/// `product_vat` maps product id to the product VAT rate, used when the item
/// carries no override.
pub fn resolve_approvals(
    items: &[QuoteItem],
    overrides: &[ApprovedPrice],
    product_vat: &HashMap<i64, Decimal>,
) -> Result<Vec<Approval>, AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::QuotationEmpty));
    }

    let known: HashSet<i64> = items.iter().map(|i| i.id).collect();
    let mut override_by_item: HashMap<i64, Decimal> = HashMap::with_capacity(overrides.len());
    for o in overrides {
        if !known.contains(&o.item_id) {
            return Err(
                AppError::new(ErrorCode::QuotationItemNotFound).with_detail("item_id", o.item_id)
            );
        }
        check_price("approved_price", o.approved_price)
            .map_err(|e| e.with_detail("item_id", o.item_id))?;
        if override_by_item.insert(o.item_id, o.approved_price).is_some() {
            return Err(AppError::new(ErrorCode::DuplicateQuotationItem)
                .with_detail("item_id", o.item_id));
        }
    }

    items
        .iter()
        .map(|item| {
            let price = override_by_item
                .get(&item.id)
                .copied()
                .or(item.negotiated_price)
                .unwrap_or(item.initial_price);
            check_price("approved_price", price).map_err(|e| e.with_detail("item_id", item.id))?;
            let vat_rate = match item.vat_rate {
                Some(rate) => rate,
                None => *product_vat.get(&item.product_id).ok_or_else(|| {
                    AppError::new(ErrorCode::ProductNotFound)
                        .with_detail("product_id", item.product_id)
                })?,
            };
            check_vat_rate(vat_rate)?;
            let price_with_vat = with_vat(price, vat_rate).ok_or_else(|| {
                AppError::invalid_price("approved_price", price).with_detail("item_id", item.id)
            })?;
            Ok(Approval {
                item_id: item.id,
                product_id: item.product_id,
                price,
                vat_rate,
                price_with_vat,
            })
        })
        .collect()
}

fn is_unique_violation(e: &db::BoxError) -> bool {
    e.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db_err| db_err.is_unique_violation())
}

// ── Reads ──

async fn load_detail(
    conn: &mut PgConnection,
    team_id: i64,
    quotation_id: i64,
) -> ServiceResult<QuotationDetail> {
    let quotation = db::quotations::find(&mut *conn, team_id, quotation_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::QuotationNotFound))?;
    let items = db::quotations::list_items(&mut *conn, quotation_id).await?;
    Ok(QuotationDetail { quotation, items })
}

/// Quotation with its items
pub async fn get_detail(
    pool: &PgPool,
    team_id: i64,
    quotation_id: i64,
) -> ServiceResult<QuotationDetail> {
    let mut conn = pool.acquire().await?;
    load_detail(&mut conn, team_id, quotation_id).await
}

async fn lock_quotation(
    conn: &mut PgConnection,
    team_id: i64,
    quotation_id: i64,
) -> ServiceResult<Quotation> {
    db::quotations::find_for_update(conn, team_id, quotation_id)
        .await?
        .ok_or_else(|| {
            ServiceError::App(
                AppError::new(ErrorCode::QuotationNotFound).with_detail("id", quotation_id),
            )
        })
}

// ── Operations ──

/// Create a pending quotation with its items
pub async fn submit_quotation(
    pool: &PgPool,
    team_id: i64,
    request: QuotationCreate,
) -> ServiceResult<QuotationDetail> {
    let period = validate_submission(&request)?.to_string();
    let region = request.region.trim();
    let now = now_millis();

    let mut tx = pool.begin().await?;

    let supplier = db::catalog::find_supplier(&mut *tx, team_id, request.supplier_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::SupplierNotFound).with_detail("supplier_id", request.supplier_id)
        })?;
    if !supplier.is_available() {
        return Err(AppError::new(ErrorCode::SupplierInactive)
            .with_detail("supplier_id", supplier.id)
            .into());
    }

    let product_ids: Vec<i64> = request.items.iter().map(|i| i.product_id).collect();
    let products: HashMap<i64, bool> = db::catalog::find_products(&mut *tx, team_id, &product_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p.is_active))
        .collect();
    for id in &product_ids {
        match products.get(id) {
            None => {
                return Err(
                    AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", *id).into(),
                );
            }
            Some(false) => {
                return Err(
                    AppError::new(ErrorCode::ProductInactive).with_detail("product_id", *id).into(),
                );
            }
            Some(true) => {}
        }
    }

    if db::quotations::exists_for_supplier(&mut tx, team_id, supplier.id, &period, region).await? {
        return Err(quotation_exists(supplier.id, &period, region).into());
    }

    let quotation_id = match db::quotations::insert(
        &mut tx,
        team_id,
        supplier.id,
        &period,
        region,
        request.note.as_deref(),
        now,
    )
    .await
    {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return Err(quotation_exists(supplier.id, &period, region).into());
        }
        Err(e) => return Err(e.into()),
    };
    for item in &request.items {
        db::quotations::insert_item(&mut tx, quotation_id, item).await?;
    }

    let detail = json!({
        "quotation_id": quotation_id,
        "supplier_id": supplier.id,
        "period": period,
        "region": region,
        "items": request.items.len(),
    });
    db::audit::log(&mut *tx, team_id, "quotation.submitted", Some(&detail), now).await?;

    let result = load_detail(&mut tx, team_id, quotation_id).await?;
    tx.commit().await?;

    tracing::info!(
        team_id,
        quotation_id,
        supplier_id = supplier.id,
        period = %period,
        region,
        items = request.items.len(),
        "Quotation submitted"
    );
    Ok(result)
}

fn quotation_exists(supplier_id: i64, period: &str, region: &str) -> AppError {
    AppError::new(ErrorCode::QuotationExists)
        .with_detail("supplier_id", supplier_id)
        .with_detail("period", period)
        .with_detail("region", region)
}

/// Record negotiated prices and move the quotation to `negotiation`
pub async fn negotiate_quotation(
    pool: &PgPool,
    team_id: i64,
    quotation_id: i64,
    request: NegotiateRequest,
) -> ServiceResult<QuotationDetail> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let quotation = lock_quotation(&mut tx, team_id, quotation_id).await?;
    quotation.status.check_transition(QuotationStatus::Negotiation)?;

    let items = db::quotations::list_items(&mut *tx, quotation_id).await?;
    validate_negotiation(&items, &request)?;

    for price in &request.items {
        db::quotations::set_negotiated_price(&mut tx, price.item_id, price.negotiated_price)
            .await?;
    }
    db::quotations::mark_negotiation(&mut tx, quotation_id, request.note.as_deref(), now).await?;

    let detail = json!({
        "quotation_id": quotation_id,
        "from": quotation.status.as_str(),
        "items": request.items.len(),
    });
    db::audit::log(&mut *tx, team_id, "quotation.negotiated", Some(&detail), now).await?;

    let result = load_detail(&mut tx, team_id, quotation_id).await?;
    tx.commit().await?;

    tracing::info!(
        team_id,
        quotation_id,
        items = request.items.len(),
        "Quotation negotiated"
    );
    Ok(result)
}

/// Approve every item and append the approved prices to price history
pub async fn approve_quotation(
    pool: &PgPool,
    team_id: i64,
    quotation_id: i64,
    request: ApproveRequest,
) -> ServiceResult<QuotationDetail> {
    validate_approval_payload(&request)?;
    let approved_by = request.approved_by.trim();
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let quotation = lock_quotation(&mut tx, team_id, quotation_id).await?;
    quotation.status.check_transition(QuotationStatus::Approved)?;

    let items = db::quotations::list_items(&mut *tx, quotation_id).await?;
    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let product_vat: HashMap<i64, Decimal> =
        db::catalog::find_products(&mut *tx, team_id, &product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.vat_rate))
            .collect();

    let approvals = resolve_approvals(&items, &request.items, &product_vat)?;

    for approval in &approvals {
        db::quotations::set_approved_price(&mut tx, approval.item_id, approval.price).await?;
        db::price_history::insert(
            &mut tx,
            &NewPriceHistory {
                team_id,
                product_id: approval.product_id,
                supplier_id: quotation.supplier_id,
                quotation_id,
                quote_item_id: approval.item_id,
                period: &quotation.period,
                region: &quotation.region,
                price: approval.price,
                vat_rate: approval.vat_rate,
                price_with_vat: approval.price_with_vat,
                recorded_at: now,
                recorded_by: Some(approved_by),
            },
        )
        .await?;
    }
    db::quotations::mark_approved(&mut tx, quotation_id, approved_by, now).await?;

    let total_with_vat: Decimal = approvals.iter().map(|a| a.price_with_vat).sum();
    let detail = json!({
        "quotation_id": quotation_id,
        "from": quotation.status.as_str(),
        "approved_by": approved_by,
        "items": approvals.len(),
        "overrides": request.items.len(),
        "unit_total_with_vat": total_with_vat.to_string(),
    });
    db::audit::log(&mut *tx, team_id, "quotation.approved", Some(&detail), now).await?;

    let result = load_detail(&mut tx, team_id, quotation_id).await?;
    tx.commit().await?;

    tracing::info!(
        team_id,
        quotation_id,
        supplier_id = quotation.supplier_id,
        period = %quotation.period,
        items = approvals.len(),
        "Quotation approved, price history recorded"
    );
    Ok(result)
}

/// Close a pending or negotiating quotation without approval
pub async fn reject_quotation(
    pool: &PgPool,
    team_id: i64,
    quotation_id: i64,
    request: RejectRequest,
) -> ServiceResult<QuotationDetail> {
    validate_rejection(&request)?;
    let reason = request.reason.trim();
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let quotation = lock_quotation(&mut tx, team_id, quotation_id).await?;
    quotation.status.check_transition(QuotationStatus::Rejected)?;

    db::quotations::mark_rejected(&mut tx, quotation_id, reason, now).await?;

    let detail = json!({
        "quotation_id": quotation_id,
        "from": quotation.status.as_str(),
        "reason": reason,
    });
    db::audit::log(&mut *tx, team_id, "quotation.rejected", Some(&detail), now).await?;

    let result = load_detail(&mut tx, team_id, quotation_id).await?;
    tx.commit().await?;

    tracing::info!(team_id, quotation_id, "Quotation rejected");
    Ok(result)
}


#[cfg(test)]
mod pg_tests {
    use shared::models::NegotiatedPrice;

    use super::*;
    use crate::services::fixtures::{self, d};

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn approval_records_price_history_with_the_status(pool: PgPool) {
        let team_id = fixtures::team(&pool).await;
        let supplier_id = fixtures::supplier(&pool, team_id, "S1").await;
        let carrots = fixtures::product(&pool, team_id, "P1", "5", "8").await;
        let onions = fixtures::product(&pool, team_id, "P2", "2", "10").await;

        let submitted = submit_quotation(
            &pool,
            team_id,
            fixtures::quotation(supplier_id, "2024-05-01", &[(carrots, "10"), (onions, "4")]),
        )
        .await
        .unwrap();
        let carrot_item = submitted.items.iter().find(|i| i.product_id == carrots).unwrap().id;
        let onion_item = submitted.items.iter().find(|i| i.product_id == onions).unwrap().id;

        negotiate_quotation(
            &pool,
            team_id,
            submitted.quotation.id,
            NegotiateRequest {
                items: vec![NegotiatedPrice {
                    item_id: carrot_item,
                    negotiated_price: d("9.5"),
                }],
                note: None,
            },
        )
        .await
        .unwrap();

        let approved = approve_quotation(
            &pool,
            team_id,
            submitted.quotation.id,
            ApproveRequest {
                approved_by: "buyer@team".to_string(),
                items: vec![ApprovedPrice {
                    item_id: onion_item,
                    approved_price: d("3.9"),
                }],
            },
        )
        .await
        .unwrap();

        assert_eq!(approved.quotation.status, QuotationStatus::Approved);
        assert_eq!(approved.quotation.approved_by.as_deref(), Some("buyer@team"));
        assert!(approved.quotation.approved_at.is_some());
        let approved_prices: HashMap<i64, Option<Decimal>> = approved
            .items
            .iter()
            .map(|i| (i.product_id, i.approved_price))
            .collect();
        assert_eq!(approved_prices[&carrots], Some(d("9.5")));
        assert_eq!(approved_prices[&onions], Some(d("3.9")));

        let history =
            db::price_history::list_for_product(&pool, team_id, carrots, Some("north"), 10)
                .await
                .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, d("9.5"));
        assert_eq!(history[0].vat_rate, d("8"));
        assert_eq!(history[0].price_with_vat, d("10.26"));
        assert_eq!(history[0].period, "2024-05-01");
        assert_eq!(history[0].recorded_by.as_deref(), Some("buyer@team"));

        let history =
            db::price_history::list_for_product(&pool, team_id, onions, None, 10)
                .await
                .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price_with_vat, d("4.29"));

        let audit = db::audit::query(&pool, team_id, 10, 0).await.unwrap();
        assert!(audit.iter().any(|e| e.action == "quotation.approved"));
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn failed_approval_leaves_no_history(pool: PgPool) {
        let team_id = fixtures::team(&pool).await;
        let supplier_id = fixtures::supplier(&pool, team_id, "S1").await;
        let carrots = fixtures::product(&pool, team_id, "P1", "5", "8").await;

        let submitted = submit_quotation(
            &pool,
            team_id,
            fixtures::quotation(supplier_id, "2024-05-01", &[(carrots, "10")]),
        )
        .await
        .unwrap();

        let foreign = ApproveRequest {
            approved_by: "buyer@team".to_string(),
            items: vec![ApprovedPrice {
                item_id: submitted.items[0].id + 1000,
                approved_price: d("9"),
            }],
        };
        let err = AppError::from(
            approve_quotation(&pool, team_id, submitted.quotation.id, foreign)
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::QuotationItemNotFound);

        let detail = get_detail(&pool, team_id, submitted.quotation.id).await.unwrap();
        assert_eq!(detail.quotation.status, QuotationStatus::Pending);
        assert!(detail.items[0].approved_price.is_none());
        let history = db::price_history::list_for_product(&pool, team_id, carrots, None, 10)
            .await
            .unwrap();
        assert!(history.is_empty());

        let approve = ApproveRequest {
            approved_by: "buyer@team".to_string(),
            items: vec![],
        };
        approve_quotation(&pool, team_id, submitted.quotation.id, approve.clone())
            .await
            .unwrap();
        let err = AppError::from(
            approve_quotation(&pool, team_id, submitted.quotation.id, approve)
                .await
                .unwrap_err(),
        );
        assert_eq!(err.code, ErrorCode::QuotationAlreadyApproved);
        let history = db::price_history::list_for_product(&pool, team_id, carrots, None, 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }
}
