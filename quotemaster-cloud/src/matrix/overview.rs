//! Overview KPIs

use rust_decimal::Decimal;
use shared::models::{MatrixOverview, ProductRow};

use super::money::{coverage, delta, round2, with_vat};

/// Aggregate the populated rows into overview KPIs.
///
/// A product counts as quoted when any supplier quoted it, even if no cell
/// is eligible for best price. Only rows with a best price contribute to
/// the totals. The previous
/// comparison is restricted to rows that carry both a best and a previous
/// price, so a product missing last period does not skew the delta.
pub(super) fn summarize(rows: &[ProductRow], supplier_count: u32) -> MatrixOverview {
    let product_count = rows.len() as u32;
    let mut quoted_products = 0u32;

    let mut current_total = Decimal::ZERO;
    let mut initial_total = Decimal::ZERO;
    let mut base_total = Decimal::ZERO;

    let mut compared_rows = 0u32;
    let mut compared_current = Decimal::ZERO;
    let mut previous_total = Decimal::ZERO;

    for row in rows {
        if row.quoted_count > 0 {
            quoted_products += 1;
        }
        let Some(best_price) = row.best_price else {
            continue;
        };

        current_total += best_price * row.quantity;
        base_total += best_price * row.base_quantity;

        let initial_price = row
            .best_supplier_id
            .and_then(|id| row.cells.get(&id))
            .and_then(|cell| with_vat(cell.initial_price, cell.vat_rate))
            .unwrap_or(best_price);
        initial_total += initial_price * row.quantity;

        if let Some(previous_price) = row.previous_price {
            compared_rows += 1;
            compared_current += best_price * row.quantity;
            previous_total += previous_price * row.quantity;
        }
    }

    let (previous_total, vs_previous) = if compared_rows > 0 {
        (
            Some(round2(previous_total)),
            Some(delta(compared_current, previous_total)),
        )
    } else {
        (None, None)
    };

    MatrixOverview {
        product_count,
        supplier_count,
        quoted_products,
        uncovered_products: product_count - quoted_products,
        coverage_percent: coverage(quoted_products, product_count),
        current_total: round2(current_total),
        initial_total: round2(initial_total),
        base_total: round2(base_total),
        previous_total,
        vs_initial: delta(current_total, initial_total),
        vs_base: delta(current_total, base_total),
        vs_previous,
    }
}
