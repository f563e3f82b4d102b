//! Two-phase matrix construction

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use shared::models::{
    ComparisonMatrix, KitchenQuantity, MatrixCell, ProductRow, SupplierColumn,
};

use super::money::{change_percent, coverage, round2, with_vat};
use super::{MatrixInput, overview};

/// Build the comparison matrix.
///
/// Every product gets a row even when nobody quoted it. Only active,
/// non-deleted suppliers get a column. Quote lines whose product or supplier
/// is not part of the matrix are skipped.
pub fn build(input: MatrixInput) -> ComparisonMatrix {
    let MatrixInput {
        period,
        region,
        category,
        products,
        suppliers,
        demands,
        lines,
        previous,
        generated_at,
    } = input;

    // ── Phase 1: rows and columns ──

    let mut demand_by_product: HashMap<i64, Vec<KitchenQuantity>> = HashMap::new();
    for demand in demands {
        demand_by_product
            .entry(demand.product_id)
            .or_default()
            .push(KitchenQuantity {
                kitchen_id: demand.kitchen_id,
                kitchen_name: demand.kitchen_name,
                quantity: demand.quantity,
            });
    }

    let mut row_index: HashMap<i64, usize> = HashMap::with_capacity(products.len());
    let mut row_vat: Vec<Decimal> = Vec::with_capacity(products.len());
    let mut rows: Vec<ProductRow> = Vec::with_capacity(products.len());
    for product in products {
        if row_index.contains_key(&product.id) {
            continue;
        }
        let demand_by_kitchen = demand_by_product.remove(&product.id).unwrap_or_default();
        let demand_quantity = (!demand_by_kitchen.is_empty())
            .then(|| demand_by_kitchen.iter().map(|k| k.quantity).sum::<Decimal>());

        row_index.insert(product.id, rows.len());
        row_vat.push(product.vat_rate);
        rows.push(ProductRow {
            product_id: product.id,
            code: product.code,
            name: product.name,
            unit: product.unit,
            base_quantity: product.base_quantity,
            quantity: demand_quantity.unwrap_or(product.base_quantity),
            demand_quantity,
            demand_by_kitchen,
            previous_price: None,
            cells: BTreeMap::new(),
            best_supplier_id: None,
            best_price: None,
            quoted_count: 0,
            min_price: None,
            max_price: None,
            avg_price: None,
            spread_percent: None,
        });
    }

    let total_products = rows.len() as u32;
    let mut column_index: HashMap<i64, usize> = HashMap::with_capacity(suppliers.len());
    let mut columns: Vec<SupplierColumn> = Vec::with_capacity(suppliers.len());
    for supplier in suppliers {
        if !supplier.is_available() {
            tracing::debug!(
                supplier_id = supplier.supplier_id,
                "Inactive or deleted supplier left out of the matrix"
            );
            continue;
        }
        if column_index.contains_key(&supplier.supplier_id) {
            tracing::warn!(
                supplier_id = supplier.supplier_id,
                quotation_id = supplier.quotation_id,
                "Supplier has more than one quotation in the matrix, keeping the first"
            );
            continue;
        }
        column_index.insert(supplier.supplier_id, columns.len());
        columns.push(SupplierColumn {
            supplier_id: supplier.supplier_id,
            code: supplier.code,
            name: supplier.name,
            quotation_id: supplier.quotation_id,
            status: supplier.status,
            quoted: 0,
            total_products,
            coverage_percent: Decimal::ZERO,
            best_count: 0,
            quoted_total: Decimal::ZERO,
        });
    }

    // ── Phase 2: populate cells ──

    let mut skipped = 0usize;
    for line in lines {
        let (Some(&r), Some(&c)) = (
            row_index.get(&line.product_id),
            column_index.get(&line.supplier_id),
        ) else {
            skipped += 1;
            continue;
        };
        if columns[c].quotation_id != line.quotation_id {
            skipped += 1;
            continue;
        }

        let effective_price = line.effective_price();
        let vat_rate = line.vat_rate.unwrap_or(row_vat[r]);
        let Some(price_with_vat) = with_vat(effective_price, vat_rate) else {
            tracing::warn!(
                item_id = line.item_id,
                price = %effective_price,
                vat_rate = %vat_rate,
                "Quote line price overflows with VAT, skipped"
            );
            skipped += 1;
            continue;
        };
        let cell = MatrixCell {
            supplier_id: line.supplier_id,
            quotation_id: line.quotation_id,
            item_id: line.item_id,
            status: line.status,
            initial_price: line.initial_price,
            negotiated_price: line.negotiated_price,
            approved_price: line.approved_price,
            effective_price,
            vat_rate,
            price_with_vat,
            in_stock: line.in_stock,
            is_best: false,
            variance_amount: None,
            variance_percent: None,
        };
        if rows[r].cells.insert(line.supplier_id, cell).is_none() {
            columns[c].quoted += 1;
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "Quote lines outside the matrix skipped");
    }

    // ── Best price and per-row statistics ──

    for row in &mut rows {
        let mut best: Option<(i64, Decimal)> = None;
        let mut eligible: Vec<Decimal> = Vec::with_capacity(row.cells.len());
        for column in &columns {
            let Some(cell) = row.cells.get(&column.supplier_id) else {
                continue;
            };
            if !is_eligible(cell) {
                continue;
            }
            eligible.push(cell.price_with_vat);
            // Strict comparison: the earlier column keeps a tie
            if best.is_none_or(|(_, price)| cell.price_with_vat < price) {
                best = Some((column.supplier_id, cell.price_with_vat));
            }
        }

        if let Some((supplier_id, price)) = best {
            row.best_supplier_id = Some(supplier_id);
            row.best_price = Some(price);
            if let Some(cell) = row.cells.get_mut(&supplier_id) {
                cell.is_best = true;
            }
            if let Some(&c) = column_index.get(&supplier_id) {
                columns[c].best_count += 1;
            }
        }

        row.quoted_count = row.cells.len() as u32;
        apply_price_stats(row, &eligible);

        for (supplier_id, cell) in &row.cells {
            if let Some(&c) = column_index.get(supplier_id) {
                columns[c].quoted_total += cell.price_with_vat * row.quantity;
            }
        }
    }

    for column in &mut columns {
        column.coverage_percent = coverage(column.quoted, total_products);
        column.quoted_total = round2(column.quoted_total);
    }

    // ── Previous period ──

    let mut has_previous_data = false;
    if let Some(previous) = &previous {
        for row in &mut rows {
            let Some(&previous_price) = previous.prices.get(&row.product_id) else {
                continue;
            };
            has_previous_data = true;
            row.previous_price = Some(previous_price);
            for cell in row.cells.values_mut() {
                cell.variance_amount = Some(round2(cell.price_with_vat - previous_price));
                cell.variance_percent = change_percent(cell.price_with_vat, previous_price);
            }
        }
    }

    let overview = overview::summarize(&rows, columns.len() as u32);

    ComparisonMatrix {
        period: period.to_string(),
        region,
        category,
        generated_at,
        suppliers: columns,
        rows,
        overview,
        previous_period: previous.map(|p| p.period.to_string()),
        has_previous_data,
    }
}

/// A cell competes for best price only with a positive price and stock
fn is_eligible(cell: &MatrixCell) -> bool {
    cell.effective_price > Decimal::ZERO && cell.in_stock
}

fn apply_price_stats(row: &mut ProductRow, prices: &[Decimal]) {
    let (Some(&min), Some(&max)) = (prices.iter().min(), prices.iter().max()) else {
        return;
    };
    let sum: Decimal = prices.iter().sum();
    row.min_price = Some(min);
    row.max_price = Some(max);
    row.avg_price = Some(round2(sum / Decimal::from(prices.len())));
    row.spread_percent = change_percent(max, min);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal::Decimal;
    use shared::models::{KitchenDemand, Product, QuotationStatus};

    use super::build;
    use crate::matrix::{MatrixInput, PreviousPrices, QuoteLine, SupplierQuote};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(id: i64, code: &str, base: &str, vat: &str) -> Product {
        Product {
            id,
            team_id: 1,
            code: code.to_string(),
            name: format!("Product {code}"),
            unit: "kg".to_string(),
            category: "veg".to_string(),
            base_quantity: d(base),
            vat_rate: d(vat),
            is_active: true,
            created_at: 0,
        }
    }

    fn supplier(id: i64, code: &str) -> SupplierQuote {
        SupplierQuote {
            supplier_id: id,
            code: code.to_string(),
            name: format!("Supplier {code}"),
            quotation_id: id * 100,
            status: QuotationStatus::Pending,
            is_active: true,
            deleted_at: None,
        }
    }

    fn line(item_id: i64, supplier_id: i64, product_id: i64, initial: &str) -> QuoteLine {
        QuoteLine {
            item_id,
            quotation_id: supplier_id * 100,
            supplier_id,
            product_id,
            status: QuotationStatus::Pending,
            initial_price: d(initial),
            negotiated_price: None,
            approved_price: None,
            vat_rate: None,
            in_stock: true,
        }
    }

    fn input(
        products: Vec<Product>,
        suppliers: Vec<SupplierQuote>,
        lines: Vec<QuoteLine>,
    ) -> MatrixInput {
        MatrixInput {
            period: "2024-05-01".parse().unwrap(),
            region: "north".to_string(),
            category: "veg".to_string(),
            products,
            suppliers,
            demands: vec![],
            lines,
            previous: None,
            generated_at: 1_714_521_600_000,
        }
    }

    #[test]
    fn every_product_gets_a_row_without_quotes() {
        let matrix = build(input(
            vec![product(1, "P1", "5", "8"), product(2, "P2", "3", "8")],
            vec![],
            vec![],
        ));

        assert_eq!(matrix.rows.len(), 2);
        assert!(matrix.suppliers.is_empty());
        for row in &matrix.rows {
            assert!(row.cells.is_empty());
            assert!(row.best_price.is_none());
            assert_eq!(row.quoted_count, 0);
        }
        assert_eq!(matrix.overview.product_count, 2);
        assert_eq!(matrix.overview.uncovered_products, 2);
        assert_eq!(matrix.overview.coverage_percent, Decimal::ZERO);
        assert_eq!(matrix.overview.current_total, Decimal::ZERO);
        assert!(!matrix.has_previous_data);
        assert!(matrix.previous_period.is_none());
    }

    #[test]
    fn empty_category_has_zero_coverage() {
        let matrix = build(input(vec![], vec![supplier(1, "S1")], vec![]));
        assert!(matrix.rows.is_empty());
        assert_eq!(matrix.suppliers[0].total_products, 0);
        assert_eq!(matrix.suppliers[0].coverage_percent, Decimal::ZERO);
        assert_eq!(matrix.overview.coverage_percent, Decimal::ZERO);
    }

    #[test]
    fn best_price_is_lowest_price_with_vat() {
        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1"), supplier(2, "S2"), supplier(3, "S3")],
            vec![line(11, 1, 1, "10"), line(12, 2, 1, "9.5"), line(13, 3, 1, "0")],
        ));

        let row = &matrix.rows[0];
        assert_eq!(row.cells[&1].price_with_vat, d("10.80"));
        assert_eq!(row.cells[&2].price_with_vat, d("10.26"));
        assert_eq!(row.best_supplier_id, Some(2));
        assert_eq!(row.best_price, Some(d("10.26")));
        assert!(row.cells[&2].is_best);
        assert!(!row.cells[&1].is_best);
        assert!(!row.cells[&3].is_best);
        assert_eq!(row.quoted_count, 3);
        assert_eq!(matrix.suppliers[1].best_count, 1);
        assert_eq!(matrix.suppliers[0].best_count, 0);
    }

    #[test]
    fn zero_priced_cells_never_win() {
        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1")],
            vec![line(11, 1, 1, "0")],
        ));
        let row = &matrix.rows[0];
        assert_eq!(row.quoted_count, 1);
        assert!(row.best_supplier_id.is_none());
        assert!(row.min_price.is_none());
        assert_eq!(matrix.suppliers[0].quoted, 1);
    }

    #[test]
    fn out_of_stock_cells_are_skipped_for_best_price() {
        let mut cheap = line(12, 2, 1, "9.5");
        cheap.in_stock = false;
        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1"), supplier(2, "S2")],
            vec![line(11, 1, 1, "10"), cheap],
        ));
        assert_eq!(matrix.rows[0].best_supplier_id, Some(1));
        assert_eq!(matrix.rows[0].best_price, Some(d("10.80")));
    }

    #[test]
    fn ties_go_to_the_earlier_column() {
        let lines = || vec![line(11, 1, 1, "10"), line(12, 2, 1, "10")];

        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1"), supplier(2, "S2")],
            lines(),
        ));
        assert_eq!(matrix.rows[0].best_supplier_id, Some(1));

        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(2, "S2"), supplier(1, "S1")],
            lines(),
        ));
        assert_eq!(matrix.rows[0].best_supplier_id, Some(2));
    }

    #[test]
    fn item_vat_override_changes_ranking() {
        let mut exempt = line(11, 1, 1, "10");
        exempt.vat_rate = Some(Decimal::ZERO);
        let matrix = build(input(
            vec![product(1, "P1", "5", "10")],
            vec![supplier(1, "S1"), supplier(2, "S2")],
            vec![exempt, line(12, 2, 1, "9.5")],
        ));
        let row = &matrix.rows[0];
        assert_eq!(row.cells[&1].vat_rate, Decimal::ZERO);
        assert_eq!(row.cells[&1].price_with_vat, d("10.00"));
        assert_eq!(row.cells[&2].vat_rate, d("10"));
        assert_eq!(row.cells[&2].price_with_vat, d("10.45"));
        assert_eq!(row.best_supplier_id, Some(1));
    }

    #[test]
    fn effective_price_prefers_approved_then_negotiated() {
        let mut negotiated = line(11, 1, 1, "10");
        negotiated.negotiated_price = Some(d("9"));
        let mut approved = line(12, 2, 1, "10");
        approved.negotiated_price = Some(d("9"));
        approved.approved_price = Some(d("8.5"));

        let matrix = build(input(
            vec![product(1, "P1", "1", "0")],
            vec![supplier(1, "S1"), supplier(2, "S2")],
            vec![negotiated, approved],
        ));
        let row = &matrix.rows[0];
        assert_eq!(row.cells[&1].effective_price, d("9"));
        assert_eq!(row.cells[&2].effective_price, d("8.5"));
        assert_eq!(row.cells[&2].initial_price, d("10"));
        assert_eq!(row.best_supplier_id, Some(2));
    }

    #[test]
    fn lines_outside_the_matrix_are_skipped() {
        let mut foreign_quote = line(14, 1, 2, "4");
        foreign_quote.quotation_id = 999;
        let matrix = build(input(
            vec![product(1, "P1", "5", "8"), product(2, "P2", "5", "8")],
            vec![supplier(1, "S1")],
            vec![
                line(11, 1, 1, "10"),
                line(12, 1, 99, "10"),
                line(13, 9, 1, "1"),
                foreign_quote,
            ],
        ));

        assert_eq!(matrix.rows[0].cells.len(), 1);
        assert!(matrix.rows[1].cells.is_empty());
        assert_eq!(matrix.suppliers[0].quoted, 1);
        assert_eq!(matrix.suppliers[0].total_products, 2);
        assert_eq!(matrix.suppliers[0].coverage_percent, d("50"));
        assert_eq!(matrix.rows[0].best_price, Some(d("10.80")));
    }

    #[test]
    fn duplicate_supplier_columns_are_collapsed() {
        let mut second = supplier(1, "S1");
        second.quotation_id = 555;
        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1"), second],
            vec![line(11, 1, 1, "10")],
        ));
        assert_eq!(matrix.suppliers.len(), 1);
        assert_eq!(matrix.suppliers[0].quotation_id, 100);
        assert_eq!(matrix.overview.supplier_count, 1);
    }

    #[test]
    fn demand_overrides_base_quantity() {
        let mut matrix_input = input(
            vec![product(1, "P1", "5", "0"), product(2, "P2", "2", "0")],
            vec![supplier(1, "S1")],
            vec![line(11, 1, 1, "2"), line(12, 1, 2, "3")],
        );
        matrix_input.demands = vec![
            KitchenDemand {
                kitchen_id: 7,
                kitchen_name: "Central".to_string(),
                product_id: 1,
                quantity: d("3"),
            },
            KitchenDemand {
                kitchen_id: 8,
                kitchen_name: "Harbour".to_string(),
                product_id: 1,
                quantity: d("4.5"),
            },
        ];
        let matrix = build(matrix_input);

        let p1 = &matrix.rows[0];
        assert_eq!(p1.demand_quantity, Some(d("7.5")));
        assert_eq!(p1.quantity, d("7.5"));
        assert_eq!(p1.demand_by_kitchen.len(), 2);
        assert_eq!(p1.demand_by_kitchen[1].kitchen_name, "Harbour");

        let p2 = &matrix.rows[1];
        assert!(p2.demand_quantity.is_none());
        assert_eq!(p2.quantity, d("2"));

        // current = 2×7.5 + 3×2, base = 2×5 + 3×2
        assert_eq!(matrix.overview.current_total, d("21"));
        assert_eq!(matrix.overview.base_total, d("16"));
        assert_eq!(matrix.overview.vs_base.amount, d("5"));
        assert_eq!(matrix.overview.vs_base.percent, Some(d("31.25")));
        assert_eq!(matrix.suppliers[0].quoted_total, d("21"));
    }

    #[test]
    fn price_statistics_over_eligible_cells() {
        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1"), supplier(2, "S2")],
            vec![line(11, 1, 1, "10"), line(12, 2, 1, "9.5")],
        ));
        let row = &matrix.rows[0];
        assert_eq!(row.min_price, Some(d("10.26")));
        assert_eq!(row.max_price, Some(d("10.80")));
        assert_eq!(row.avg_price, Some(d("10.53")));
        assert_eq!(row.spread_percent, Some(d("5.26")));
    }

    #[test]
    fn previous_prices_drive_variance() {
        let mut matrix_input = input(
            vec![product(1, "P1", "5", "8"), product(2, "P2", "1", "8")],
            vec![supplier(1, "S1"), supplier(2, "S2")],
            vec![line(11, 1, 1, "10"), line(12, 2, 1, "9.5")],
        );
        matrix_input.previous = Some(PreviousPrices {
            period: "2024-04-01".parse().unwrap(),
            prices: HashMap::from([(1, d("10.00"))]),
        });
        let matrix = build(matrix_input);

        assert!(matrix.has_previous_data);
        assert_eq!(matrix.previous_period.as_deref(), Some("2024-04-01"));

        let row = &matrix.rows[0];
        assert_eq!(row.previous_price, Some(d("10.00")));
        assert_eq!(row.cells[&1].variance_amount, Some(d("0.80")));
        assert_eq!(row.cells[&1].variance_percent, Some(d("8.00")));
        assert_eq!(row.cells[&2].variance_amount, Some(d("0.26")));
        assert_eq!(row.cells[&2].variance_percent, Some(d("2.60")));
        assert!(matrix.rows[1].previous_price.is_none());

        let overview = &matrix.overview;
        assert_eq!(overview.previous_total, Some(d("50")));
        let vs_previous = overview.vs_previous.as_ref().unwrap();
        assert_eq!(vs_previous.amount, d("1.30"));
        assert_eq!(vs_previous.percent, Some(d("2.60")));
    }

    #[test]
    fn missing_previous_prices_degrade_gracefully() {
        let mut matrix_input = input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1")],
            vec![line(11, 1, 1, "10")],
        );
        matrix_input.previous = Some(PreviousPrices {
            period: "2024-04-01".parse().unwrap(),
            prices: HashMap::from([(42, d("3"))]),
        });
        let matrix = build(matrix_input);

        assert!(!matrix.has_previous_data);
        assert!(matrix.rows[0].previous_price.is_none());
        assert!(matrix.rows[0].cells[&1].variance_amount.is_none());
        assert!(matrix.overview.previous_total.is_none());
        assert!(matrix.overview.vs_previous.is_none());
    }

    #[test]
    fn overview_compares_against_initial_prices() {
        let mut negotiated = line(12, 2, 1, "10");
        negotiated.negotiated_price = Some(d("9.5"));
        let matrix = build(input(
            vec![product(1, "P1", "5", "8"), product(2, "P2", "1", "8")],
            vec![supplier(1, "S1"), supplier(2, "S2")],
            vec![line(11, 1, 1, "11"), negotiated],
        ));
        let overview = &matrix.overview;

        assert_eq!(overview.product_count, 2);
        assert_eq!(overview.supplier_count, 2);
        assert_eq!(overview.quoted_products, 1);
        assert_eq!(overview.uncovered_products, 1);
        assert_eq!(overview.coverage_percent, d("50"));
        // best = 9.5 × 1.08 = 10.26, initial = 10 × 1.08 = 10.80, quantity 5
        assert_eq!(overview.current_total, d("51.30"));
        assert_eq!(overview.initial_total, d("54.00"));
        assert_eq!(overview.vs_initial.amount, d("-2.70"));
        assert_eq!(overview.vs_initial.percent, Some(d("-5.00")));
        assert_eq!(overview.base_total, d("51.30"));
        assert_eq!(overview.vs_base.amount, Decimal::ZERO);
    }

    #[test]
    fn unavailable_suppliers_get_no_column() {
        let mut inactive = supplier(2, "S2");
        inactive.is_active = false;
        let mut deleted = supplier(3, "S3");
        deleted.deleted_at = Some(1_714_000_000_000);
        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1"), inactive, deleted],
            vec![line(11, 1, 1, "10"), line(12, 2, 1, "5"), line(13, 3, 1, "4")],
        ));

        assert_eq!(matrix.suppliers.len(), 1);
        assert_eq!(matrix.suppliers[0].supplier_id, 1);
        assert_eq!(matrix.overview.supplier_count, 1);

        let row = &matrix.rows[0];
        assert_eq!(row.cells.len(), 1);
        assert_eq!(row.best_supplier_id, Some(1));
        assert_eq!(row.best_price, Some(d("10.80")));
    }

    #[test]
    fn out_of_stock_quote_still_covers_the_product() {
        let mut unavailable = line(11, 1, 1, "10");
        unavailable.in_stock = false;
        let matrix = build(input(
            vec![product(1, "P1", "5", "8"), product(2, "P2", "1", "8")],
            vec![supplier(1, "S1")],
            vec![unavailable],
        ));
        let overview = &matrix.overview;

        assert!(matrix.rows[0].best_price.is_none());
        assert_eq!(overview.quoted_products, 1);
        assert_eq!(overview.uncovered_products, 1);
        assert_eq!(overview.coverage_percent, d("50"));
        assert_eq!(overview.current_total, Decimal::ZERO);
    }

    #[test]
    fn supplier_columns_keep_quotation_status() {
        let mut negotiating = supplier(2, "S2");
        negotiating.status = QuotationStatus::Negotiation;
        let matrix = build(input(
            vec![product(1, "P1", "5", "8")],
            vec![supplier(1, "S1"), negotiating],
            vec![line(11, 1, 1, "10")],
        ));
        assert_eq!(matrix.suppliers[0].status, QuotationStatus::Pending);
        assert_eq!(matrix.suppliers[1].status, QuotationStatus::Negotiation);
        assert_eq!(matrix.suppliers[1].quoted, 0);
        assert_eq!(matrix.suppliers[1].coverage_percent, Decimal::ZERO);
        assert_eq!(matrix.suppliers[0].coverage_percent, d("100"));
    }
}
