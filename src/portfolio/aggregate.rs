//! Pure aggregation over investment rows. No I/O.

use std::cmp::Ordering;

use crate::categorize::{Bucket, RuleSet};
use crate::models::InvestmentRecord;

use super::models::{
    BucketMap, CategorizedTables, CategoryTotal, CategoryTotals, Composition,
    CompositionCategories, CompositionRow, CompositionTotals, RankedComposition, RankedRow,
    TableCounts, Totals, TypeSummary,
};

/// Label used when a record has no `investment_type`.
pub const UNCATEGORIZED: &str = "Sin categoría";

pub fn flat_totals(records: &[InvestmentRecord]) -> Totals {
    records.iter().fold(Totals::default(), |acc, r| Totals {
        quantity: acc.quantity + r.amount,
        money: acc.money + r.total_money,
        purchase_value: acc.purchase_value + r.purchase_value,
    })
}

/// Group records per bucket, keeping store order within each bucket. Every bucket
/// of the rule set is present, empty ones included.
pub fn bucket_records(
    records: &[InvestmentRecord],
    rules: RuleSet,
) -> BucketMap<Vec<InvestmentRecord>> {
    let mut groups: Vec<(Bucket, Vec<InvestmentRecord>)> = rules
        .buckets()
        .iter()
        .map(|b| (*b, Vec::new()))
        .collect();

    for record in records {
        let bucket = rules.categorize(record.investment_type.as_deref());
        if let Some((_, group)) = groups.iter_mut().find(|(b, _)| *b == bucket) {
            group.push(record.clone());
        }
    }
    BucketMap::new(groups)
}

pub fn categorized_tables(records: &[InvestmentRecord]) -> CategorizedTables {
    let categories = bucket_records(records, RuleSet::Table);
    let by_bucket = BucketMap::new(categories.iter().map(|(b, rs)| (b, rs.len())).collect());
    CategorizedTables {
        counts: TableCounts {
            total: records.len(),
            by_bucket,
        },
        categories,
    }
}

/// Sum `total_money` per bucket; each bucket's share of the overall sum.
///
/// When the overall sum is not positive every share is `0`.
pub fn category_totals(records: &[InvestmentRecord], rules: RuleSet) -> CategoryTotals {
    let mut sums: Vec<(Bucket, f64)> = rules.buckets().iter().map(|b| (*b, 0.0)).collect();
    for record in records {
        let bucket = rules.categorize(record.investment_type.as_deref());
        if let Some((_, sum)) = sums.iter_mut().find(|(b, _)| *b == bucket) {
            *sum += record.total_money;
        }
    }

    let overall: f64 = sums.iter().map(|(_, s)| s).sum();
    let entries = sums
        .into_iter()
        .map(|(bucket, total)| CategoryTotal {
            bucket,
            total,
            percentage: if overall > 0.0 {
                total / overall * 100.0
            } else {
                0.0
            },
        })
        .collect();

    CategoryTotals { entries, overall }
}

pub fn composition(records: &[InvestmentRecord]) -> Composition {
    let totals = category_totals(records, RuleSet::Composition);

    let table_data = totals
        .entries
        .iter()
        .map(|e| CompositionRow {
            color: e.bucket.color(),
            label: e.bucket.label(),
            total: e.total,
            percentage: e.percentage,
        })
        .collect();

    Composition {
        categories: CompositionCategories {
            labels: totals.entries.iter().map(|e| e.bucket.label()).collect(),
            values: totals.entries.iter().map(|e| e.percentage).collect(),
            colors: totals.entries.iter().map(|e| e.bucket.color()).collect(),
            totals: CompositionTotals(totals),
        },
        table_data,
    }
}

/// Rank by `total_money`, largest first. Ties keep store order.
///
/// Shares are relative to the sum over the ranked records; a zero sum gives 0%.
pub fn ranked_composition(records: &[InvestmentRecord]) -> RankedComposition {
    let mut sorted: Vec<&InvestmentRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.total_money
            .partial_cmp(&a.total_money)
            .unwrap_or(Ordering::Equal)
    });

    let total_money_sum: f64 = sorted.iter().map(|r| r.total_money).sum();
    let colors = palette(sorted.len());

    let table_data = sorted
        .iter()
        .zip(colors)
        .map(|(record, color)| RankedRow {
            color,
            label: record.asset_name.clone(),
            size: record.total_money,
            percentage: if total_money_sum != 0.0 {
                record.total_money / total_money_sum * 100.0
            } else {
                0.0
            },
        })
        .collect();

    RankedComposition {
        table_data,
        total_money_sum,
        count: records.len(),
    }
}

/// `n` colors with evenly spaced hues, as `#rrggbb`. Same `n`, same colors.
pub fn palette(n: usize) -> Vec<String> {
    const SATURATION: f64 = 0.65;
    const LIGHTNESS: f64 = 0.6;
    const HUE_OFFSET: f64 = 15.0;

    (0..n)
        .map(|i| {
            let hue = (HUE_OFFSET + 360.0 * i as f64 / n as f64) % 360.0;
            let (r, g, b) = hsl_to_rgb(hue, SATURATION, LIGHTNESS);
            format!("#{r:02x}{g:02x}{b:02x}")
        })
        .collect()
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

/// Totals per raw `investment_type` label (no bucketing).
pub fn type_summary(records: &[InvestmentRecord]) -> TypeSummary {
    let mut summary = TypeSummary::new();
    for record in records {
        let label = record
            .investment_type
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let entry = summary.entry(label).or_default();
        entry.total_value += record.purchase_value;
        entry.total_money += record.total_money;
        entry.count += 1;
    }

    for totals in summary.values_mut() {
        if totals.count > 0 && totals.total_value > 0.0 {
            totals.avg_profit_loss =
                (totals.total_money - totals.total_value) / totals.total_value * 100.0;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, kind: &str, total_money: f64) -> InvestmentRecord {
        InvestmentRecord::new(id, format!("T{id}"), format!("Asset {id}"))
            .with_type(kind)
            .with_total_money(total_money)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn flat_totals_sum_each_field() {
        let records = vec![
            InvestmentRecord::new(1, "A", "A")
                .with_values(100.0, 200.0, 110.0)
                .with_total_money(220.0),
            InvestmentRecord::new(2, "B", "B")
                .with_values(50.0, 50.0, 40.0)
                .with_total_money(40.0),
        ];
        let totals = flat_totals(&records);
        assert_eq!(totals.quantity, 250.0);
        assert_eq!(totals.money, 260.0);
        assert_eq!(totals.purchase_value, 150.0);
    }

    #[test]
    fn crypto_only_portfolio() {
        let records = vec![record(1, "Crypto", 300.0), record(2, "Crypto", 700.0)];
        let totals = category_totals(&records, RuleSet::Composition);

        assert_eq!(totals.overall, 1000.0);
        for entry in &totals.entries {
            if entry.bucket == Bucket::Cryptomonedas {
                assert_eq!(entry.total, 1000.0);
                assert_eq!(entry.percentage, 100.0);
            } else {
                assert_eq!(entry.total, 0.0);
                assert_eq!(entry.percentage, 0.0);
            }
        }
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let records = vec![
            record(1, "Renta Fija", 123.4),
            record(2, "Acciones", 77.7),
            record(3, "EPSV", 1000.0),
            record(4, "", 5.5),
        ];
        for rules in [RuleSet::Table, RuleSet::Composition] {
            let totals = category_totals(&records, rules);
            let sum: f64 = totals.entries.iter().map(|e| e.percentage).sum();
            assert!(approx(sum, 100.0), "{rules:?}: {sum}");
        }
    }

    #[test]
    fn zero_overall_gives_zero_percentages() {
        let records = vec![record(1, "Renta Fija", 0.0), record(2, "Crypto", 0.0)];
        let totals = category_totals(&records, RuleSet::Table);
        assert_eq!(totals.overall, 0.0);
        assert!(totals.entries.iter().all(|e| e.percentage == 0.0));
        assert_eq!(totals.entries.len(), 8);
    }

    #[test]
    fn tables_use_dca_bucket() {
        let records = vec![
            record(1, "DCA Renta Variable", 10.0),
            record(2, "Renta Variable", 20.0),
            record(3, "Otros", 30.0),
        ];
        let tables = categorized_tables(&records);

        assert_eq!(tables.counts.total, 3);
        assert_eq!(tables.counts.by_bucket.get(Bucket::Dca), Some(&1));
        assert_eq!(tables.counts.by_bucket.get(Bucket::RentaVariable), Some(&2));
        assert_eq!(tables.categories.len(), 8);
        let rv: Vec<i64> = tables
            .categories
            .get(Bucket::RentaVariable)
            .unwrap()
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(rv, vec![2, 3]);
    }

    #[test]
    fn composition_folds_dca_into_base_bucket() {
        let records = vec![
            record(1, "DCA Renta Variable", 10.0),
            record(2, "Renta Variable", 30.0),
        ];
        let comp = composition(&records);
        let totals = &comp.categories.totals.0;
        assert_eq!(totals.get(Bucket::RentaVariable).unwrap().total, 40.0);
        assert!(totals.get(Bucket::Dca).is_none());
        assert_eq!(comp.categories.labels.len(), 7);
        assert_eq!(comp.categories.labels[6], "CAPITAL RIESGO & STARTUPS");
        assert_eq!(comp.categories.colors[0], "#FF6B6B");
        assert_eq!(comp.table_data[1].total, 40.0);
        assert_eq!(comp.table_data[1].percentage, 100.0);
    }

    #[test]
    fn ranked_sorts_descending_and_keeps_ties_stable() {
        let records = vec![
            record(1, "x", 100.0),
            record(2, "x", 300.0),
            record(3, "x", 100.0),
        ];
        let ranked = ranked_composition(&records);
        let labels: Vec<&str> = ranked.table_data.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Asset 2", "Asset 1", "Asset 3"]);
        assert_eq!(ranked.total_money_sum, 500.0);
        assert_eq!(ranked.count, 3);
        assert!(approx(ranked.table_data[0].percentage, 60.0));
    }

    #[test]
    fn ranked_zero_sum_is_zero_percent() {
        let records = vec![record(1, "x", 0.0), record(2, "x", 0.0)];
        let ranked = ranked_composition(&records);
        assert!(ranked.table_data.iter().all(|r| r.percentage == 0.0));
    }

    #[test]
    fn palette_is_deterministic_and_distinct() {
        let a = palette(5);
        assert_eq!(a, palette(5));
        assert_eq!(a.len(), 5);
        for color in &a {
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
        }
        let mut unique = a.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
        assert!(palette(0).is_empty());
    }

    #[test]
    fn type_summary_groups_raw_labels() {
        let mut untyped = InvestmentRecord::new(3, "Z", "Z").with_total_money(5.0);
        untyped.purchase_value = 0.0;
        let records = vec![
            record(1, "Acciones", 150.0).with_values(100.0, 0.0, 0.0),
            record(2, "Acciones", 50.0).with_values(100.0, 0.0, 0.0),
            untyped,
        ];
        let summary = type_summary(&records);

        let acciones = summary["Acciones"];
        assert_eq!(acciones.count, 2);
        assert_eq!(acciones.total_value, 200.0);
        assert_eq!(acciones.total_money, 200.0);
        assert_eq!(acciones.avg_profit_loss, 0.0);

        let other = summary[UNCATEGORIZED];
        assert_eq!(other.count, 1);
        assert_eq!(other.avg_profit_loss, 0.0);
    }
}
