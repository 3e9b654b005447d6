//! Property tests for dense ranking and composite scoring.

use proptest::prelude::*;
use stockrank_core::{
    dense_ranks, is_excluded_sector, rank_snapshot, CompositeMetric, MetricSnapshot,
    MetricValues, RankedMetric, SnapshotDate, SnapshotRow, SortDirection, Symbol,
};

fn symbols(count: usize) -> Vec<String> {
    (0..count).map(|index| format!("S{index:03}")).collect()
}

fn metric_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::of(-50.0f64..500.0), 0..40)
}

fn sort_direction() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Ascending), Just(SortDirection::Descending)]
}

fn sector() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just(String::from("Technology")),
        Just(String::from("Energy")),
        Just(String::from("Financial Services")),
        Just(String::from("Utilities\u{2014}Regulated Electric")),
        Just(String::from("Healthcare")),
    ])
}

proptest! {
    #[test]
    fn ranks_are_dense_and_cover_only_positive_values(values in metric_values(), direction in sort_direction()) {
        let names = symbols(values.len());
        let entries = names
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect::<Vec<_>>();

        let ranks = dense_ranks(&entries, direction);

        prop_assert_eq!(ranks.len(), values.len());
        for (rank, value) in ranks.iter().zip(&values) {
            prop_assert_eq!(rank.is_some(), value.is_some_and(|value| value > 0.0));
        }
        let mut assigned = ranks.iter().flatten().copied().collect::<Vec<_>>();
        assigned.sort_unstable();
        let expected = (1..=assigned.len() as u32).collect::<Vec<_>>();
        prop_assert_eq!(assigned, expected);
    }

    #[test]
    fn better_values_never_rank_below_worse_ones(values in metric_values(), direction in sort_direction()) {
        let names = symbols(values.len());
        let entries = names
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect::<Vec<_>>();

        let ranks = dense_ranks(&entries, direction);

        for (left, (left_rank, left_value)) in ranks.iter().zip(&values).enumerate() {
            for (right, (right_rank, right_value)) in ranks.iter().zip(&values).enumerate() {
                let (Some(left_rank), Some(right_rank), Some(a), Some(b)) =
                    (left_rank, right_rank, left_value, right_value)
                else {
                    continue;
                };
                if left_rank < right_rank {
                    match direction {
                        SortDirection::Ascending => prop_assert!(a <= b, "{left} vs {right}"),
                        SortDirection::Descending => prop_assert!(a >= b, "{left} vs {right}"),
                    }
                }
            }
        }
    }

    #[test]
    fn composites_follow_component_ranks_and_sector_rules(
        rows in prop::collection::vec(
            (prop::option::of(-10.0f64..60.0), prop::option::of(-5.0f64..40.0), sector()),
            0..30,
        )
    ) {
        let date = SnapshotDate::parse("2026-02-20").expect("valid date");
        let snapshot_rows = rows
            .iter()
            .enumerate()
            .map(|(index, (pe, roa, sector))| SnapshotRow {
                snapshot: MetricSnapshot::new(
                    Symbol::parse(&format!("S{index:03}")).expect("valid symbol"),
                    date,
                    MetricValues {
                        pe_ratio_ttm: *pe,
                        return_on_assets: *roa,
                        ..MetricValues::default()
                    },
                ),
                sector: sector.clone(),
            })
            .collect::<Vec<_>>();

        let ranked = rank_snapshot(&snapshot_rows);

        prop_assert_eq!(ranked.derived.len(), snapshot_rows.len());
        for (row, derived) in snapshot_rows.iter().zip(&ranked.derived) {
            let ranks = &derived.ranks;
            let composite = CompositeMetric::MagicFormulaTrailing;
            if is_excluded_sector(row.sector.as_deref()) {
                prop_assert_eq!(composite.value(ranks), None);
                prop_assert_eq!(composite.rank(ranks), None);
                continue;
            }
            let expected = match (
                RankedMetric::PeRatioTtm.rank(ranks),
                RankedMetric::ReturnOnAssets.rank(ranks),
            ) {
                (Some(pe), Some(roa)) => Some(pe + roa),
                _ => None,
            };
            prop_assert_eq!(composite.value(ranks), expected);
            prop_assert_eq!(composite.rank(ranks).is_some(), expected.is_some());
            // Forward P/E is never populated here.
            prop_assert_eq!(CompositeMetric::MagicFormulaFuture.value(ranks), None);
        }
    }
}
