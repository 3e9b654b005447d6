//! Behaviour of the JSON import path and the sample dataset.

use std::path::Path;

use stockrank_core::{
    import_rows, is_excluded_sector, parse_document, sample_rows, ImportRow, MetricValues,
    RankedMetric, RankingService, SnapshotDate, SnapshotStore, StrategyRegistry, Symbol,
    Warehouse, WarehouseConfig,
};
use tempfile::tempdir;

fn open_store(dir: &Path) -> Warehouse {
    Warehouse::open(WarehouseConfig::at(dir.join("warehouse.duckdb"))).expect("warehouse opens")
}

fn date(value: &str) -> SnapshotDate {
    SnapshotDate::parse(value).expect("valid date")
}

const DOCUMENT: &str = r#"[
  {"symbol": "AAPL", "name": "Apple Inc.", "sector": "Technology",
   "metrics": {"pe_ratio_ttm": 38.5, "peg_ratio": 2.1, "return_on_assets": 30.5}},
  {"symbol": "KO", "name": "Coca-Cola Co.", "sector": "Consumer Defensive",
   "metrics": {"pe_ratio_ttm": 25.0, "return_on_assets": 10.0, "dividend_yield": 2.8}},
  {"symbol": "JPM", "name": "JPMorgan Chase", "sector": "Financial Services",
   "date": "2026-02-20", "metrics": {"pe_ratio_ttm": 13.0, "return_on_assets": 1.2}}
]"#;

#[test]
fn importing_the_same_document_twice_changes_nothing() {
    // Given: a document imported and ranked once
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let today = date("2026-02-20");
    let first = import_rows(&store, parse_document(DOCUMENT).expect("parses"), today)
        .expect("first import");
    let registry = StrategyRegistry::standard();
    RankingService::new(&store, &registry)
        .recompute_rankings()
        .expect("pass succeeds");
    let ranks_before = store.load_derived(today).expect("load");

    // When: the same document is imported again
    let second = import_rows(&store, parse_document(DOCUMENT).expect("parses"), today)
        .expect("second import");

    // Then: every row is unchanged and the stored ranks survive
    assert_eq!((first.inserted, first.updated, first.unchanged), (3, 0, 0));
    assert_eq!((second.inserted, second.updated, second.unchanged), (0, 0, 3));
    assert!(second.dates.is_empty());
    assert_eq!(store.load_derived(today).expect("load"), ranks_before);
}

#[test]
fn changed_metrics_update_in_place_and_clear_that_dates_ranks() {
    // Given: a ranked import
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let today = date("2026-02-20");
    import_rows(&store, parse_document(DOCUMENT).expect("parses"), today).expect("import");
    let registry = StrategyRegistry::standard();
    RankingService::new(&store, &registry)
        .recompute_rankings()
        .expect("pass succeeds");

    // When: one company's metrics change
    let report = import_rows(
        &store,
        vec![ImportRow {
            symbol: String::from("KO"),
            metrics: MetricValues {
                pe_ratio_ttm: Some(21.0),
                return_on_assets: Some(10.0),
                ..MetricValues::default()
            },
            ..ImportRow::default()
        }],
        today,
    )
    .expect("import");

    // Then: the row is updated and the date waits for the next pass
    assert_eq!(report.updated, 1);
    assert_eq!(report.dates, vec![today]);
    assert!(store.load_derived(today).expect("load").is_empty());
    let ko = Symbol::parse("KO").expect("valid");
    let stored = SnapshotStore::find_snapshot(&store, &ko, today)
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored.values.pe_ratio_ttm, Some(21.0));
    assert_eq!(stored.values.dividend_yield, None);
}

#[test]
fn invalid_rows_are_reported_and_valid_rows_still_land() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let rows = parse_document(
        r#"[
          {"symbol": "GOOD", "metrics": {"ebitda": 10.0}},
          {"symbol": "BAD$"},
          {"symbol": "LATE", "date": "2026-02-31"},
          {"symbol": "GOOD", "metrics": {"ebitda": 12.0}}
        ]"#,
    )
    .expect("parses");

    let report = import_rows(&store, rows, date("2026-02-20")).expect("import");

    assert_eq!(report.total, 4);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.superseded, 1);
    assert_eq!(
        report
            .rejected
            .iter()
            .map(|rejection| (rejection.index, rejection.symbol.as_str()))
            .collect::<Vec<_>>(),
        vec![(1, "BAD$"), (2, "LATE")]
    );

    // The later duplicate wins.
    let good = Symbol::parse("GOOD").expect("valid");
    let stored = SnapshotStore::find_snapshot(&store, &good, date("2026-02-20"))
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored.values.ebitda, Some(12.0));
}

#[test]
fn seeded_sample_ranks_every_metric_densely() {
    // Given: the built-in sample dataset
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let today = date("2026-02-20");
    let imported = stockrank_core::seed(&store, today).expect("seed succeeds");
    let registry = StrategyRegistry::standard();

    // When: it is ranked
    let report = RankingService::new(&store, &registry)
        .recompute_rankings()
        .expect("pass succeeds");

    // Then: every ranked metric holds exactly the ranks 1..=k
    assert_eq!(imported.inserted, sample_rows().len());
    let derived = store.load_derived(today).expect("load");
    for metric in RankedMetric::ALL {
        let mut ranks = derived
            .iter()
            .filter_map(|row| metric.rank(&row.ranks))
            .collect::<Vec<_>>();
        ranks.sort_unstable();
        let expected = (1..=u32::try_from(ranks.len()).expect("fits")).collect::<Vec<_>>();
        assert_eq!(ranks, expected, "{}", metric.key());
    }

    // And: excluded sectors never carry a composite
    let excluded = sample_rows()
        .into_iter()
        .filter(|row| is_excluded_sector(row.sector.as_deref()))
        .map(|row| row.symbol)
        .collect::<Vec<_>>();
    assert_eq!(report.excluded_from_composites, excluded.len());
    for row in derived
        .iter()
        .filter(|row| excluded.contains(&row.symbol.to_string()))
    {
        assert_eq!(row.ranks.magic_formula_future, None, "{}", row.symbol);
        assert_eq!(row.ranks.rank_magic_formula_future, None, "{}", row.symbol);
    }
}
