//! Behaviour of the DuckDB record store: atomic rank replacement, rank
//! invalidation on snapshot writes and leaderboard reads.

use std::path::Path;

use stockrank_warehouse::{
    CompanyRecord, MetricValues, RankRecord, RankValues, RankedQuery, SnapshotRecord,
    SnapshotUpsert, UpsertOutcome, Warehouse, WarehouseConfig, WarehouseError,
};
use tempfile::tempdir;

const DATE: &str = "2026-02-20";

fn open_store(dir: &Path) -> Warehouse {
    Warehouse::open(WarehouseConfig::at(dir.join("nested").join("warehouse.duckdb")))
        .expect("warehouse opens")
}

fn upsert(symbol: &str, date: &str, ebitda: f64) -> SnapshotUpsert {
    SnapshotUpsert {
        company: CompanyRecord {
            symbol: symbol.to_owned(),
            name: Some(format!("{symbol} Inc.")),
            sector: Some(String::from("Technology")),
            industry: None,
        },
        snapshot: SnapshotRecord {
            symbol: symbol.to_owned(),
            date: date.to_owned(),
            values: MetricValues {
                ebitda: Some(ebitda),
                ..MetricValues::default()
            },
        },
    }
}

fn ranked(symbol: &str, date: &str, rank_ebitda: Option<u32>) -> RankRecord {
    RankRecord {
        symbol: symbol.to_owned(),
        date: date.to_owned(),
        ranks: RankValues {
            rank_ebitda,
            ..RankValues::default()
        },
    }
}

/// Replace ranks for `date` as of its current snapshot version.
fn replace(store: &Warehouse, date: &str, rows: &[RankRecord]) -> Result<usize, WarehouseError> {
    let version = store.snapshot_version(date)?;
    store.replace_ranks(date, version, rows)
}

fn ebitda_query(limit: usize) -> RankedQuery {
    RankedQuery {
        rank_column: "rank_ebitda",
        score_column: "ebitda",
        limit,
    }
}

#[test]
fn failed_rank_replacement_keeps_previous_ranks() {
    // Given: a date with stored ranks
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    store
        .upsert_batch(&[upsert("AAA", DATE, 5.0), upsert("BBB", DATE, 9.0)])
        .expect("upsert");
    let original = vec![ranked("AAA", DATE, Some(2)), ranked("BBB", DATE, Some(1))];
    replace(&store, DATE, &original).expect("first replace");

    // When: a replacement fails part-way through its inserts
    let broken = vec![ranked("AAA", DATE, Some(1)), ranked("", DATE, Some(2))];
    let error = replace(&store, DATE, &broken)
        .expect_err("empty symbol violates the table constraint");

    // Then: the error surfaces and the earlier ranks are still visible
    assert!(matches!(error, WarehouseError::DuckDb(_)), "{error}");
    assert_eq!(store.load_ranks(DATE).expect("load"), original);
}

#[test]
fn replacement_rejects_rows_for_another_date() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());

    let error = replace(&store, DATE, &[ranked("AAA", "2026-02-21", Some(1))])
        .expect_err("date mismatch must fail");

    assert!(matches!(error, WarehouseError::QueryRejected(_)));
}

#[test]
fn snapshot_writes_clear_ranks_for_touched_dates_only() {
    // Given: ranks stored on two dates
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let other = "2026-02-19";
    store
        .upsert_batch(&[upsert("AAA", DATE, 5.0), upsert("AAA", other, 4.0)])
        .expect("upsert");
    replace(&store, DATE, &[ranked("AAA", DATE, Some(1))]).expect("ranks today");
    replace(&store, other, &[ranked("AAA", other, Some(1))]).expect("ranks yesterday");

    // When: one date receives a new snapshot
    let outcomes = store
        .upsert_batch(&[upsert("BBB", DATE, 7.0)])
        .expect("upsert");

    // Then: that date is unranked while the other keeps its ranks
    assert_eq!(outcomes, vec![UpsertOutcome::Inserted]);
    assert!(store.load_ranks(DATE).expect("load").is_empty());
    assert_eq!(store.load_ranks(other).expect("load").len(), 1);
    assert_eq!(
        store.latest_ranked_date().expect("latest").as_deref(),
        Some(other)
    );
}

#[test]
fn leaderboard_skips_unranked_rows_and_respects_limit() {
    // Given: four stored rows, one unranked and one with a zero rank
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    store
        .upsert_batch(&[
            upsert("AAA", DATE, 5.0),
            upsert("BBB", DATE, 9.0),
            upsert("CCC", DATE, 1.0),
            upsert("DDD", DATE, 3.0),
        ])
        .expect("upsert");
    replace(
        &store,
        DATE,
        &[
            ranked("AAA", DATE, Some(2)),
            ranked("BBB", DATE, Some(1)),
            ranked("CCC", DATE, None),
            ranked("DDD", DATE, Some(0)),
        ],
    )
    .expect("replace");

    // When: the leaderboard is read
    let all = store.ranked_entries(&ebitda_query(10)).expect("query");
    let top = store.ranked_entries(&ebitda_query(1)).expect("query");

    // Then: only positive ranks appear, ascending, with identity and score
    let listed = all
        .iter()
        .map(|entry| (entry.symbol.as_str(), entry.rank, entry.score))
        .collect::<Vec<_>>();
    assert_eq!(listed, vec![("BBB", 1, Some(9.0)), ("AAA", 2, Some(5.0))]);
    assert_eq!(all[0].name.as_deref(), Some("BBB Inc."));
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].symbol, "BBB");

    // And: a zero limit is refused
    assert!(matches!(
        store.ranked_entries(&ebitda_query(0)),
        Err(WarehouseError::QueryRejected(_))
    ));
}

#[test]
fn company_refresh_keeps_fields_the_update_leaves_out() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    store.upsert_batch(&[upsert("AAA", DATE, 5.0)]).expect("upsert");

    let mut refresh = upsert("AAA", DATE, 6.0);
    refresh.company.name = None;
    refresh.company.industry = Some(String::from("Software"));
    store.upsert_batch(&[refresh]).expect("refresh");

    let company = store
        .find_company("AAA")
        .expect("lookup")
        .expect("company stored");
    assert_eq!(company.name.as_deref(), Some("AAA Inc."));
    assert_eq!(company.sector.as_deref(), Some("Technology"));
    assert_eq!(company.industry.as_deref(), Some("Software"));

    let snapshot = store
        .find_snapshot("AAA", DATE)
        .expect("lookup")
        .expect("snapshot stored");
    assert_eq!(snapshot.values.ebitda, Some(6.0));
}

#[test]
fn ranks_computed_before_a_snapshot_write_are_refused() {
    // Given: a ranked date and the version those ranks were computed from
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    store
        .upsert_batch(&[upsert("AAA", DATE, 5.0), upsert("BBB", DATE, 9.0)])
        .expect("upsert");
    let read_version = store.snapshot_version(DATE).expect("version");

    // When: another write lands on that date before the ranks are stored
    store.upsert_batch(&[upsert("CCC", DATE, 20.0)]).expect("late write");
    let error = store
        .replace_ranks(
            DATE,
            read_version,
            &[ranked("AAA", DATE, Some(2)), ranked("BBB", DATE, Some(1))],
        )
        .expect_err("ranks of an older read must not land");

    // Then: nothing is stored for the date, so it stays unranked as a whole
    assert!(matches!(
        error,
        WarehouseError::StaleSnapshot { expected, found, .. } if expected == read_version && found == read_version + 1
    ));
    assert!(store.load_ranks(DATE).expect("load").is_empty());
}
