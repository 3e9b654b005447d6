//! End-to-end journeys through the `stockrank` binary.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn stockrank(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stockrank"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env_remove("STOCKRANK_LOG")
        .output()
        .expect("binary runs")
}

fn envelope(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is one JSON envelope")
}

#[test]
fn user_can_seed_and_read_a_magic_formula_leaderboard() {
    // Given: an empty warehouse seeded with the sample dataset
    let temp = tempdir().expect("tempdir");
    let db = temp.path().join("warehouse.duckdb");
    let seeded = stockrank(&db, &["seed", "--date", "2026-02-20"]);
    assert!(seeded.status.success(), "{}", String::from_utf8_lossy(&seeded.stderr));
    let seeded = envelope(&seeded);
    assert_eq!(seeded["meta"]["command"], "seed");
    assert_eq!(seeded["data"]["ranking"]["snapshot_date"], "2026-02-20");

    // When: they ask for the top five
    let output = stockrank(&db, &["rankings", "magic_formula_trailing", "--limit", "5"]);

    // Then: five entries come back in rank order, none from excluded sectors
    assert!(output.status.success());
    let body = envelope(&output);
    let entries = body["data"]["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), 5);
    let ranks = entries
        .iter()
        .map(|entry| entry["rank"].as_u64().expect("rank"))
        .collect::<Vec<_>>();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    for entry in entries {
        let symbol = entry["symbol"].as_str().expect("symbol");
        assert!(!["JPM", "XOM", "NEE", "DUK"].contains(&symbol), "{symbol}");
    }
}

#[test]
fn unknown_strategy_exits_with_not_found() {
    let temp = tempdir().expect("tempdir");
    let db = temp.path().join("warehouse.duckdb");

    let output = stockrank(&db, &["rankings", "momentum"]);

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("strategy not found"), "{stderr}");
}

#[test]
fn zero_limit_is_a_validation_error() {
    let temp = tempdir().expect("tempdir");
    let db = temp.path().join("warehouse.duckdb");

    let output = stockrank(&db, &["rankings", "ebitda", "--limit", "0"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn strict_mode_fails_when_ranking_an_empty_store() {
    // Given: nothing has been imported
    let temp = tempdir().expect("tempdir");
    let db = temp.path().join("warehouse.duckdb");

    // When: ranking runs without and with --strict
    let relaxed = stockrank(&db, &["rank"]);
    let strict = stockrank(&db, &["--strict", "rank"]);

    // Then: the pass reports zero rows with a warning, which strict mode rejects
    assert!(relaxed.status.success());
    let body = envelope(&relaxed);
    assert_eq!(body["data"]["ranked_rows"], 0);
    assert_eq!(body["meta"]["warnings"].as_array().map(Vec::len), Some(1));
    assert_eq!(strict.status.code(), Some(5));
}

#[test]
fn imported_file_is_ranked_and_shown() {
    // Given: a JSON import file
    let temp = tempdir().expect("tempdir");
    let db = temp.path().join("warehouse.duckdb");
    let file = temp.path().join("snapshots.json");
    std::fs::write(
        &file,
        r#"[
          {"symbol": "aaa", "sector": "Technology", "date": "2026-02-20",
           "metrics": {"pe_ratio_ttm": 10.0, "return_on_assets": 8.0}},
          {"symbol": "BBB", "sector": "Technology", "date": "2026-02-20",
           "metrics": {"pe_ratio_ttm": 5.0, "return_on_assets": 4.0}}
        ]"#,
    )
    .expect("write import file");

    // When: it is imported and one symbol is shown
    let imported = stockrank(&db, &["import", file.to_str().expect("utf-8 path")]);
    let shown = stockrank(&db, &["show", "AAA"]);

    // Then: both rows were written and ranked
    assert!(imported.status.success(), "{}", String::from_utf8_lossy(&imported.stderr));
    let imported = envelope(&imported);
    assert_eq!(imported["data"]["import"]["inserted"], 2);
    assert_eq!(imported["data"]["ranking"]["ranked_rows"], 2);

    assert!(shown.status.success());
    let shown = envelope(&shown);
    assert_eq!(shown["data"]["snapshot"]["symbol"], "AAA");
    assert_eq!(shown["data"]["ranks"]["rank_pe_ratio_ttm"], 2);
    assert_eq!(shown["data"]["ranks"]["rank_return_on_assets"], 1);

    // And: an unknown symbol is not found
    let missing = stockrank(&db, &["show", "ZZZ"]);
    assert_eq!(missing.status.code(), Some(4));
}

#[test]
fn strategies_are_listed_in_registry_order() {
    let temp = tempdir().expect("tempdir");
    let db = temp.path().join("warehouse.duckdb");

    let output = stockrank(&db, &["strategies"]);

    assert!(output.status.success());
    let body = envelope(&output);
    let keys = body["data"]["strategies"]
        .as_array()
        .expect("strategies array")
        .iter()
        .map(|strategy| strategy["key"].as_str().expect("key").to_owned())
        .collect::<Vec<_>>();
    assert_eq!(keys.len(), 10);
    assert_eq!(keys[0], "magic_formula_trailing");
    assert!(keys.contains(&String::from("peg_ratio")));
}

#[test]
fn user_can_browse_companies_by_sector_and_name() {
    // Given: the sample dataset
    let temp = tempdir().expect("tempdir");
    let db = temp.path().join("warehouse.duckdb");
    let seeded = stockrank(&db, &["seed", "--date", "2026-02-20", "--no-rank"]);
    assert!(seeded.status.success(), "{}", String::from_utf8_lossy(&seeded.stderr));
    let symbols = |output: &Output| {
        envelope(output)["data"]["companies"]
            .as_array()
            .expect("companies array")
            .iter()
            .map(|company| company["symbol"].as_str().expect("symbol").to_owned())
            .collect::<Vec<_>>()
    };

    // When: they page through one sector and search by name
    let energy = stockrank(&db, &["companies", "--sector", "Energy", "--skip", "1", "--limit", "2"]);
    let searched = stockrank(&db, &["companies", "--search", "ENERGY"]);

    // Then: the sector page is ordered by symbol and the search matches names
    assert!(energy.status.success());
    assert_eq!(envelope(&energy)["meta"]["command"], "companies");
    assert_eq!(symbols(&energy), vec!["CVX", "EOG"]);
    assert!(searched.status.success());
    assert_eq!(symbols(&searched), vec!["DUK", "NEE"]);

    // And: a zero limit is a validation error
    let zero = stockrank(&db, &["companies", "--limit", "0"]);
    assert_eq!(zero.status.code(), Some(2));
}
