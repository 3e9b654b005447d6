use ::duckdb::{params, Connection};

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_snapshot_tables",
        sql: r#"
CREATE TABLE IF NOT EXISTS companies (
    symbol TEXT PRIMARY KEY,
    name TEXT,
    sector TEXT,
    industry TEXT,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS metric_snapshots (
    symbol TEXT NOT NULL,
    date DATE NOT NULL,
    ask DOUBLE,
    book_value DOUBLE,
    market_cap DOUBLE,
    ebitda DOUBLE,
    pe_ratio_ttm DOUBLE,
    pe_ratio_ftm DOUBLE,
    peg_ratio DOUBLE,
    garp_ratio DOUBLE,
    eps_estimate_qtr DOUBLE,
    eps_estimate_current_year DOUBLE,
    eps_estimate_next_year DOUBLE,
    eps_estimate_next_quarter DOUBLE,
    return_on_assets DOUBLE,
    return_on_equity DOUBLE,
    dividend_yield DOUBLE,
    net_income DOUBLE,
    total_assets DOUBLE,
    change_year_low_per DOUBLE,
    change_year_high_per DOUBLE,
    one_yr_target_price DOUBLE,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY(symbol, date)
);

-- Replaced wholesale per date by each ranking pass; (symbol, date) uniqueness
-- is enforced by the writer.
CREATE TABLE IF NOT EXISTS snapshot_ranks (
    symbol TEXT NOT NULL CHECK (length(symbol) > 0),
    date DATE NOT NULL,
    rank_ebitda BIGINT,
    rank_pe_ratio_ttm BIGINT,
    rank_pe_ratio_ftm BIGINT,
    rank_peg_ratio BIGINT,
    rank_garp_ratio BIGINT,
    rank_return_on_assets BIGINT,
    rank_return_on_equity BIGINT,
    rank_dividend_yield BIGINT,
    rank_magic_formula_trailing BIGINT,
    rank_magic_formula_future BIGINT,
    magic_formula_trailing BIGINT,
    magic_formula_future BIGINT,
    computed_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    },
    Migration {
        version: "0002_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_metric_snapshots_date ON metric_snapshots(date);
CREATE INDEX IF NOT EXISTS idx_snapshot_ranks_date ON snapshot_ranks(date);
"#,
    },
    Migration {
        version: "0003_snapshot_versions",
        sql: r#"
-- Bumped by every snapshot write; a rank replacement names the version it ranked.
CREATE TABLE IF NOT EXISTS snapshot_versions (
    date DATE PRIMARY KEY,
    version BIGINT NOT NULL
);
"#,
    },
];

pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            params![migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                params![migration.version],
            )?;
        }
    }

    Ok(())
}
