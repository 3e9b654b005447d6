//! DuckDB-backed record store for stockrank.
//!
//! Holds three tables: `companies` (identity), `metric_snapshots` (raw dated
//! metrics, one row per symbol and date) and `snapshot_ranks` (results of the
//! last ranking pass per date), plus `snapshot_versions`, a per-date write
//! counter that rank replacements are checked against. Every multi-row write
//! runs inside a single transaction so readers see either the previous state
//! or the new one.

mod error;
pub mod migrations;
pub mod pool;
pub mod records;

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::ToSql;
use ::duckdb::{params, params_from_iter, Connection, OptionalExt, Row};
use tracing::debug;

pub use error::WarehouseError;
pub use pool::{ConnectionPool, PooledConnection};
pub use records::{
    CompanyQuery, CompanyRecord, MetricValues, RankRecord, RankValues, RankedQuery, RankedRecord,
    SectorSnapshotRecord, SnapshotBatch, SnapshotRecord, SnapshotUpsert, UpsertOutcome,
    COMPOSITE_COLUMNS, METRIC_COLUMNS, RANK_COLUMNS,
};

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub home: PathBuf,
    pub db_path: PathBuf,
    pub max_pool_size: usize,
}

impl WarehouseConfig {
    /// Configuration for an explicit database file.
    pub fn at(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        let home = db_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            home,
            db_path,
            max_pool_size: 4,
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let home = resolve_home();
        let db_path = home.join("warehouse.duckdb");
        Self {
            home,
            db_path,
            max_pool_size: 4,
        }
    }
}

#[derive(Clone)]
pub struct Warehouse {
    pool: ConnectionPool,
}

impl Warehouse {
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool = ConnectionPool::open(config.db_path.clone(), config.max_pool_size)?;
        let warehouse = Self { pool };
        warehouse.initialize()?;
        debug!(path = %config.db_path.display(), "warehouse opened");
        Ok(warehouse)
    }

    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.pool.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        self.pool.db_path()
    }

    /// Upsert companies and snapshots in one transaction.
    ///
    /// Snapshots are keyed on `(symbol, date)`; an existing row is updated in
    /// place. Ranks stored for every date touched by the batch are cleared in
    /// the same transaction, leaving those dates unranked until the next pass,
    /// and each touched date's version is bumped.
    pub fn upsert_batch(&self, rows: &[SnapshotUpsert]) -> Result<Vec<UpsertOutcome>, WarehouseError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut companies = BTreeMap::new();
        let mut dates = BTreeSet::new();
        for row in rows {
            companies.insert(row.company.symbol.as_str(), &row.company);
            dates.insert(row.snapshot.date.as_str());
        }

        let connection = self.pool.acquire()?;
        connection.in_transaction(|connection| {
            for company in companies.values() {
                upsert_company(connection, company)?;
            }

            let mut outcomes = Vec::with_capacity(rows.len());
            for row in rows {
                outcomes.push(upsert_snapshot(connection, &row.snapshot)?);
            }

            for date in &dates {
                let cleared = connection.execute(
                    "DELETE FROM snapshot_ranks WHERE date = CAST(? AS DATE)",
                    params![date],
                )?;
                if cleared > 0 {
                    debug!(date, cleared, "ranks invalidated by snapshot upsert");
                }
                bump_version(connection, date)?;
            }

            Ok(outcomes)
        })
    }

    pub fn find_company(&self, symbol: &str) -> Result<Option<CompanyRecord>, WarehouseError> {
        let connection = self.pool.acquire()?;
        let company = connection
            .query_row(
                "SELECT symbol, name, sector, industry FROM companies WHERE symbol = ?",
                params![symbol],
                |row| {
                    Ok(CompanyRecord {
                        symbol: row.get(0)?,
                        name: row.get(1)?,
                        sector: row.get(2)?,
                        industry: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(company)
    }

    pub fn find_snapshot(
        &self,
        symbol: &str,
        date: &str,
    ) -> Result<Option<SnapshotRecord>, WarehouseError> {
        let sql = format!(
            "SELECT symbol, CAST(date AS VARCHAR), {columns} FROM metric_snapshots \
             WHERE symbol = ? AND date = CAST(? AS DATE)",
            columns = METRIC_COLUMNS.join(", "),
        );
        let connection = self.pool.acquire()?;
        let snapshot = connection
            .query_row(sql.as_str(), params![symbol, date], |row| {
                Ok(SnapshotRecord {
                    symbol: row.get(0)?,
                    date: row.get(1)?,
                    values: read_metric_values(row, 2)?,
                })
            })
            .optional()?;
        Ok(snapshot)
    }

    /// Most recent date present in `metric_snapshots`.
    pub fn latest_snapshot_date(&self) -> Result<Option<String>, WarehouseError> {
        let connection = self.pool.acquire()?;
        let date = connection.query_row(
            "SELECT CAST(MAX(date) AS VARCHAR) FROM metric_snapshots",
            [],
            |row| row.get(0),
        )?;
        Ok(date)
    }

    /// Most recent date that carries ranking results.
    pub fn latest_ranked_date(&self) -> Result<Option<String>, WarehouseError> {
        let connection = self.pool.acquire()?;
        let date = connection.query_row(
            "SELECT CAST(MAX(date) AS VARCHAR) FROM snapshot_ranks",
            [],
            |row| row.get(0),
        )?;
        Ok(date)
    }

    /// Write version of `date`; 0 when nothing was ever written for it.
    pub fn snapshot_version(&self, date: &str) -> Result<u64, WarehouseError> {
        let connection = self.pool.acquire()?;
        select_version(&connection, date)
    }

    /// The most recent snapshot date with its version and its rows (joined
    /// with the company sector, ordered by symbol), read in one transaction.
    pub fn load_latest_snapshot(&self) -> Result<Option<SnapshotBatch>, WarehouseError> {
        let connection = self.pool.acquire()?;
        connection.in_transaction(|connection| {
            let date: Option<String> = connection.query_row(
                "SELECT CAST(MAX(date) AS VARCHAR) FROM metric_snapshots",
                [],
                |row| row.get(0),
            )?;
            let Some(date) = date else {
                return Ok(None);
            };
            let version = select_version(connection, &date)?;
            let rows = select_snapshot_rows(connection, &date)?;
            Ok(Some(SnapshotBatch {
                date,
                version,
                rows,
            }))
        })
    }

    /// Companies ordered by symbol, filtered and paged by `query`.
    pub fn list_companies(&self, query: &CompanyQuery) -> Result<Vec<CompanyRecord>, WarehouseError> {
        if query.limit == 0 {
            return Err(WarehouseError::QueryRejected(String::from(
                "limit must be greater than zero",
            )));
        }
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        let search = query.search.as_deref().map(str::to_lowercase);

        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(
            r#"
SELECT symbol, name, sector, industry
FROM companies
WHERE (CAST(? AS VARCHAR) IS NULL OR sector = CAST(? AS VARCHAR))
  AND (CAST(? AS VARCHAR) IS NULL
       OR contains(lower(symbol), CAST(? AS VARCHAR))
       OR contains(lower(coalesce(name, '')), CAST(? AS VARCHAR)))
ORDER BY symbol
LIMIT ? OFFSET ?
"#,
        )?;
        let rows = statement.query_map(
            params![
                query.sector,
                query.sector,
                search,
                search,
                search,
                limit,
                offset
            ],
            |row| {
                Ok(CompanyRecord {
                    symbol: row.get(0)?,
                    name: row.get(1)?,
                    sector: row.get(2)?,
                    industry: row.get(3)?,
                })
            },
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Replace every rank row for `date` with `rows`, atomically.
    ///
    /// `expected_version` is the snapshot version the ranks were computed
    /// from. If a write has landed on `date` since, nothing is replaced and
    /// [`WarehouseError::StaleSnapshot`] is returned. On any failure the
    /// transaction is rolled back and the previous ranks stay in place.
    pub fn replace_ranks(
        &self,
        date: &str,
        expected_version: u64,
        rows: &[RankRecord],
    ) -> Result<usize, WarehouseError> {
        let mut seen = BTreeSet::new();
        for row in rows {
            if row.date != date {
                return Err(WarehouseError::QueryRejected(format!(
                    "rank row for {} is dated {}, expected {date}",
                    row.symbol, row.date
                )));
            }
            if !seen.insert(row.symbol.as_str()) {
                return Err(WarehouseError::QueryRejected(format!(
                    "duplicate rank row for {} on {date}",
                    row.symbol
                )));
            }
        }

        let insert_sql = format!(
            "INSERT INTO snapshot_ranks (symbol, date, {ranks}, {composites}, computed_at) \
             VALUES (?, CAST(? AS DATE), {placeholders}, now())",
            ranks = RANK_COLUMNS.join(", "),
            composites = COMPOSITE_COLUMNS.join(", "),
            placeholders = placeholders(RANK_COLUMNS.len() + COMPOSITE_COLUMNS.len()),
        );

        let connection = self.pool.acquire()?;
        let written = connection.in_transaction(|connection| {
            let found = select_version(connection, date)?;
            if found != expected_version {
                return Err(WarehouseError::StaleSnapshot {
                    date: date.to_owned(),
                    expected: expected_version,
                    found,
                });
            }

            let removed = connection.execute(
                "DELETE FROM snapshot_ranks WHERE date = CAST(? AS DATE)",
                params![date],
            )?;
            debug!(date, removed, "previous ranks removed");

            let mut insert = connection.prepare(insert_sql.as_str())?;
            for row in rows {
                let numbers = row
                    .ranks
                    .rank_columns()
                    .into_iter()
                    .chain(row.ranks.composite_columns())
                    .map(|value| value.map(i64::from))
                    .collect::<Vec<_>>();

                let mut values: Vec<&dyn ToSql> = Vec::with_capacity(numbers.len() + 2);
                values.push(&row.symbol);
                values.push(&row.date);
                values.extend(numbers.iter().map(|value| value as &dyn ToSql));
                insert.execute(params_from_iter(values))?;
            }

            Ok(rows.len())
        })?;

        debug!(date, written, "ranks replaced");
        Ok(written)
    }

    /// All rank rows stored for `date`, ordered by symbol.
    pub fn load_ranks(&self, date: &str) -> Result<Vec<RankRecord>, WarehouseError> {
        let sql = format!(
            "SELECT symbol, CAST(date AS VARCHAR), {ranks}, {composites} FROM snapshot_ranks \
             WHERE date = CAST(? AS DATE) ORDER BY symbol",
            ranks = RANK_COLUMNS.join(", "),
            composites = COMPOSITE_COLUMNS.join(", "),
        );
        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement.query_map(params![date], |row| {
            let symbol: String = row.get(0)?;
            let date: String = row.get(1)?;
            let mut numbers = [None; 12];
            for (offset, slot) in numbers.iter_mut().enumerate() {
                *slot = row.get::<_, Option<i64>>(offset + 2)?;
            }
            Ok((symbol, date, numbers))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (symbol, date, numbers) = row?;
            let mut ranks = [None; 10];
            for (slot, (value, column)) in ranks.iter_mut().zip(numbers.iter().zip(RANK_COLUMNS)) {
                *slot = to_rank(*value, column)?;
            }
            let mut composites = [None; 2];
            for (slot, (value, column)) in composites
                .iter_mut()
                .zip(numbers[10..].iter().zip(COMPOSITE_COLUMNS))
            {
                *slot = to_rank(*value, column)?;
            }
            records.push(RankRecord {
                symbol,
                date,
                ranks: RankValues::from_columns(ranks, composites),
            });
        }
        Ok(records)
    }

    /// Leaderboard rows for the most recently ranked date.
    ///
    /// Rows without a positive rank in `query.rank_column` are skipped; the
    /// rest come back in ascending rank order, at most `query.limit` of them.
    pub fn ranked_entries(&self, query: &RankedQuery) -> Result<Vec<RankedRecord>, WarehouseError> {
        if !RANK_COLUMNS.contains(&query.rank_column) {
            return Err(WarehouseError::QueryRejected(format!(
                "unknown rank column '{}'",
                query.rank_column
            )));
        }
        let score = if METRIC_COLUMNS.contains(&query.score_column) {
            format!("m.{}", query.score_column)
        } else if COMPOSITE_COLUMNS.contains(&query.score_column) {
            format!("r.{}", query.score_column)
        } else {
            return Err(WarehouseError::QueryRejected(format!(
                "unknown score column '{}'",
                query.score_column
            )));
        };
        if query.limit == 0 {
            return Err(WarehouseError::QueryRejected(String::from(
                "limit must be greater than zero",
            )));
        }
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let sql = format!(
            r#"
SELECT r.symbol, c.name, r.{rank}, CAST({score} AS DOUBLE),
       m.pe_ratio_ttm, m.pe_ratio_ftm, m.garp_ratio, m.peg_ratio, m.return_on_assets
FROM snapshot_ranks r
JOIN metric_snapshots m ON m.symbol = r.symbol AND m.date = r.date
LEFT JOIN companies c ON c.symbol = r.symbol
WHERE r.date = (SELECT MAX(date) FROM snapshot_ranks)
  AND r.{rank} IS NOT NULL
  AND r.{rank} > 0
ORDER BY r.{rank} ASC, r.symbol ASC
LIMIT ?
"#,
            rank = query.rank_column,
            score = score,
        );

        let connection = self.pool.acquire()?;
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement.query_map(params![limit], |row| {
            let rank: i64 = row.get(2)?;
            Ok((
                rank,
                RankedRecord {
                    symbol: row.get(0)?,
                    name: row.get(1)?,
                    rank: 0,
                    score: row.get(3)?,
                    pe_ratio_ttm: row.get(4)?,
                    pe_ratio_ftm: row.get(5)?,
                    garp_ratio: row.get(6)?,
                    peg_ratio: row.get(7)?,
                    return_on_assets: row.get(8)?,
                },
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (rank, mut record) = row?;
            record.rank = u32::try_from(rank).map_err(|_| {
                WarehouseError::InvalidData(format!(
                    "{} holds out-of-range rank {rank} for {}",
                    query.rank_column, record.symbol
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

fn upsert_company(connection: &Connection, company: &CompanyRecord) -> Result<(), WarehouseError> {
    connection.execute(
        r#"
INSERT INTO companies (symbol, name, sector, industry, updated_at)
VALUES (?, ?, ?, ?, now())
ON CONFLICT (symbol) DO UPDATE SET
    name = COALESCE(EXCLUDED.name, name),
    sector = COALESCE(EXCLUDED.sector, sector),
    industry = COALESCE(EXCLUDED.industry, industry),
    updated_at = now()
"#,
        params![
            company.symbol,
            company.name,
            company.sector,
            company.industry
        ],
    )?;
    Ok(())
}

fn upsert_snapshot(
    connection: &Connection,
    snapshot: &SnapshotRecord,
) -> Result<UpsertOutcome, WarehouseError> {
    let existing: i64 = connection.query_row(
        "SELECT COUNT(*) FROM metric_snapshots WHERE symbol = ? AND date = CAST(? AS DATE)",
        params![snapshot.symbol, snapshot.date],
        |row| row.get(0),
    )?;

    let sql = format!(
        "INSERT INTO metric_snapshots (symbol, date, {columns}, updated_at) \
         VALUES (?, CAST(? AS DATE), {placeholders}, now()) \
         ON CONFLICT (symbol, date) DO UPDATE SET {assignments}, updated_at = now()",
        columns = METRIC_COLUMNS.join(", "),
        placeholders = placeholders(METRIC_COLUMNS.len()),
        assignments = METRIC_COLUMNS
            .iter()
            .map(|column| format!("{column} = EXCLUDED.{column}"))
            .collect::<Vec<_>>()
            .join(", "),
    );

    let metrics = snapshot.values.to_columns();
    let mut values: Vec<&dyn ToSql> = Vec::with_capacity(metrics.len() + 2);
    values.push(&snapshot.symbol);
    values.push(&snapshot.date);
    values.extend(metrics.iter().map(|value| value as &dyn ToSql));
    connection.execute(sql.as_str(), params_from_iter(values))?;

    Ok(if existing == 0 {
        UpsertOutcome::Inserted
    } else {
        UpsertOutcome::Updated
    })
}

fn bump_version(connection: &Connection, date: &str) -> Result<(), WarehouseError> {
    let bumped = connection.execute(
        "UPDATE snapshot_versions SET version = version + 1 WHERE date = CAST(? AS DATE)",
        params![date],
    )?;
    if bumped == 0 {
        connection.execute(
            "INSERT INTO snapshot_versions (date, version) VALUES (CAST(? AS DATE), 1)",
            params![date],
        )?;
    }
    Ok(())
}

fn select_version(connection: &Connection, date: &str) -> Result<u64, WarehouseError> {
    let version: Option<i64> = connection
        .query_row(
            "SELECT version FROM snapshot_versions WHERE date = CAST(? AS DATE)",
            params![date],
            |row| row.get(0),
        )
        .optional()?;
    let version = version.unwrap_or(0);
    u64::try_from(version).map_err(|_| {
        WarehouseError::InvalidData(format!("snapshot version {version} for {date} is negative"))
    })
}

fn select_snapshot_rows(
    connection: &Connection,
    date: &str,
) -> Result<Vec<SectorSnapshotRecord>, WarehouseError> {
    let sql = format!(
        "SELECT m.symbol, CAST(m.date AS VARCHAR), c.sector, {columns} \
         FROM metric_snapshots m LEFT JOIN companies c ON c.symbol = m.symbol \
         WHERE m.date = CAST(? AS DATE) ORDER BY m.symbol",
        columns = qualified(&METRIC_COLUMNS, "m"),
    );
    let mut statement = connection.prepare(sql.as_str())?;
    let rows = statement.query_map(params![date], |row| {
        Ok(SectorSnapshotRecord {
            snapshot: SnapshotRecord {
                symbol: row.get(0)?,
                date: row.get(1)?,
                values: read_metric_values(row, 3)?,
            },
            sector: row.get(2)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

fn read_metric_values(row: &Row<'_>, offset: usize) -> Result<MetricValues, ::duckdb::Error> {
    let mut columns = [None; 20];
    for (index, slot) in columns.iter_mut().enumerate() {
        *slot = row.get(offset + index)?;
    }
    Ok(MetricValues::from_columns(columns))
}

fn to_rank(value: Option<i64>, column: &str) -> Result<Option<u32>, WarehouseError> {
    value
        .map(|value| {
            u32::try_from(value).map_err(|_| {
                WarehouseError::InvalidData(format!("{column} holds out-of-range value {value}"))
            })
        })
        .transpose()
}

fn qualified(columns: &[&str], alias: &str) -> String {
    columns
        .iter()
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn resolve_home() -> PathBuf {
    if let Some(path) = env::var_os("STOCKRANK_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".stockrank");
    }

    PathBuf::from(".stockrank")
}
