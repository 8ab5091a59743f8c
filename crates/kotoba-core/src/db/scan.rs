//! Exact-match index scans used by the bulk query engine
//!
//! Two interchangeable strategies: one materializes every row of a key range
//! in a single call, the other walks a forward cursor row by row. The store
//! picks one at initialization; both feed the same [`RowSink`].

use crate::config::ScanStrategyConfig;
use crate::error::Result;
use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, Row, Statement, ToSql};

/// Key of an exact-match range scan
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScanKey {
    Text(String),
    Integer(i64),
}

impl ToSql for ScanKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            ScanKey::Text(s) => s.to_sql(),
            ScanKey::Integer(i) => i.to_sql(),
        }
    }
}

impl From<&str> for ScanKey {
    fn from(value: &str) -> Self {
        ScanKey::Text(value.to_string())
    }
}

impl From<&String> for ScanKey {
    fn from(value: &String) -> Self {
        ScanKey::Text(value.clone())
    }
}

impl From<i64> for ScanKey {
    fn from(value: i64) -> Self {
        ScanKey::Integer(value)
    }
}

/// Receives the rows of one scan
pub trait RowSink {
    /// Decode and buffer one row
    fn push(&mut self, row: &Row<'_>) -> rusqlite::Result<()>;

    /// Hand everything buffered so far to the consumer
    fn flush(&mut self) -> Result<()>;
}

/// Strategy for enumerating the rows of one exact-match range
pub trait ScanStrategy: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Run `stmt` (a `WHERE <column> = ?1` select) for `key`, feeding every row to `sink`
    fn scan(&self, stmt: &mut Statement<'_>, key: &ScanKey, sink: &mut dyn RowSink) -> Result<()>;
}

/// Retrieve the whole range as one collection, then deliver it at once
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchAllScan;

impl ScanStrategy for FetchAllScan {
    fn name(&self) -> &'static str {
        "fetch_all"
    }

    fn scan(&self, stmt: &mut Statement<'_>, key: &ScanKey, sink: &mut dyn RowSink) -> Result<()> {
        {
            let rows = stmt.query_map([key], |row| sink.push(row))?;
            for row in rows {
                row?;
            }
        }
        sink.flush()
    }
}

/// Walk a forward cursor, delivering each row as soon as it is read
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorScan;

impl ScanStrategy for CursorScan {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn scan(&self, stmt: &mut Statement<'_>, key: &ScanKey, sink: &mut dyn RowSink) -> Result<()> {
        let mut rows = stmt.query([key])?;
        while let Some(row) = rows.next()? {
            sink.push(row)?;
            sink.flush()?;
        }
        Ok(())
    }
}

/// Indexed columns the bulk engine scans, as (table, column)
pub(crate) const SCANNED_INDICES: [(&str, &str); 6] = [
    ("terms", "expression"),
    ("terms", "reading"),
    ("terms", "sequence"),
    ("term_meta", "expression"),
    ("kanji", "character"),
    ("kanji_meta", "character"),
];

/// Whether the planner serves `WHERE column = ?` on every scanned column
/// straight from an index, so a key range can be fetched as one collection.
pub(crate) fn supports_range_fetch(conn: &Connection) -> Result<bool> {
    for (table, column) in SCANNED_INDICES {
        let sql = format!(
            "EXPLAIN QUERY PLAN SELECT id FROM {} WHERE {} = ?1",
            table, column
        );
        let mut stmt = conn.prepare(&sql)?;
        let details = stmt
            .query_map([ScanKey::Text(String::new())], |row| row.get::<_, String>(3))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if !details.iter().any(|d| d.starts_with("SEARCH")) {
            tracing::debug!(table, column, ?details, "Column is not index-backed");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Choose the scan strategy once for the lifetime of a handle
pub(crate) fn select_strategy(
    conn: &Connection,
    configured: ScanStrategyConfig,
) -> Result<Box<dyn ScanStrategy>> {
    Ok(match configured {
        ScanStrategyConfig::FetchAll => Box::new(FetchAllScan),
        ScanStrategyConfig::Cursor => Box::new(CursorScan),
        ScanStrategyConfig::Auto => {
            if supports_range_fetch(conn)? {
                Box::new(FetchAllScan)
            } else {
                Box::new(CursorScan)
            }
        }
    })
}
