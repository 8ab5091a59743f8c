//! Bulk query engine
//!
//! A bulk query issues one exact-match scan per (key, index) pair. Scans run on
//! scoped worker threads, each with its own read-only connection, and report
//! candidate rows over a channel. The calling thread is the only owner of the
//! visited set: the first report of a record id wins, later reports of the
//! same id are dropped.

use super::rows::StoredRecord;
use super::scan::{RowSink, ScanKey, ScanStrategy};
use super::Database;
use crate::error::{KotobaError, Result};
use crate::model::{Indexed, KanjiEntry, KanjiMetaEntry, TermEntry, TermMetaEntry};
use crate::trace_time;
use rusqlite::{Connection, OpenFlags, Row};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// One exact-match scan: `column = key`, reported against `key_index`
#[derive(Debug)]
struct ScanTask<'a> {
    key_index: usize,
    column: &'static str,
    key: &'a ScanKey,
}

/// What a worker reports to the coordinator
enum ScanMessage<R> {
    Candidates(Vec<(usize, R)>),
    Failed(KotobaError),
}

/// Buffers accepted rows of one scan and forwards them on flush
struct ChannelSink<'a, R, F> {
    key_index: usize,
    accept: &'a F,
    buffer: Vec<(usize, R)>,
    tx: &'a Sender<ScanMessage<R>>,
}

impl<R, F> RowSink for ChannelSink<'_, R, F>
where
    R: StoredRecord,
    F: Fn(&R, usize) -> bool,
{
    fn push(&mut self, row: &Row<'_>) -> rusqlite::Result<()> {
        let record = R::from_row(row)?;
        if (self.accept)(&record, self.key_index) {
            self.buffer.push((self.key_index, record));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.buffer);
        self.tx
            .send(ScanMessage::Candidates(batch))
            .map_err(|_| KotobaError::Other("bulk query coordinator stopped".to_string()))
    }
}

fn open_reader(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| {
        KotobaError::Other(format!(
            "failed to open reader for {}: {}",
            path.display(),
            e
        ))
    })?;
    conn.busy_timeout(busy_timeout)?;
    Ok(conn)
}

/// Run a worker's share of the scans on one reader connection
fn run_worker<R, F>(
    path: &Path,
    busy_timeout: Duration,
    strategy: &dyn ScanStrategy,
    tasks: &[&ScanTask<'_>],
    accept: &F,
    tx: &Sender<ScanMessage<R>>,
) -> Result<()>
where
    R: StoredRecord,
    F: Fn(&R, usize) -> bool,
{
    let conn = open_reader(path, busy_timeout)?;
    let mut statements = HashMap::new();

    for task in tasks {
        if !statements.contains_key(task.column) {
            let stmt = conn.prepare(&R::select_by(task.column))?;
            statements.insert(task.column, stmt);
        }
        let stmt = statements
            .get_mut(task.column)
            .ok_or_else(|| KotobaError::Other(format!("no statement for {}", task.column)))?;

        let mut sink = ChannelSink {
            key_index: task.key_index,
            accept,
            buffer: Vec::new(),
            tx,
        };
        strategy.scan(stmt, task.key, &mut sink)?;
    }

    Ok(())
}

impl Database {
    /// Scan `columns` of `R`'s table for every key and join the results.
    ///
    /// `accept` sees each candidate with the position of the key that found it;
    /// rejected rows are never marked visited. Any failing scan fails the whole
    /// query.
    pub(crate) fn bulk_scan<R, F>(
        &self,
        columns: &[&'static str],
        keys: &[ScanKey],
        accept: F,
    ) -> Result<Vec<R>>
    where
        R: StoredRecord + Indexed,
        F: Fn(&R, usize) -> bool + Sync,
    {
        let handle = self.handle()?;
        if keys.is_empty() || columns.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let tasks: Vec<ScanTask<'_>> = keys
            .iter()
            .enumerate()
            .flat_map(|(key_index, key)| {
                columns.iter().map(move |&column| ScanTask {
                    key_index,
                    column,
                    key,
                })
            })
            .collect();

        let workers = self.config.scan_workers.clamp(1, tasks.len());
        let strategy = handle.scan.as_ref();
        let busy_timeout = Duration::from_millis(self.config.busy_timeout_ms);
        let path = self.path.as_path();
        let accept = &accept;

        let (tx, rx) = mpsc::channel::<ScanMessage<R>>();

        let (results, failure) = thread::scope(|scope| {
            for worker in 0..workers {
                let share: Vec<&ScanTask<'_>> =
                    tasks.iter().skip(worker).step_by(workers).collect();
                let tx = tx.clone();
                scope.spawn(move || {
                    if let Err(e) = run_worker(path, busy_timeout, strategy, &share, accept, &tx) {
                        let _ = tx.send(ScanMessage::Failed(e));
                    }
                });
            }
            drop(tx);

            let mut visited: HashSet<i64> = HashSet::new();
            let mut results = Vec::new();
            let mut failure = None;

            for message in rx {
                match message {
                    ScanMessage::Candidates(batch) => {
                        for (key_index, mut record) in batch {
                            if visited.insert(record.id()) {
                                record.set_index(key_index);
                                results.push(record);
                            }
                        }
                    }
                    ScanMessage::Failed(e) => {
                        failure.get_or_insert(e);
                    }
                }
            }

            (results, failure)
        });

        trace_time!(
            start,
            "bulk_scan",
            table = R::TABLE,
            scans = tasks.len(),
            workers = workers
        );

        match failure {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }

    /// Terms whose expression or reading equals one of `terms`
    pub fn find_terms_bulk(
        &self,
        terms: &[String],
        titles: &HashSet<String>,
    ) -> Result<Vec<TermEntry>> {
        let keys: Vec<ScanKey> = terms.iter().map(ScanKey::from).collect();
        self.bulk_scan(&["expression", "reading"], &keys, |row: &TermEntry, _| {
            titles.contains(&row.dictionary)
        })
    }

    /// Terms whose expression equals `terms[i]` and reading equals `readings[i]`
    pub fn find_terms_exact_bulk(
        &self,
        terms: &[String],
        readings: &[String],
        titles: &HashSet<String>,
    ) -> Result<Vec<TermEntry>> {
        if terms.len() != readings.len() {
            return Err(KotobaError::invalid_value(
                "reading list",
                format!("{} readings for {} terms", readings.len(), terms.len()),
            ));
        }
        let keys: Vec<ScanKey> = terms.iter().map(ScanKey::from).collect();
        self.bulk_scan(&["expression"], &keys, |row: &TermEntry, i| {
            row.reading == readings[i] && titles.contains(&row.dictionary)
        })
    }

    /// Terms of `main_dictionary` carrying one of `sequences`
    pub fn find_terms_by_sequence_bulk(
        &self,
        sequences: &[i64],
        main_dictionary: &str,
    ) -> Result<Vec<TermEntry>> {
        let keys: Vec<ScanKey> = sequences.iter().copied().map(ScanKey::from).collect();
        self.bulk_scan(&["sequence"], &keys, |row: &TermEntry, _| {
            row.dictionary == main_dictionary
        })
    }

    pub fn find_term_meta_bulk(
        &self,
        terms: &[String],
        titles: &HashSet<String>,
    ) -> Result<Vec<TermMetaEntry>> {
        let keys: Vec<ScanKey> = terms.iter().map(ScanKey::from).collect();
        self.bulk_scan(&["expression"], &keys, |row: &TermMetaEntry, _| {
            titles.contains(&row.dictionary)
        })
    }

    pub fn find_kanji_bulk(
        &self,
        characters: &[String],
        titles: &HashSet<String>,
    ) -> Result<Vec<KanjiEntry>> {
        let keys: Vec<ScanKey> = characters.iter().map(ScanKey::from).collect();
        self.bulk_scan(&["character"], &keys, |row: &KanjiEntry, _| {
            titles.contains(&row.dictionary)
        })
    }

    pub fn find_kanji_meta_bulk(
        &self,
        characters: &[String],
        titles: &HashSet<String>,
    ) -> Result<Vec<KanjiMetaEntry>> {
        let keys: Vec<ScanKey> = characters.iter().map(ScanKey::from).collect();
        self.bulk_scan(&["character"], &keys, |row: &KanjiMetaEntry, _| {
            titles.contains(&row.dictionary)
        })
    }
}
