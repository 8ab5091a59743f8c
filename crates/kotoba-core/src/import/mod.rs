//! Dictionary package importer
//!
//! An import registers the dictionary summary first, then streams every bank
//! into the store in fixed-size chunks. Validation failures abort before
//! anything is written; chunk failures either abort the import or are
//! collected, at the caller's choice.

pub mod archive;
pub mod banks;
pub mod index;


use crate::db::{Database, InsertRecord};
use crate::error::{KotobaError, Result};
use crate::model::DictionarySummary;
use crate::trace_time;
use archive::DictionaryArchive;
use banks::{decode_bank, BankKind, BankRecords, RowLayout};
use index::{DictionaryIndex, INDEX_FILE};
use serde::Serialize;
use std::io::{Read, Seek};
use std::time::Instant;

/// Bank-level progress of an import
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImportProgress {
    /// Banks in the package, fixed for the whole import
    pub total: usize,
    /// Banks loaded so far, fractional while a bank is being chunked
    pub current: f64,
}

/// Outcome of a continue-on-error import
#[derive(Debug)]
pub struct ImportResult {
    pub summary: DictionarySummary,
    /// Chunk failures collected along the way; non-empty means partial success
    pub errors: Vec<KotobaError>,
}

impl ImportResult {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Imports dictionary packages into a [`Database`]
#[derive(Debug, Clone, Copy)]
pub struct DictionaryImporter<'db> {
    db: &'db Database,
    chunk_size: usize,
}

/// State of one running import
struct ImportRun<'db, 'p, 'e> {
    db: &'db Database,
    chunk_size: usize,
    total: usize,
    loaded: usize,
    chunks: usize,
    progress: Option<&'p mut dyn FnMut(ImportProgress)>,
    errors: Option<&'e mut Vec<KotobaError>>,
}

impl ImportRun<'_, '_, '_> {
    fn report(&mut self, current: f64) {
        let update = ImportProgress {
            total: self.total,
            current,
        };
        if let Some(cb) = self.progress.as_mut() {
            cb(update);
        }
    }

    /// Insert one bank's records chunk by chunk, then count the bank as loaded
    fn insert_bank<R: InsertRecord>(&mut self, records: &[R]) -> Result<()> {
        let base = self.loaded as f64;
        let len = records.len();

        if len == 0 {
            self.loaded += 1;
            self.report(self.loaded as f64);
            return Ok(());
        }

        let mut inserted = 0;
        for chunk in records.chunks(self.chunk_size) {
            let chunk_no = self.chunks;
            self.chunks += 1;

            if let Err(e) = self.db.bulk_add(chunk) {
                let failure = KotobaError::ChunkInsertFailure {
                    table: R::TABLE.to_string(),
                    chunk: chunk_no,
                    reason: e.to_string(),
                };
                match self.errors.as_mut() {
                    Some(errors) => {
                        tracing::warn!(table = R::TABLE, chunk = chunk_no, error = %e, "Chunk insert failed, continuing");
                        errors.push(failure);
                    }
                    None => return Err(failure),
                }
            }

            inserted += chunk.len();
            self.report(base + inserted as f64 / len as f64);
        }

        self.loaded += 1;
        Ok(())
    }

    fn insert_records(&mut self, records: &BankRecords) -> Result<()> {
        match records {
            BankRecords::Terms(r) => self.insert_bank(r),
            BankRecords::TermMeta(r) => self.insert_bank(r),
            BankRecords::Kanji(r) => self.insert_bank(r),
            BankRecords::KanjiMeta(r) => self.insert_bank(r),
            BankRecords::Tags(r) => self.insert_bank(r),
        }
    }
}

impl<'db> DictionaryImporter<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            db,
            chunk_size: db.config().chunk_size,
        }
    }

    /// Override the records-per-chunk setting (minimum 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Import a package, collecting chunk failures or stopping at the first one.
    pub fn import_dictionary<R: Read + Seek>(
        &self,
        reader: R,
        progress: Option<&mut dyn FnMut(ImportProgress)>,
        collect_errors: bool,
    ) -> Result<ImportResult> {
        let mut errors = Vec::new();
        let sink = if collect_errors { Some(&mut errors) } else { None };
        let summary = self.import(reader, progress, sink)?;
        Ok(ImportResult { summary, errors })
    }

    /// Import a package.
    ///
    /// Chunk failures are pushed onto `errors` when it is given; without it the
    /// first failure ends the import, leaving the summary and the chunks
    /// committed so far in place.
    #[tracing::instrument(skip_all)]
    pub fn import<R: Read + Seek>(
        &self,
        reader: R,
        progress: Option<&mut dyn FnMut(ImportProgress)>,
        errors: Option<&mut Vec<KotobaError>>,
    ) -> Result<DictionarySummary> {
        let start = Instant::now();
        if !self.db.is_initialized() {
            return Err(KotobaError::NotInitialized);
        }

        let mut archive = DictionaryArchive::new(reader)?;
        if !archive.contains(INDEX_FILE) {
            return Err(KotobaError::MissingIndex);
        }
        let index = DictionaryIndex::parse(&archive.read_to_string(INDEX_FILE)?)?;
        let summary = index.summary()?;

        self.db.register_dictionary(&summary)?;
        tracing::info!(title = %summary.title, version = summary.version, "Importing dictionary");

        let bank_counts: Vec<(BankKind, usize)> = BankKind::ALL
            .iter()
            .map(|&kind| {
                let count = (0..)
                    .take_while(|&i| archive.contains(&kind.file_name(i)))
                    .count();
                (kind, count)
            })
            .collect();

        let inline_tags = index.inline_tags(&summary.title);
        let total = bank_counts.iter().map(|(_, count)| count).sum::<usize>()
            + usize::from(inline_tags.is_some());

        let mut run = ImportRun {
            db: self.db,
            chunk_size: self.chunk_size,
            total,
            loaded: 0,
            chunks: 0,
            progress,
            errors,
        };

        if let Some(tags) = inline_tags {
            run.insert_bank(&tags)?;
        }

        let layout = RowLayout::for_version(summary.version);
        for (kind, count) in bank_counts {
            for i in 0..count {
                let file = kind.file_name(i);
                let content = archive.read_to_string(&file)?;
                let records = decode_bank(kind, layout, &file, &content, &summary.title)?;
                tracing::debug!(file = %file, rows = records.len(), "Loaded bank");
                run.insert_records(&records)?;
            }
        }

        trace_time!(start, "import", banks = total, chunks = run.chunks);
        tracing::info!(title = %summary.title, banks = total, chunks = run.chunks, "Import finished");
        Ok(summary)
    }
}
