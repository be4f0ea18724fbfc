use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use crate::error::SynthError;
use crate::schema::{files, format};

/// The three datasets a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Products,
    ReadEvents,
    LocationPerformance,
}

impl Table {
    pub fn file_name(self) -> &'static str {
        match self {
            Table::Products => files::PRODUCTS,
            Table::ReadEvents => files::READ_EVENTS,
            Table::LocationPerformance => files::LOCATION_PERFORMANCE,
        }
    }
}

/// Receives finished rows. The first batch for a table within a run starts
/// it; later batches append to it.
pub trait RecordSink {
    /// Forget tables written by an earlier run so the next batches replace them.
    fn begin_run(&mut self) -> Result<(), SynthError> {
        Ok(())
    }

    fn write_batch(&mut self, table: Table, frame: &mut DataFrame) -> Result<(), SynthError>;
}

// ── CSV ─────────────────────────────────────────────────────────────────────

/// Writes one CSV file per table into a directory.
pub struct CsvSink {
    dir: PathBuf,
    started: HashSet<Table>,
}

impl CsvSink {
    /// Creates `dir` (and parents) if missing.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SynthError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            started: HashSet::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }
}

impl RecordSink for CsvSink {
    fn begin_run(&mut self) -> Result<(), SynthError> {
        self.started.clear();
        Ok(())
    }

    fn write_batch(&mut self, table: Table, frame: &mut DataFrame) -> Result<(), SynthError> {
        let path = self.path_of(table);
        let first = self.started.insert(table);
        let file = if first {
            File::create(&path)?
        } else {
            OpenOptions::new().append(true).open(&path)?
        };

        debug!(path = %path.display(), rows = frame.height(), header = first, "writing batch");
        let mut writer = BufWriter::new(file);
        CsvWriter::new(&mut writer)
            .include_header(first)
            .with_datetime_format(Some(format::DATE_TIME.into()))
            .with_date_format(Some(format::DATE.into()))
            .finish(frame)?;
        writer.flush()?;
        Ok(())
    }
}

// ── In-memory ───────────────────────────────────────────────────────────────

/// Keeps every table as a `DataFrame`.
#[derive(Default)]
pub struct MemorySink {
    frames: HashMap<Table, DataFrame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, table: Table) -> Option<&DataFrame> {
        self.frames.get(&table)
    }

    pub fn take(&mut self, table: Table) -> Option<DataFrame> {
        self.frames.remove(&table)
    }
}

impl RecordSink for MemorySink {
    fn begin_run(&mut self) -> Result<(), SynthError> {
        self.frames.clear();
        Ok(())
    }

    fn write_batch(&mut self, table: Table, frame: &mut DataFrame) -> Result<(), SynthError> {
        match self.frames.get_mut(&table) {
            Some(existing) => {
                existing.vstack_mut(frame)?;
            }
            None => {
                self.frames.insert(table, frame.clone());
            }
        }
        Ok(())
    }
}
