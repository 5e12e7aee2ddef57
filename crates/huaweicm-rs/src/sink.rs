// crates/huaweicm-rs/src/sink.rs

//! Output tables as an opaque, append-only line sink.

use crate::error::CmError;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// A set of named, append-only CSV tables.
///
/// Implementations must guarantee at most one underlying sink per table
/// name for the lifetime of a run, created lazily on the first line.
pub trait TableSink {
    /// Appends one line (without terminator) to `table`, creating the
    /// table on first use.
    fn write_line(&mut self, table: &str, line: &str) -> Result<(), CmError>;

    /// True if `table` has been created already.
    fn has_table(&self, table: &str) -> bool;

    /// Flushes and closes every open table exactly once and clears the
    /// internal registry.
    fn close_all(&mut self) -> Result<(), CmError>;
}

/// [`TableSink`] writing one `<table>.csv` file per table into a directory.
#[derive(Debug)]
pub struct DirSinkSet {
    dir: PathBuf,
    writers: BTreeMap<String, BufWriter<File>>,
}

impl DirSinkSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writers: BTreeMap::new(),
        }
    }
}

impl TableSink for DirSinkSet {
    fn write_line(&mut self, table: &str, line: &str) -> Result<(), CmError> {
        let writer = match self.writers.entry(table.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let path = self.dir.join(format!("{}.csv", table));
                e.insert(BufWriter::new(File::create(&path)?))
            }
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn has_table(&self, table: &str) -> bool {
        self.writers.contains_key(table)
    }

    fn close_all(&mut self) -> Result<(), CmError> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        self.writers.clear();
        Ok(())
    }
}

/// [`TableSink`] that discards everything. Used when only the discovered
/// parameter schema is wanted and no CSV output directory exists.
#[derive(Debug, Default)]
pub struct NullSink;

impl TableSink for NullSink {
    fn write_line(&mut self, _table: &str, _line: &str) -> Result<(), CmError> {
        Ok(())
    }

    fn has_table(&self, _table: &str) -> bool {
        false
    }

    fn close_all(&mut self) -> Result<(), CmError> {
        Ok(())
    }
}
