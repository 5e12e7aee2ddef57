// crates/huaweicm-rs/src/columns.rs

//! Per managed-object-type column tracking.
//!
//! The column set of a type is only known once every instance of that type
//! has been seen, so the registry is built in two phases: a mutable
//! [`RegistryBuilder`] fed by the schema-discovery pass, and an immutable
//! [`ColumnRegistry`] snapshot consumed read-only by the value-extraction
//! pass.

use crate::error::CmError;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An ordered, de-duplicated sequence of parameter names.
///
/// Insertion order is first-seen order, which becomes the column order of
/// the type's CSV file.
#[derive(Debug, Default)]
pub struct ColumnSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ColumnSet {
    /// Appends `name` unless it is already present.
    pub fn insert(&mut self, name: &str) {
        if !self.seen.contains(name) {
            self.seen.insert(name.to_string());
            self.order.push(name.to_string());
        }
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Mutable, discovery-phase side of the column registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: BTreeMap<String, ColumnSet>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one managed-object instance: ensures a column list exists for
    /// `mo_type` and appends every parameter name not yet in it.
    pub fn note_instance<'a>(&mut self, mo_type: &str, params: impl Iterator<Item = &'a str>) {
        let columns = self.types.entry(mo_type.to_string()).or_default();
        for name in params {
            columns.insert(name);
        }
    }

    /// Seals the builder into the immutable registry used by extraction.
    pub fn finish(self) -> ColumnRegistry {
        ColumnRegistry {
            types: self
                .types
                .into_iter()
                .map(|(t, set)| (t, set.order))
                .collect(),
        }
    }
}

/// Immutable mapping from managed-object type to its ordered column list.
///
/// Never mutated during extraction: a parameter appearing in an instance
/// but absent from its type's list is silently dropped, keeping the CSV
/// header fixed.
#[derive(Debug, Default, Clone)]
pub struct ColumnRegistry {
    types: BTreeMap<String, Vec<String>>,
}

impl ColumnRegistry {
    /// The ordered column list for `mo_type`, if the type was discovered.
    pub fn columns(&self, mo_type: &str) -> Option<&[String]> {
        self.types.get(mo_type).map(Vec::as_slice)
    }

    /// Iterates `(type, columns)` pairs in type-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.types.iter().map(|(t, c)| (t.as_str(), c.as_slice()))
    }

    /// Loads a pre-built registry from a parameter selection file with lines
    /// of the form `TYPE:param1,param2,...`, bypassing the discovery pass
    /// for the listed types. Blank lines are skipped.
    pub fn from_parameter_file(path: &Path) -> Result<Self, CmError> {
        let reader = BufReader::new(File::open(path)?);
        let mut builder = RegistryBuilder::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (mo_type, params) = line
                .split_once(':')
                .ok_or(CmError::InvalidParameterConfig { line: idx + 1 })?;
            let mo_type = mo_type.trim();
            if mo_type.is_empty() {
                return Err(CmError::InvalidParameterConfig { line: idx + 1 });
            }
            builder.note_instance(
                mo_type,
                params.split(',').map(str::trim).filter(|p| !p.is_empty()),
            );
        }

        Ok(builder.finish())
    }
}
