// crates/huaweicm-rs/src/lib.rs

//! Converts Huawei CM NBI bulk configuration XML dumps into one flat CSV
//! file per managed-object type.
//!
//! The column set of a managed-object type is only known after every
//! instance of that type has been seen, so conversion is a strict two-pass
//! protocol over the same input set:
//!
//! 1. a schema-discovery pass builds the per-type column lists
//!    ([`RegistryBuilder`] -> [`ColumnRegistry`]);
//! 2. a value-extraction pass re-reads the files and emits one header and
//!    one data row per `<moi>` instance, aligned to the sealed registry.
//!
//! [`Converter`] drives both passes; [`ColumnRegistry::from_parameter_file`]
//! can pre-build the registry and skip discovery.

// --- Crate Modules ---

mod columns;
mod context;
mod converter;
mod csv;
mod error;
mod parser;
mod sink;

// --- Public API Re-exports ---

pub use columns::{ColumnRegistry, ColumnSet, RegistryBuilder};
pub use converter::{Converter, ParserState};
pub use csv::escape_field;
pub use error::CmError;
pub use sink::{DirSinkSet, NullSink, TableSink};
