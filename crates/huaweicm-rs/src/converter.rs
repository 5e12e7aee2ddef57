// crates/huaweicm-rs/src/converter.rs

//! The conversion driver: discovery pass, then extraction pass, then close.

use crate::columns::{ColumnRegistry, RegistryBuilder};
use crate::context::ParseContext;
use crate::error::CmError;
use crate::parser::{PassState, parse_file};
use crate::sink::{DirSinkSet, NullSink, TableSink};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Driver states, entered strictly in order. A pre-built column registry is
/// the one legitimate shortcut: it starts the driver in `ExtractingValues`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    DiscoveringSchema,
    ExtractingValues,
    Done,
}

/// Converts one XML file, or every file in a directory, into per-type CSV
/// tables.
///
/// The same converter instance carries the element context across files and
/// passes, so NE and module attribute values deliberately persist until
/// overwritten.
#[derive(Debug)]
pub struct Converter {
    input: PathBuf,
    registry: Option<ColumnRegistry>,
    state: ParserState,
    ctx: ParseContext,
}

impl Converter {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            registry: None,
            state: ParserState::DiscoveringSchema,
            ctx: ParseContext::new(),
        }
    }

    /// Supplies a pre-built column registry (e.g. from a parameter selection
    /// file) and skips the schema-discovery pass.
    pub fn with_registry(mut self, registry: ColumnRegistry) -> Self {
        self.registry = Some(registry);
        self.state = ParserState::ExtractingValues;
        self
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Runs both passes over the input set and writes the CSV tables into
    /// `output_dir`.
    ///
    /// # Errors
    /// Fails fast with [`CmError::OutputUnwritable`] or
    /// [`CmError::InputUnreadable`] before any processing. A malformed file
    /// inside a directory input is logged and skipped without failing the
    /// run; a malformed single-file input fails it.
    pub fn run(&mut self, output_dir: &Path) -> Result<(), CmError> {
        let is_output_dir = fs::metadata(output_dir)
            .map(|md| md.is_dir())
            .unwrap_or(false);
        if !is_output_dir {
            return Err(CmError::OutputUnwritable(output_dir.to_path_buf()));
        }

        let (inputs, is_dir_run) = self.enumerate_inputs()?;
        let mut sinks = DirSinkSet::new(output_dir);

        if self.state == ParserState::DiscoveringSchema {
            let mut builder = RegistryBuilder::new();
            Self::run_pass(
                &mut self.ctx,
                &inputs,
                is_dir_run,
                &mut PassState::Discovery(&mut builder),
                &mut sinks,
                true,
            )?;
            let registry = builder.finish();
            self.state = ParserState::ExtractingValues;
            // Discovery already emitted the filefooter table.
            Self::run_pass(
                &mut self.ctx,
                &inputs,
                is_dir_run,
                &mut PassState::Extraction(&registry),
                &mut sinks,
                false,
            )?;
            self.registry = Some(registry);
        } else {
            // Pre-built registry: the extraction pass is the only read of
            // each file, so it takes over the filefooter side effect.
            let registry = self.registry.get_or_insert_with(ColumnRegistry::default);
            Self::run_pass(
                &mut self.ctx,
                &inputs,
                is_dir_run,
                &mut PassState::Extraction(&*registry),
                &mut sinks,
                true,
            )?;
        }

        sinks.close_all()?;
        self.state = ParserState::Done;
        Ok(())
    }

    /// Runs the schema-discovery pass only and returns the discovered
    /// registry. No CSV output is produced.
    pub fn discover_parameters(&mut self) -> Result<ColumnRegistry, CmError> {
        let (inputs, is_dir_run) = self.enumerate_inputs()?;

        let mut builder = RegistryBuilder::new();
        Self::run_pass(
            &mut self.ctx,
            &inputs,
            is_dir_run,
            &mut PassState::Discovery(&mut builder),
            &mut NullSink,
            true,
        )?;
        let registry = builder.finish();
        self.registry = Some(registry.clone());
        self.state = ParserState::ExtractingValues;
        Ok(registry)
    }

    fn run_pass<S: TableSink>(
        ctx: &mut ParseContext,
        inputs: &[PathBuf],
        is_dir_run: bool,
        pass: &mut PassState<'_>,
        sinks: &mut S,
        write_footer: bool,
    ) -> Result<(), CmError> {
        for path in inputs {
            match pass {
                PassState::Discovery(_) => {
                    info!("extracting parameters from {}", path.display())
                }
                PassState::Extraction(_) => info!("parsing {}", path.display()),
            }

            match parse_file(path, pass, ctx, sinks, write_footer) {
                Ok(()) => {}
                Err(e) if is_dir_run => {
                    warn!("skipping file {}: {}", path.display(), e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Resolves the input path into the ordered list of files to process.
    /// Directory entries are processed in sorted order so repeated runs are
    /// byte-identical.
    fn enumerate_inputs(&self) -> Result<(Vec<PathBuf>, bool), CmError> {
        let md = fs::metadata(&self.input)
            .map_err(|_| CmError::InputUnreadable(self.input.clone()))?;

        if md.is_file() {
            return Ok((vec![self.input.clone()], false));
        }
        if md.is_dir() {
            let mut files = Vec::new();
            let entries = fs::read_dir(&self.input)
                .map_err(|_| CmError::InputUnreadable(self.input.clone()))?;
            for entry in entries {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    files.push(entry.path());
                }
            }
            files.sort();
            return Ok((files, true));
        }
        Err(CmError::InputUnreadable(self.input.clone()))
    }
}
