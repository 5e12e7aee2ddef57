// crates/huaweicm-rs-cli/src/main.rs

//! CLI front-end: argument parsing, logging setup, exit codes and the
//! end-of-run execution-time report.

use clap::Parser;
use huaweicm_rs::{CmError, ColumnRegistry, Converter};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Parses Huawei NBI XML bulk configuration files to CSV.
#[derive(Debug, Parser)]
#[command(name = "huaweicmxmlparser", version, about)]
struct Cli {
    /// Input file or directory name.
    #[arg(short = 'i', long = "input-file", value_name = "INPUT_FILE")]
    input: PathBuf,

    /// Output directory name.
    #[arg(
        short = 'o',
        long = "output-directory",
        value_name = "OUTPUT_DIRECTORY",
        required_unless_present = "extract_parameters"
    )]
    output: Option<PathBuf>,

    /// Parameter configuration file (lines of TYPE:param1,param2,...);
    /// skips the schema-discovery pass.
    #[arg(short = 'c', long = "parameter-config", value_name = "PARAMETER_CONFIG")]
    parameter_config: Option<PathBuf>,

    /// Extract only the managed objects and parameters, printed to stdout
    /// in the parameter-config format. No output directory is needed.
    #[arg(short = 'p', long = "extract-parameters")]
    extract_parameters: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let start = Instant::now();

    let result = if cli.extract_parameters {
        extract_parameters(&cli)
    } else {
        convert(&cli)
    };

    match result {
        Ok(()) => {
            info!("parsing completed. total time: {:.3?}", start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Discovery-only mode: print `TYPE:param1,param2,...` lines to stdout.
fn extract_parameters(cli: &Cli) -> Result<(), CmError> {
    let mut converter = Converter::new(&cli.input);
    let registry = converter.discover_parameters()?;
    for (mo_type, columns) in registry.iter() {
        println!("{}:{}", mo_type, columns.join(","));
    }
    Ok(())
}

fn convert(cli: &Cli) -> Result<(), CmError> {
    // clap guarantees the output directory unless -p was given.
    let output = match cli.output.as_deref() {
        Some(dir) => dir,
        None => return Err(CmError::OutputUnwritable(PathBuf::new())),
    };

    let mut converter = match &cli.parameter_config {
        Some(config) => {
            let registry = ColumnRegistry::from_parameter_file(config)?;
            Converter::new(&cli.input).with_registry(registry)
        }
        None => Converter::new(&cli.input),
    };

    converter.run(output)
}
