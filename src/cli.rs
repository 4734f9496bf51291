//! Shared plumbing for the command-line tools.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::PipelineConfig;
use crate::error::{ScienceError, ScienceResult};

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (tests); keep the first one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parses command-line arguments.
///
/// Usage errors exit with status 1 like every other failure; `--help` and
/// `--version` exit with 0.
///
/// # Errors
///
/// Returns the exit code to terminate with after clap has printed its
/// message.
pub fn parse_args<P: Parser>() -> Result<P, ExitCode> {
    P::try_parse().map_err(|err| {
        let _ = err.print();
        if err.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Reads an input file.
///
/// # Errors
///
/// Returns `ScienceError::InputNotFound` for a missing file and
/// `ScienceError::Io` for other read failures.
pub fn read_input(path: &Path) -> ScienceResult<String> {
    std::fs::read_to_string(path).map_err(|e| ScienceError::io(path.display().to_string(), e))
}

/// Writes an output file, replacing any existing one.
///
/// # Errors
///
/// Returns `ScienceError::Io` if the file cannot be written.
pub fn write_output(path: &Path, contents: &str) -> ScienceResult<()> {
    std::fs::write(path, contents).map_err(|source| ScienceError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the pipeline config from `path`, or the defaults when absent.
///
/// # Errors
///
/// Returns `ScienceError::Config` if the file cannot be read or is invalid.
pub fn load_config(path: Option<&Path>) -> ScienceResult<PipelineConfig> {
    match path {
        Some(path) => Ok(PipelineConfig::from_path(path)?),
        None => Ok(PipelineConfig::default()),
    }
}

/// Logs a fatal error and returns the failure status.
#[must_use]
pub fn fail(tool: &str, err: &ScienceError) -> ExitCode {
    tracing::error!(tool, error = %err, "aborting");
    eprintln!("{tool}: {err}");
    ExitCode::FAILURE
}
