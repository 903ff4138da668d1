//! Error types for `toml-compliance`.
//!
//! [`ComplianceError`] covers setup and environment defects that abort a run.
//! Conformance failures of the programs under test are [`crate::failure::Failure`]
//! values instead; [`CheckError`] lets a checker surface either tier with `?`.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::failure::Failure;

/// Fatal errors that abort the whole run.
#[derive(Debug, Error)]
pub enum ComplianceError {
    /// The program under test does not exist.
    #[error("could not find file: {0}")]
    MissingExecutable(Utf8PathBuf),

    /// The program under test exists but cannot be executed.
    #[error("not an executable file: {0}")]
    NotExecutable(Utf8PathBuf),

    /// A valid TOML fixture has no JSON counterpart.
    #[error("missing: {0}")]
    MissingPair(Utf8PathBuf),

    /// The corpus directory for the selected version does not exist.
    #[error("test corpus not found at {0}")]
    MissingCorpus(Utf8PathBuf),

    /// A fixture path is not valid UTF-8.
    #[error("fixture name in {dir} is not valid UTF-8")]
    NonUtf8Name {
        /// Directory holding the offending entry.
        dir: Utf8PathBuf,
    },

    /// Settings could not be resolved from defaults, file, environment and CLI.
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The configuration file named on the command line does not exist.
    #[error("configuration file not found: {0}")]
    MissingConfig(Utf8PathBuf),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed when the error occurred.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for ComplianceError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Outcome of a single check that did not pass.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The program under test misbehaved; the case is counted as failed.
    #[error(transparent)]
    Failed(#[from] Failure),

    /// The environment is broken; the run must stop.
    #[error(transparent)]
    Fatal(#[from] ComplianceError),
}
