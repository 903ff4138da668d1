//! Wires fixture discovery, marker filtering, checks and reporting together.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, warn};

use crate::check::{DecodeCase, EncodeCase, check_decoder, check_encoder};
use crate::cli::Command;
use crate::config::Settings;
use crate::error::ComplianceError;
use crate::fixture::{Corpus, FixturePair, display_name};
use crate::harness::Program;
use crate::marker::filter_pairs;
use crate::report::{RunCounters, run_with_reporting};
use crate::version::TestVersion;

/// Which kind of program is under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Round-trip JSON fixtures through `target`, reading its output back
    /// with the trusted `decoder`.
    Encoder {
        /// Encoder under test.
        target: Utf8PathBuf,
        /// Trusted decoder.
        decoder: Utf8PathBuf,
    },
    /// Decode TOML fixtures with `target`.
    Decoder {
        /// Decoder under test.
        target: Utf8PathBuf,
    },
}

impl From<Command> for Mode {
    fn from(command: Command) -> Self {
        match command {
            Command::Encoder(args) => Self::Encoder {
                target: args.target,
                decoder: args.decoder,
            },
            Command::Decoder(args) => Self::Decoder {
                target: args.target,
            },
        }
    }
}

/// Everything needed to run one compliance pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Program kind and paths.
    pub mode: Mode,
    /// Root directory holding one corpus per version.
    pub tests_dir: Utf8PathBuf,
    /// Corpus version to run.
    pub version: TestVersion,
    /// Markers restricting which fixtures run.
    pub markers: Vec<String>,
}

impl RunPlan {
    /// Combines a mode with resolved settings.
    #[must_use]
    pub fn new(mode: Mode, settings: Settings) -> Self {
        Self {
            mode,
            tests_dir: settings.tests_dir,
            version: settings.version,
            markers: settings.markers,
        }
    }
}

/// Runs the plan in its mode, writing the report to `out`.
///
/// # Errors
///
/// Returns any precondition failure, or a fatal error raised mid-run.
pub fn run_plan<W: Write>(
    plan: &RunPlan,
    out: &mut W,
    is_colored: bool,
) -> Result<RunCounters, ComplianceError> {
    match &plan.mode {
        Mode::Encoder { target, decoder } => {
            encoder_compliance(plan, target, decoder, out, is_colored)
        }
        Mode::Decoder { target } => decoder_compliance(plan, target, out, is_colored),
    }
}

/// Checks a decoder against every selected TOML fixture.
///
/// # Errors
///
/// Returns [`ComplianceError::MissingExecutable`] or
/// [`ComplianceError::NotExecutable`] for a bad `target`, corpus errors, and
/// fatal errors raised while checking.
pub fn decoder_compliance<W: Write>(
    plan: &RunPlan,
    target: &Utf8Path,
    out: &mut W,
    is_colored: bool,
) -> Result<RunCounters, ComplianceError> {
    let decoder = Program::new(target)?;
    let cases = collect_cases(plan, |pair| {
        let case = DecodeCase::from_pair(pair)?;
        Some((display_name(pair.category(), &case.toml), case))
    })?;
    info!(
        decoder = %decoder.path(),
        version = %plan.version,
        tests_dir = %plan.tests_dir,
        markers = plan.markers.len(),
        cases = cases.len(),
        "checking decoder"
    );
    run_with_reporting(out, is_colored, |case| check_decoder(&decoder, case), cases)
}

/// Checks an encoder against every selected JSON fixture.
///
/// # Errors
///
/// Returns [`ComplianceError::MissingExecutable`] or
/// [`ComplianceError::NotExecutable`] for a bad `target` or `decoder`, corpus
/// errors, and fatal errors raised while checking.
pub fn encoder_compliance<W: Write>(
    plan: &RunPlan,
    target: &Utf8Path,
    decoder: &Utf8Path,
    out: &mut W,
    is_colored: bool,
) -> Result<RunCounters, ComplianceError> {
    let encoder = Program::new(target)?;
    let decoder = Program::new(decoder)?;
    let cases = collect_cases(plan, |pair| {
        let case = EncodeCase::from_pair(pair)?;
        Some((display_name(pair.category(), &case.json), case))
    })?;
    info!(
        encoder = %encoder.path(),
        decoder = %decoder.path(),
        version = %plan.version,
        tests_dir = %plan.tests_dir,
        markers = plan.markers.len(),
        cases = cases.len(),
        "checking encoder"
    );
    run_with_reporting(
        out,
        is_colored,
        |case| check_encoder(&encoder, &decoder, case),
        cases,
    )
}

// Collected eagerly so a missing pair aborts before any case runs.
fn collect_cases<C>(
    plan: &RunPlan,
    to_case: impl Fn(&FixturePair) -> Option<(String, C)>,
) -> Result<Vec<(String, C)>, ComplianceError> {
    let corpus = Corpus::open(&plan.tests_dir, plan.version)?;
    let mut cases = Vec::new();
    for pair in filter_pairs(corpus.pairs()?, plan.markers.clone()) {
        if let Some(case) = to_case(&pair?) {
            cases.push(case);
        }
    }
    if cases.is_empty() && !plan.markers.is_empty() {
        warn!(markers = ?plan.markers, "no fixture matched the markers");
    }
    Ok(cases)
}
