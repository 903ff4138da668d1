//! Conformance runner for TOML encoders and decoders.
//!
//! Programs under test are fed fixtures from a versioned corpus over stdin
//! and judged on their exit status, stderr and stdout. Decoders turn TOML into
//! tagged JSON; encoders are checked by round-tripping JSON fixtures through
//! the encoder and a trusted decoder.
//!
//! The pipeline is [`fixture`] discovery, [`marker`] filtering, the [`check`]
//! functions built on the [`harness`], and [`report`] aggregation, wired
//! together by [`runner`].

pub mod check;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod failure;
pub mod fixture;
mod fs_helpers;
pub mod harness;
pub mod json;
pub mod marker;
pub mod report;
pub mod runner;
pub mod telemetry;
pub mod version;

pub use error::{CheckError, ComplianceError};
pub use failure::{Failure, FailureReason};
pub use runner::{Mode, RunPlan, run_plan};
pub use version::TestVersion;
