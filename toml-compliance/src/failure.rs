//! Per-case check failures.
//!
//! A [`Failure`] is the only error a case may raise without aborting the run.
//! It carries one or more [`FailureReason`]s and, optionally, [`Details`] that
//! help the operator see what went wrong.

use std::fmt;

use camino::Utf8PathBuf;
use serde_json::Value;
use thiserror::Error;

use crate::diff::JsonDiff;

/// Where a JSON document came from, so fixture corruption can be told apart
/// from a misbehaving program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonSource {
    /// A JSON fixture from the corpus.
    TestCaseInput,
    /// Standard output of the decoder.
    DecoderOutput,
}

impl fmt::Display for JsonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestCaseInput => f.write_str("test case input"),
            Self::DecoderOutput => f.write_str("decoder's output"),
        }
    }
}

/// Why a check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The program could not be spawned.
    #[error("could not run: {0}")]
    Unlaunchable(Utf8PathBuf),
    /// A clean exit was expected but the program exited non-zero.
    #[error("Got a non-zero exit code: {0}")]
    UnexpectedRejection(String),
    /// A clean exit was expected but the program wrote to stderr.
    #[error("Got stderr output!")]
    UnexpectedStderr,
    /// The program accepted input it should have rejected.
    #[error("Should have rejected input.")]
    ExpectedRejectionMissing,
    /// A JSON document could not be parsed.
    #[error("Could not parse {0} JSON")]
    UnparsableJson(JsonSource),
    /// Decoder output differs from the expected JSON fixture.
    #[error("Mismatch between expected JSON and decoded JSON.")]
    DecodeMismatch,
    /// The encode-then-decode result differs from the original JSON fixture.
    #[error("Mismatch between original JSON and encoded-decoded JSON.")]
    RoundTripMismatch,
}

/// Supporting material printed beneath the failure reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Details {
    /// Text describing the underlying cause (an error message, or stderr).
    Cause(String),
    /// Structural difference between expected and actual JSON values.
    Diff(JsonDiff),
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cause(text) => f.write_str(text),
            Self::Diff(diff) => diff.fmt(f),
        }
    }
}

/// A failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    reasons: Vec<FailureReason>,
    details: Option<Details>,
}

impl Failure {
    /// Creates a failure with a single reason and no details.
    #[must_use]
    pub fn new(reason: FailureReason) -> Self {
        Self {
            reasons: vec![reason],
            details: None,
        }
    }

    /// Creates a failure reporting every reason in `reasons`.
    ///
    /// Returns `None` when `reasons` is empty.
    #[must_use]
    pub fn from_reasons(reasons: Vec<FailureReason>) -> Option<Self> {
        if reasons.is_empty() {
            return None;
        }
        Some(Self {
            reasons,
            details: None,
        })
    }

    /// Attaches a textual cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.details = Some(Details::Cause(cause.to_string()));
        self
    }

    /// Attaches a diff between `expected` and `actual`.
    #[must_use]
    pub fn with_diff(mut self, expected: &Value, actual: &Value) -> Self {
        self.details = Some(Details::Diff(JsonDiff::new(expected, actual)));
        self
    }

    /// Reasons recorded for this failure, in the order they were detected.
    #[must_use]
    pub fn reasons(&self) -> &[FailureReason] {
        &self.reasons
    }

    /// Returns `true` when `reason` is among the recorded reasons.
    #[must_use]
    pub fn has_reason(&self, reason: &FailureReason) -> bool {
        self.reasons.contains(reason)
    }

    /// Optional supporting details.
    #[must_use]
    pub const fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for reason in &self.reasons {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {}
