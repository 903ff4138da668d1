//! The decode and encode compliance checks.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::CheckError;
use crate::failure::{Failure, FailureReason, JsonSource};
use crate::fixture::FixturePair;
use crate::fs_helpers::read_bytes;
use crate::harness::{Expectation, Outcome, Program, invoke, invoke_clean};
use crate::json::load_json;

/// Inputs for one decoder check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeCase {
    /// TOML fixture fed to the decoder.
    pub toml: Utf8PathBuf,
    /// Expected decoded value, absent for invalid TOML.
    pub json: Option<Utf8PathBuf>,
    /// Whether the decoder must accept or reject the TOML.
    pub expectation: Expectation,
}

impl DecodeCase {
    /// Builds a case from a fixture pair; `None` when there is no TOML side.
    #[must_use]
    pub fn from_pair(pair: &FixturePair) -> Option<Self> {
        let toml = pair.toml()?.to_path_buf();
        let json = pair.json().map(Utf8Path::to_path_buf);
        let expectation = Expectation::clean_if(json.is_some());
        Some(Self {
            toml,
            json,
            expectation,
        })
    }
}

/// Inputs for one encoder round-trip check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeCase {
    /// JSON fixture fed to the encoder.
    pub json: Utf8PathBuf,
    /// Whether the encoder must accept or reject the JSON.
    pub expectation: Expectation,
}

impl EncodeCase {
    /// Builds a case from a fixture pair; `None` when there is no JSON side.
    #[must_use]
    pub fn from_pair(pair: &FixturePair) -> Option<Self> {
        let json = pair.json()?.to_path_buf();
        Some(Self {
            json,
            expectation: Expectation::clean_if(pair.toml().is_some()),
        })
    }
}

/// Decodes the TOML fixture and compares the result with the JSON fixture.
///
/// Without a JSON fixture only the rejection of the input is checked.
///
/// # Errors
///
/// Returns [`CheckError::Failed`] when the decoder misbehaves or its output
/// differs from the fixture, and [`CheckError::Fatal`] when a fixture cannot
/// be read.
pub fn check_decoder(decoder: &Program, case: &DecodeCase) -> Result<(), CheckError> {
    let input = read_bytes(&case.toml)?;
    let outcome = invoke(decoder, &input, case.expectation)?;

    let (Outcome::Accepted(output), Some(json_path)) = (outcome, case.json.as_deref()) else {
        return Ok(());
    };

    let expected = load_json(&read_bytes(json_path)?, JsonSource::TestCaseInput)?;
    let decoded = load_json(&output, JsonSource::DecoderOutput)?;
    if expected != decoded {
        return Err(Failure::new(FailureReason::DecodeMismatch)
            .with_diff(&expected, &decoded)
            .into());
    }
    Ok(())
}

/// Encodes the JSON fixture, decodes the result with a trusted decoder and
/// compares it with the original.
///
/// The fixture is parsed before the encoder runs, so a corrupt fixture is
/// told apart from a misbehaving encoder whatever the expectation.
///
/// # Errors
///
/// Returns [`CheckError::Failed`] when the fixture is not JSON, when either
/// program misbehaves or when the round trip changes the value, and
/// [`CheckError::Fatal`] when the fixture cannot be read.
pub fn check_encoder(
    encoder: &Program,
    decoder: &Program,
    case: &EncodeCase,
) -> Result<(), CheckError> {
    let raw = read_bytes(&case.json)?;
    let original = load_json(&raw, JsonSource::TestCaseInput)?;

    let Outcome::Accepted(encoded) = invoke(encoder, &raw, case.expectation)? else {
        return Ok(());
    };

    let decoded = invoke_clean(decoder, &encoded)?;
    let round_tripped = load_json(&decoded, JsonSource::DecoderOutput)?;
    if original != round_tripped {
        return Err(Failure::new(FailureReason::RoundTripMismatch)
            .with_diff(&original, &round_tripped)
            .into());
    }
    Ok(())
}
