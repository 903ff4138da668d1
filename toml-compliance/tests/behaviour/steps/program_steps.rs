//! Steps writing stub encoders and decoders.

use super::corpus_steps::VALID_JSON;
use crate::fixtures::ComplianceContext;
use anyhow::Result;
use camino::Utf8PathBuf;
use rstest_bdd_macros::given;
use test_helpers::program::ProgramDir;

const WRONG_TYPE_JSON: &str = r#"{"key": {"type": "string", "value": "1"}}"#;

fn write_script(
    compliance_context: &ComplianceContext,
    name: &str,
    body: &str,
) -> Result<Utf8PathBuf> {
    let programs = compliance_context
        .programs
        .take()
        .map_or_else(ProgramDir::new, Ok)?;
    let written = programs.script(name, body);
    compliance_context.programs.set(programs);
    written
}

fn printing(json: &str) -> String {
    format!("cat >/dev/null\nprintf '%s' '{json}'\n")
}

#[given("a decoder that prints the expected value only for valid input")]
fn selective_decoder(compliance_context: &ComplianceContext) -> Result<()> {
    let body = format!(
        "input=$(cat)\ncase \"$input\" in\n  =*) exit 1 ;;\nesac\nprintf '%s' '{VALID_JSON}'\n"
    );
    let path = write_script(compliance_context, "decoder", &body)?;
    compliance_context.decoder.set(path);
    Ok(())
}

#[given("a decoder that always prints the expected value")]
fn accepting_decoder(compliance_context: &ComplianceContext) -> Result<()> {
    let path = write_script(compliance_context, "decoder", &printing(VALID_JSON))?;
    compliance_context.decoder.set(path);
    Ok(())
}

#[given("a decoder that prints the expected value and complains on stderr")]
fn noisy_decoder(compliance_context: &ComplianceContext) -> Result<()> {
    let body = format!("{}echo warning >&2\n", printing(VALID_JSON));
    let path = write_script(compliance_context, "decoder", &body)?;
    compliance_context.decoder.set(path);
    Ok(())
}

#[given("a decoder that prints a string instead of an integer")]
fn mistyped_decoder(compliance_context: &ComplianceContext) -> Result<()> {
    let path = write_script(compliance_context, "decoder", &printing(WRONG_TYPE_JSON))?;
    compliance_context.decoder.set(path);
    Ok(())
}

#[given("an identity decoder")]
fn identity_decoder(compliance_context: &ComplianceContext) -> Result<()> {
    let path = write_script(compliance_context, "decoder", "cat\n")?;
    compliance_context.decoder.set(path);
    Ok(())
}

#[given("an identity encoder")]
fn identity_encoder(compliance_context: &ComplianceContext) -> Result<()> {
    let path = write_script(compliance_context, "encoder", "cat\n")?;
    compliance_context.encoder.set(path);
    Ok(())
}

#[given("an encoder that rejects malformed input")]
fn strict_encoder(compliance_context: &ComplianceContext) -> Result<()> {
    let body = concat!(
        "input=$(cat)\n",
        "case \"$input\" in\n  *'['*) exit 1 ;;\nesac\n",
        "printf '%s\\n' \"$input\"\n",
    );
    let path = write_script(compliance_context, "encoder", body)?;
    compliance_context.encoder.set(path);
    Ok(())
}

#[given("an encoder that drops every key")]
fn lossy_encoder(compliance_context: &ComplianceContext) -> Result<()> {
    let path = write_script(compliance_context, "encoder", &printing("{}"))?;
    compliance_context.encoder.set(path);
    Ok(())
}
