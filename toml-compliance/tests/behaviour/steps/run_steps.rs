//! Steps running the checks and asserting on the report.

use crate::fixtures::{ComplianceContext, RunReport};
use anyhow::{Result, anyhow, ensure};
use camino::Utf8PathBuf;
use rstest_bdd_macros::{then, when};
use test_helpers::text::unquote;
use toml_compliance::config::Settings;
use toml_compliance::runner::{Mode, RunPlan, run_plan};

fn run(compliance_context: &ComplianceContext, mode: Mode, markers: Vec<String>) -> Result<()> {
    let tests_dir = compliance_context.corpus.take().map_or_else(
        || Utf8PathBuf::from("missing-tests"),
        |corpus| {
            let dir = corpus.tests_dir().to_path_buf();
            compliance_context.corpus.set(corpus);
            dir
        },
    );
    let settings = Settings {
        tests_dir,
        markers,
        ..Settings::default()
    };
    let plan = RunPlan::new(mode, settings);
    let mut out = Vec::new();
    let outcome = run_plan(&plan, &mut out, false)
        .map_err(|err| err.to_string())
        .and_then(|counters| {
            let text = String::from_utf8(out).map_err(|err| err.to_string())?;
            Ok(RunReport { counters, text })
        });
    compliance_context.outcome.set(outcome);
    Ok(())
}

fn decoder_mode(compliance_context: &ComplianceContext) -> Result<Mode> {
    let target = compliance_context
        .decoder
        .get()
        .ok_or_else(|| anyhow!("no decoder was written"))?;
    Ok(Mode::Decoder { target })
}

fn encoder_mode(compliance_context: &ComplianceContext) -> Result<Mode> {
    let target = compliance_context
        .encoder
        .get()
        .ok_or_else(|| anyhow!("no encoder was written"))?;
    let decoder = compliance_context
        .decoder
        .get()
        .ok_or_else(|| anyhow!("no decoder was written"))?;
    Ok(Mode::Encoder { target, decoder })
}

fn report(compliance_context: &ComplianceContext) -> Result<RunReport> {
    compliance_context
        .outcome
        .get()
        .ok_or_else(|| anyhow!("no run was performed"))?
        .map_err(|err| anyhow!("run aborted: {err}"))
}

#[when("the decoder is checked")]
fn check_decoder(compliance_context: &ComplianceContext) -> Result<()> {
    let mode = decoder_mode(compliance_context)?;
    run(compliance_context, mode, Vec::new())
}

#[when("the decoder is checked with marker {marker}")]
fn check_decoder_with_marker(compliance_context: &ComplianceContext, marker: String) -> Result<()> {
    let mode = decoder_mode(compliance_context)?;
    run(compliance_context, mode, vec![marker])
}

#[when("a missing decoder is checked")]
fn check_missing_decoder(compliance_context: &ComplianceContext) -> Result<()> {
    let target = Utf8PathBuf::from("no-such-decoder-program");
    run(compliance_context, Mode::Decoder { target }, Vec::new())
}

#[when("the encoder is checked")]
fn check_encoder(compliance_context: &ComplianceContext) -> Result<()> {
    let mode = encoder_mode(compliance_context)?;
    run(compliance_context, mode, Vec::new())
}

#[when("the encoder is checked with marker {marker}")]
fn check_encoder_with_marker(compliance_context: &ComplianceContext, marker: String) -> Result<()> {
    let mode = encoder_mode(compliance_context)?;
    run(compliance_context, mode, vec![marker])
}

#[then("{count} cases pass")]
fn cases_pass(compliance_context: &ComplianceContext, count: usize) -> Result<()> {
    let passed = report(compliance_context)?.counters.passed();
    ensure!(passed == count, "expected {count} passing cases, got {passed}");
    Ok(())
}

#[then("{count} cases fail")]
fn cases_fail(compliance_context: &ComplianceContext, count: usize) -> Result<()> {
    let failed = report(compliance_context)?.counters.failed();
    ensure!(failed == count, "expected {count} failing cases, got {failed}");
    Ok(())
}

#[then("the exit code is {code}")]
fn exit_code(compliance_context: &ComplianceContext, code: u8) -> Result<()> {
    let actual = report(compliance_context)?.counters.exit_code();
    ensure!(actual == code, "expected exit code {code}, got {actual}");
    Ok(())
}

#[then("the report contains {text}")]
fn report_contains(compliance_context: &ComplianceContext, text: String) -> Result<()> {
    let expected = unquote(&text);
    let report = report(compliance_context)?;
    ensure!(
        report.text.contains(expected),
        "expected report to contain {expected:?}:\n{}",
        report.text
    );
    Ok(())
}

#[then("the run aborts with {text}")]
fn run_aborts(compliance_context: &ComplianceContext, text: String) -> Result<()> {
    let expected = unquote(&text);
    let outcome = compliance_context
        .outcome
        .get()
        .ok_or_else(|| anyhow!("no run was performed"))?;
    let Err(message) = outcome else {
        return Err(anyhow!("expected the run to abort"));
    };
    ensure!(
        message.contains(expected),
        "expected abort message to contain {expected:?}, got {message:?}"
    );
    Ok(())
}
