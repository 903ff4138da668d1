//! Scenario state shared by the compliance steps.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use test_helpers::corpus::CorpusBuilder;
use test_helpers::program::ProgramDir;
use toml_compliance::report::RunCounters;

/// Report captured from a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub counters: RunCounters,
    pub text: String,
}

/// State threaded through one compliance scenario.
#[derive(Debug, Default, ScenarioState)]
pub struct ComplianceContext {
    pub corpus: Slot<CorpusBuilder>,
    pub programs: Slot<ProgramDir>,
    pub encoder: Slot<Utf8PathBuf>,
    pub decoder: Slot<Utf8PathBuf>,
    pub outcome: Slot<Result<RunReport, String>>,
}

/// Creates an empty context for each scenario.
#[fixture]
pub fn compliance_context() -> ComplianceContext {
    ComplianceContext::default()
}
