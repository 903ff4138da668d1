//! Steps populating the fixture corpus.

use crate::fixtures::ComplianceContext;
use anyhow::Result;
use rstest_bdd_macros::given;
use test_helpers::corpus::CorpusBuilder;
use toml_compliance::TestVersion;

pub const VALID_TOML: &str = "key = 1\n";
pub const VALID_JSON: &str = r#"{"key": {"type": "integer", "value": "1"}}"#;
const INVALID_TOML: &str = "= 1\n";
const INVALID_JSON: &str = r#"{"mixed": {"type": "array", "value": [1, "x"]}}"#;

fn with_corpus<F>(compliance_context: &ComplianceContext, write: F) -> Result<()>
where
    F: FnOnce(&CorpusBuilder) -> Result<()>,
{
    let corpus = compliance_context
        .corpus
        .take()
        .map_or_else(|| CorpusBuilder::new(TestVersion::LATEST.as_str()), Ok)?;
    let written = write(&corpus);
    compliance_context.corpus.set(corpus);
    written
}

#[given("a corpus with the valid fixture {stem}")]
fn valid_fixture(compliance_context: &ComplianceContext, stem: String) -> Result<()> {
    with_corpus(compliance_context, |corpus| {
        corpus.valid(&stem, VALID_TOML, VALID_JSON)
    })
}

#[given("a corpus with the invalid TOML fixture {stem}")]
fn invalid_toml_fixture(compliance_context: &ComplianceContext, stem: String) -> Result<()> {
    with_corpus(compliance_context, |corpus| {
        corpus.invalid_toml(&stem, INVALID_TOML)
    })
}

#[given("a corpus with the invalid JSON fixture {stem}")]
fn invalid_json_fixture(compliance_context: &ComplianceContext, stem: String) -> Result<()> {
    with_corpus(compliance_context, |corpus| {
        corpus.invalid_json(&stem, INVALID_JSON)
    })
}
