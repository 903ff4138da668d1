//! Binds the compliance feature files to the step registry.

use crate::fixtures::{ComplianceContext, compliance_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/decoder_compliance.feature",
    fixtures = [compliance_context: ComplianceContext]
);
scenarios!(
    "tests/features/encoder_compliance.feature",
    fixtures = [compliance_context: ComplianceContext]
);
