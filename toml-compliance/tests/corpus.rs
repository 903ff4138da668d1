//! Consistency checks over the sample corpus shipped in the repository.
//!
//! A trusted stub decoder answers each valid TOML fixture with its paired
//! JSON, and a stub encoder answers each valid JSON fixture with its paired
//! TOML. Every fixture must pass against them, so a mispaired or malformed
//! file shows up as a failing case.
#![cfg(unix)]

use camino::{Utf8Path, Utf8PathBuf};
use rstest::rstest;
use test_helpers::program::ProgramDir;
use toml_compliance::TestVersion;
use toml_compliance::config::Settings;
use toml_compliance::runner::{Mode, RunPlan, run_plan};

fn tests_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../tests"))
}

fn lookup_script(version_dir: &Utf8Path, from: &str, to: &str) -> String {
    format!(
        "input=$(cat)\n\
         for fixture in '{version_dir}'/valid/*.{from}; do\n\
         \x20 if [ \"$input\" = \"$(cat \"$fixture\")\" ]; then\n\
         \x20   cat \"${{fixture%.{from}}}.{to}\"\n\
         \x20   exit 0\n\
         \x20 fi\n\
         done\n\
         exit 1\n"
    )
}

struct Stubs {
    _programs: ProgramDir,
    decoder: Utf8PathBuf,
    encoder: Utf8PathBuf,
}

fn stubs(version: TestVersion) -> Stubs {
    let version_dir = tests_dir().join(version.as_str());
    let programs = ProgramDir::new().expect("program dir");
    let decoder = programs
        .script("decoder", &lookup_script(&version_dir, "toml", "json"))
        .expect("decoder script");
    let encoder = programs
        .script("encoder", &lookup_script(&version_dir, "json", "toml"))
        .expect("encoder script");
    Stubs {
        _programs: programs,
        decoder,
        encoder,
    }
}

fn run(mode: Mode, version: TestVersion) -> (u8, usize, String) {
    let settings = Settings {
        tests_dir: tests_dir(),
        version,
        ..Settings::default()
    };
    let mut out = Vec::new();
    let counters = run_plan(&RunPlan::new(mode, settings), &mut out, false).expect("run completes");
    let text = String::from_utf8(out).expect("UTF-8 report");
    (counters.exit_code(), counters.total(), text)
}

#[rstest]
#[case::v0_4(TestVersion::V0_4, 3)]
#[case::v1_0_0_rc1(TestVersion::V1_0_0Rc1, 10)]
fn every_toml_fixture_agrees_with_its_pair(#[case] version: TestVersion, #[case] cases: usize) {
    let stubs = stubs(version);
    let (code, total, text) = run(
        Mode::Decoder {
            target: stubs.decoder.clone(),
        },
        version,
    );
    assert_eq!(total, cases, "{text}");
    assert_eq!(code, 0, "{text}");
}

#[rstest]
#[case::v0_4(TestVersion::V0_4, 3)]
#[case::v1_0_0_rc1(TestVersion::V1_0_0Rc1, 9)]
fn every_json_fixture_round_trips(#[case] version: TestVersion, #[case] cases: usize) {
    let stubs = stubs(version);
    let (code, total, text) = run(
        Mode::Encoder {
            target: stubs.encoder.clone(),
            decoder: stubs.decoder.clone(),
        },
        version,
    );
    assert_eq!(total, cases, "{text}");
    assert_eq!(code, 0, "{text}");
}
