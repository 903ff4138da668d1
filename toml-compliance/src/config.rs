//! Layered run settings.
//!
//! Values are merged from lowest to highest precedence: built-in defaults,
//! the settings file, `TOML_COMPLIANCE_*` environment variables, then
//! command-line flags.

use camino::{Utf8Path, Utf8PathBuf};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, ColorChoice};
use crate::error::ComplianceError;
use crate::version::TestVersion;

/// Prefix of environment variables read as settings.
pub const ENV_PREFIX: &str = "TOML_COMPLIANCE_";

/// Settings file read from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "toml-compliance.toml";

const SETTING_KEYS: [&str; 4] = ["tests_dir", "version", "markers", "color"];

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory holding one corpus per version.
    pub tests_dir: Utf8PathBuf,
    /// Corpus version to run.
    pub version: TestVersion,
    /// Markers restricting which fixtures run.
    pub markers: Vec<String>,
    /// When to colour the report.
    pub color: ColorChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tests_dir: Utf8PathBuf::from("tests"),
            version: TestVersion::LATEST,
            markers: Vec::new(),
            color: ColorChoice::Auto,
        }
    }
}

/// Settings given explicitly on the command line.
///
/// Unset fields are skipped so they never mask lower layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    tests_dir: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<TestVersion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    markers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<ColorChoice>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        let selection = cli.command.as_ref().map(|command| command.selection());
        Self {
            tests_dir: cli.tests_dir.clone(),
            version: selection.and_then(|s| s.version),
            markers: selection.map(|s| s.markers.clone()).unwrap_or_default(),
            color: cli.color,
        }
    }
}

/// Resolves settings from every layer.
///
/// With no `config_path` the default settings file is used if it exists.
///
/// # Errors
///
/// Returns [`ComplianceError::MissingConfig`] when an explicitly named
/// settings file does not exist, and [`ComplianceError::Config`] when a layer
/// holds a malformed value.
pub fn load_settings(
    config_path: Option<&Utf8Path>,
    overrides: &Overrides,
) -> Result<Settings, ComplianceError> {
    let file = match config_path {
        Some(path) if !path.is_file() => {
            return Err(ComplianceError::MissingConfig(path.to_path_buf()));
        }
        Some(path) => absolute(path)?,
        None => absolute(Utf8Path::new(DEFAULT_CONFIG_FILE))?,
    };

    let settings = Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(file.as_std_path()))
        .merge(Env::prefixed(ENV_PREFIX).only(&SETTING_KEYS))
        .merge(Serialized::defaults(overrides))
        .extract()?;
    Ok(settings)
}

// Relative paths passed to `Toml::file` are searched for in parent
// directories too; only the working directory counts here.
fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf, ComplianceError> {
    let io_err = |source| ComplianceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let resolved = std::path::absolute(path).map_err(io_err)?;
    Utf8PathBuf::from_path_buf(resolved).map_err(|_| ComplianceError::NonUtf8Name {
        dir: path.to_path_buf(),
    })
}
