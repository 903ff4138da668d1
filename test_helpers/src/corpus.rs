//! Temporary fixture corpora laid out as `<tests>/<version>/{valid,invalid}`.
//!
//! # Examples
//!
//! ```
//! use test_helpers::corpus::CorpusBuilder;
//!
//! let corpus = CorpusBuilder::new("v1.0.0-rc1")?;
//! corpus.valid("string", "a = \"b\"\n", r#"{"a":"b"}"#)?;
//! assert!(corpus.version_dir().join("valid/string.json").is_file());
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tempfile::TempDir;

/// Fixture tree for one version inside a temporary directory.
///
/// The directory is removed when the builder is dropped.
#[derive(Debug)]
pub struct CorpusBuilder {
    _temp: TempDir,
    tests_dir: Utf8PathBuf,
    version_dir: Utf8PathBuf,
    root: Dir,
}

impl CorpusBuilder {
    /// Creates an empty version directory named `version`.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created.
    pub fn new(version: &str) -> Result<Self> {
        let temp = tempfile::tempdir().context("create temporary corpus")?;
        let tests_dir = Utf8PathBuf::from_path_buf(temp.path().join("tests"))
            .map_err(|path| anyhow::anyhow!("non-UTF-8 temp path: {}", path.display()))?;
        let version_dir = tests_dir.join(version);
        std::fs::create_dir_all(&version_dir)
            .with_context(|| format!("create {version_dir}"))?;
        let root = Dir::open_ambient_dir(&version_dir, ambient_authority())
            .with_context(|| format!("open {version_dir}"))?;
        Ok(Self {
            _temp: temp,
            tests_dir,
            version_dir,
            root,
        })
    }

    /// Directory holding every version directory.
    #[must_use]
    pub fn tests_dir(&self) -> &Utf8Path {
        &self.tests_dir
    }

    /// Directory of the version being built.
    #[must_use]
    pub fn version_dir(&self) -> &Utf8Path {
        &self.version_dir
    }

    /// Writes a valid TOML fixture with its expected JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when either file cannot be written.
    pub fn valid(&self, stem: &str, toml: &str, json: &str) -> Result<()> {
        self.write(&format!("valid/{stem}.toml"), toml)?;
        self.write(&format!("valid/{stem}.json"), json)
    }

    /// Writes a TOML document a decoder must reject.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn invalid_toml(&self, stem: &str, content: &str) -> Result<()> {
        self.write(&format!("invalid/{stem}.toml"), content)
    }

    /// Writes a JSON document an encoder must reject.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn invalid_json(&self, stem: &str, content: &str) -> Result<()> {
        self.write(&format!("invalid/{stem}.json"), content)
    }

    /// Writes `content` at `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error when a directory or the file cannot be written.
    pub fn write(&self, relative: &str, content: &str) -> Result<()> {
        let path = Utf8Path::new(relative);
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            self.root
                .create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        self.root
            .write(path, content)
            .with_context(|| format!("write {relative}"))
    }
}
