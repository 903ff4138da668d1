//! Fixture discovery for a versioned corpus.
//!
//! A corpus version lives in `<tests_dir>/<version>/` and holds two category
//! directories:
//!
//! - `invalid/`: `*.toml` files a decoder must reject and `*.json` files an
//!   encoder must reject;
//! - `valid/`: `*.toml` files, each paired with a same-stem `*.json` file
//!   holding the expected decoded value.
//!
//! [`Corpus::pairs`] walks these lazily in directory order.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::{Dir, DirEntry, ReadDir};
use tracing::debug;

use crate::error::ComplianceError;
use crate::fs_helpers::open_optional_dir;
use crate::version::TestVersion;

const TOML_EXTENSION: &str = "toml";
const JSON_EXTENSION: &str = "json";

/// Fixture category, named after its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Inputs the program under test must accept.
    Valid,
    /// Inputs the program under test must reject.
    Invalid,
}

impl Category {
    /// Directory name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A TOML fixture, a JSON fixture, or a matched pair of both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixturePair {
    /// Malformed TOML with no JSON counterpart.
    InvalidFormat {
        /// Path to the TOML file.
        toml: Utf8PathBuf,
    },
    /// Malformed JSON with no TOML counterpart.
    InvalidData {
        /// Path to the JSON file.
        json: Utf8PathBuf,
    },
    /// Well-formed TOML and its expected JSON value.
    Valid {
        /// Path to the TOML file.
        toml: Utf8PathBuf,
        /// Path to the JSON file.
        json: Utf8PathBuf,
    },
}

impl FixturePair {
    /// The TOML side, if present.
    #[must_use]
    pub fn toml(&self) -> Option<&Utf8Path> {
        match self {
            Self::InvalidFormat { toml } | Self::Valid { toml, .. } => Some(toml),
            Self::InvalidData { .. } => None,
        }
    }

    /// The JSON side, if present.
    #[must_use]
    pub fn json(&self) -> Option<&Utf8Path> {
        match self {
            Self::InvalidData { json } | Self::Valid { json, .. } => Some(json),
            Self::InvalidFormat { .. } => None,
        }
    }

    /// Category directory the pair was found in.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Valid { .. } => Category::Valid,
            Self::InvalidFormat { .. } | Self::InvalidData { .. } => Category::Invalid,
        }
    }

    /// File stem used for marker matching: the TOML side, else the JSON side.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.toml()
            .or_else(|| self.json())
            .and_then(Utf8Path::file_stem)
            .unwrap_or_default()
    }
}

/// Display name of a fixture file, relative to its version directory.
#[must_use]
pub fn display_name(category: Category, path: &Utf8Path) -> String {
    let file_name = path.file_name().unwrap_or(path.as_str());
    format!("{category}/{file_name}")
}

/// Fixture tree for one version.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: Utf8PathBuf,
}

impl Corpus {
    /// Locates the corpus for `version` beneath `tests_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::MissingCorpus`] when the version directory
    /// does not exist.
    pub fn open(tests_dir: &Utf8Path, version: TestVersion) -> Result<Self, ComplianceError> {
        let root = tests_dir.join(version.as_str());
        if open_optional_dir(&root)?.is_none() {
            return Err(ComplianceError::MissingCorpus(root));
        }
        Ok(Self { root })
    }

    /// Root directory of this corpus version.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Lazily yields invalid TOML, invalid JSON, then valid pairs.
    ///
    /// A valid TOML file without its JSON counterpart yields
    /// [`ComplianceError::MissingPair`].
    ///
    /// # Errors
    ///
    /// Returns an I/O error when a category directory exists but cannot be
    /// listed.
    pub fn pairs(
        &self,
    ) -> Result<impl Iterator<Item = Result<FixturePair, ComplianceError>>, ComplianceError> {
        let invalid_dir = self.root.join(Category::Invalid.as_str());
        let valid_dir = self.root.join(Category::Valid.as_str());

        let invalid_toml = Listing::open(invalid_dir.clone(), TOML_EXTENSION)?
            .map(|found| found.map(|toml| FixturePair::InvalidFormat { toml }));
        let invalid_json = Listing::open(invalid_dir, JSON_EXTENSION)?
            .map(|found| found.map(|json| FixturePair::InvalidData { json }));

        let valid_handle = open_optional_dir(&valid_dir)?;
        let valid = Listing::open(valid_dir, TOML_EXTENSION)?
            .map(move |found| found.and_then(|toml| pair_valid(valid_handle.as_ref(), toml)));

        Ok(invalid_toml
            .chain(invalid_json)
            .chain(valid)
            .inspect(|pair| {
                if let Ok(found) = pair {
                    debug!(stem = found.stem(), category = %found.category(), "located fixture");
                }
            }))
    }
}

fn pair_valid(dir: Option<&Dir>, toml: Utf8PathBuf) -> Result<FixturePair, ComplianceError> {
    let json = toml.with_extension(JSON_EXTENSION);
    let Some((dir, name)) = dir.zip(json.file_name()) else {
        return Err(ComplianceError::MissingPair(json));
    };
    match dir.metadata(name) {
        Ok(meta) if meta.is_file() => Ok(FixturePair::Valid { toml, json }),
        Ok(_) => Err(ComplianceError::MissingPair(json)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ComplianceError::MissingPair(json))
        }
        Err(source) => Err(ComplianceError::Io { path: json, source }),
    }
}

/// Regular files in one directory carrying one extension.
struct Listing {
    dir: Utf8PathBuf,
    extension: &'static str,
    entries: Option<ReadDir>,
}

impl Listing {
    fn open(dir: Utf8PathBuf, extension: &'static str) -> Result<Self, ComplianceError> {
        let entries = open_optional_dir(&dir)?
            .map(|handle| handle.entries())
            .transpose()
            .map_err(|source| ComplianceError::Io {
                path: dir.clone(),
                source,
            })?;
        Ok(Self {
            dir,
            extension,
            entries,
        })
    }

    fn accept(&self, entry: &DirEntry) -> Result<Option<Utf8PathBuf>, ComplianceError> {
        let name = entry.file_name().map_err(|source| {
            if source.kind() == std::io::ErrorKind::InvalidData {
                ComplianceError::NonUtf8Name {
                    dir: self.dir.clone(),
                }
            } else {
                ComplianceError::Io {
                    path: self.dir.clone(),
                    source,
                }
            }
        })?;
        let file_type = entry.file_type().map_err(|source| ComplianceError::Io {
            path: self.dir.join(&name),
            source,
        })?;
        let path = self.dir.join(name);
        if !file_type.is_file() || path.extension() != Some(self.extension) {
            return Ok(None);
        }
        Ok(Some(path))
    }
}

impl Iterator for Listing {
    type Item = Result<Utf8PathBuf, ComplianceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.as_mut()?.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    return Some(Err(ComplianceError::Io {
                        path: self.dir.clone(),
                        source,
                    }));
                }
            };
            match self.accept(&entry) {
                Ok(Some(path)) => return Some(Ok(path)),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
