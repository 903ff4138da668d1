//! Supported corpus versions.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A TOML specification version with its own fixture subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum TestVersion {
    /// TOML v0.4.0.
    #[value(name = "v0.4")]
    #[serde(rename = "v0.4")]
    V0_4,
    /// TOML v1.0.0-rc.1.
    #[default]
    #[value(name = "v1.0.0-rc1")]
    #[serde(rename = "v1.0.0-rc1")]
    V1_0_0Rc1,
}

impl TestVersion {
    /// The version used when none is selected.
    pub const LATEST: Self = Self::V1_0_0Rc1;

    /// Every supported version, oldest first.
    pub const ALL: [Self; 2] = [Self::V0_4, Self::V1_0_0Rc1];

    /// Name of the corpus directory for this version.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V0_4 => "v0.4",
            Self::V1_0_0Rc1 => "v1.0.0-rc1",
        }
    }
}

impl fmt::Display for TestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
