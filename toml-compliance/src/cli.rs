//! Command-line interface definitions for `toml-compliance`.

use std::io::IsTerminal;

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::version::TestVersion;

/// When the report is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour when stdout is a terminal.
    #[default]
    Auto,
    /// Always colour.
    Always,
    /// Never colour.
    Never,
}

impl ColorChoice {
    /// Decides whether to colour output written to stdout.
    #[must_use]
    pub fn should_colorize(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Parsed CLI arguments for `toml-compliance`.
#[derive(Debug, Parser)]
#[command(name = "toml-compliance")]
#[command(about = "Check TOML encoders and decoders against the compliance test corpus")]
pub struct Cli {
    /// Settings file (defaults to `toml-compliance.toml` when present).
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Root directory of the fixture corpus.
    #[arg(long, global = true, value_name = "path")]
    pub tests_dir: Option<Utf8PathBuf>,
    /// When to colour the report.
    #[arg(long, global = true, value_enum, value_name = "when")]
    pub color: Option<ColorChoice>,
    /// Program kind to test.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands selecting the program kind under test.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Test an encoder by round-tripping JSON fixtures through it.
    Encoder(EncoderArgs),
    /// Test a decoder against TOML fixtures.
    Decoder(DecoderArgs),
}

/// Arguments of the `encoder` subcommand.
#[derive(Debug, Clone, ClapArgs)]
pub struct EncoderArgs {
    /// Encoder to test.
    pub target: Utf8PathBuf,
    /// Supporting decoder used to read the encoder's output back.
    #[arg(long, value_name = "path")]
    pub decoder: Utf8PathBuf,
    /// Fixture selection.
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments of the `decoder` subcommand.
#[derive(Debug, Clone, ClapArgs)]
pub struct DecoderArgs {
    /// Decoder to test.
    pub target: Utf8PathBuf,
    /// Fixture selection.
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Fixture selection flags shared by both subcommands.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct SelectionArgs {
    /// TOML version to use for tests (default: the latest).
    #[arg(long, value_enum)]
    pub version: Option<TestVersion>,
    /// Only run tests that match the given marker. Can be repeated.
    #[arg(short = 'm', value_name = "MARKER")]
    pub markers: Vec<String>,
}

impl Command {
    /// Selection flags of whichever subcommand was chosen.
    #[must_use]
    pub const fn selection(&self) -> &SelectionArgs {
        match self {
            Self::Encoder(args) => &args.selection,
            Self::Decoder(args) => &args.selection,
        }
    }
}
