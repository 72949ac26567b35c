//! CLI argument parsing for abi-check

use crate::error::{AbiCheckError, Result};
use crate::ignore_list::IgnoreList;
use crate::readobj::LLVM_BIN_PATH_ENV;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What the invocation does with the target library
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Compare exported symbols against a reference snapshot
    #[value(name = "check_symbols")]
    CheckSymbols,
    /// Write the exported symbols to a snapshot file
    #[value(name = "dump_symbols")]
    DumpSymbols,
}

/// Output format for the check report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "abi-check")]
#[command(version)]
#[command(about = "ABI checker: compare exported library symbols against a snapshot", long_about = None)]
pub struct Cli {
    /// ABI checking mode
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Reference ABI dump (required for check_symbols)
    #[arg(long, value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Output for dump mode (required for dump_symbols)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Directory containing llvm-readobj (empty: search PATH)
    #[arg(long, value_name = "DIR", env = LLVM_BIN_PATH_ENV, default_value = "")]
    pub llvm_bin_path: String,

    /// Additional TOML file of symbols to ignore (repeatable)
    #[arg(long = "ignore-file", value_name = "PATH")]
    pub ignore_files: Vec<PathBuf>,

    /// Do not apply the built-in toolchain ignore-list
    #[arg(long)]
    pub no_default_ignores: bool,

    /// Report format for check_symbols
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,

    /// Shared library or DLL to inspect
    pub target_library: PathBuf,
}

impl Cli {
    /// Check that the arguments required by the selected mode are present
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            Mode::CheckSymbols if self.reference.is_none() => Err(AbiCheckError::Configuration(
                "Please specify --reference option. Quitting.".to_string(),
            )),
            Mode::DumpSymbols if self.output.is_none() => Err(AbiCheckError::Configuration(
                "Please specify --output option. Quitting.".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Ignore-list assembled from the defaults and `--ignore-file` entries
    pub fn ignore_list(&self) -> Result<IgnoreList> {
        let mut list = if self.no_default_ignores {
            IgnoreList::empty()
        } else {
            IgnoreList::toolchain_defaults()
        };

        for path in &self.ignore_files {
            list.extend(IgnoreList::from_file(path)?);
        }
        Ok(list)
    }
}
