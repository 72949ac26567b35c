//! Dump and check pipelines
//!
//! Both modes share the extraction path: source → parser → filter. Dump
//! encodes the result into a snapshot file, check compares it against one.

use crate::compare::{compare, ComparisonResult};
use crate::error::{AbiCheckError, Result};
use crate::filter::ExportFilter;
use crate::platform::Platform;
use crate::readobj::SymbolSource;
use crate::snapshot::{self, SnapshotHeader};
use crate::symbols::ExportedSymbolSet;
use std::path::Path;
use tracing::{debug, info};

/// Result of a check run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Current exports match the reference exactly
    Compatible,
    /// Symbols were added or removed
    Diverged(ComparisonResult),
}

impl CheckOutcome {
    pub fn is_compatible(&self) -> bool {
        matches!(self, CheckOutcome::Compatible)
    }

    /// The comparison behind a divergence, or an empty one
    pub fn comparison(&self) -> ComparisonResult {
        match self {
            CheckOutcome::Compatible => ComparisonResult::default(),
            CheckOutcome::Diverged(result) => result.clone(),
        }
    }
}

/// Extraction pipeline bound to one symbol source and export filter
pub struct AbiChecker<S> {
    source: S,
    filter: ExportFilter,
}

impl<S: SymbolSource> AbiChecker<S> {
    pub fn new(source: S, filter: ExportFilter) -> Self {
        Self { source, filter }
    }

    pub fn platform(&self) -> Platform {
        self.filter.platform()
    }

    /// Exported function symbols of `target`
    pub fn extract_symbols(&self, target: &Path) -> Result<ExportedSymbolSet> {
        let raw = self.source.dump(target)?;
        let records = self.platform().parser().parse(&raw);
        debug!(records = records.len(), "parsed readobj output");
        Ok(self.filter.apply(&records))
    }

    /// Write the snapshot of `target` to `output`
    ///
    /// Nothing is written unless extraction succeeds.
    pub fn dump_symbols(&self, target: &Path, output: Option<&Path>) -> Result<ExportedSymbolSet> {
        let output = output.ok_or_else(|| {
            AbiCheckError::Configuration("Please specify --output option. Quitting.".to_string())
        })?;

        let symbols = self.extract_symbols(target)?;
        let header = SnapshotHeader::new(target, self.platform());
        snapshot::write_snapshot(output, &snapshot::encode(&symbols, &header))?;

        info!(
            target = %target.display(),
            output = %output.display(),
            symbols = symbols.len(),
            "dumped exported symbols"
        );
        Ok(symbols)
    }

    /// Compare the exports of `target` with the snapshot at `reference`
    ///
    /// The reference is read before the object dump runs.
    pub fn check_symbols(&self, reference: Option<&Path>, target: &Path) -> Result<CheckOutcome> {
        let reference = reference.ok_or_else(|| {
            AbiCheckError::Configuration(
                "Please specify --reference option. Quitting.".to_string(),
            )
        })?;

        let expected = snapshot::read_snapshot(reference)?;
        let current = self.extract_symbols(target)?;
        let result = compare(&expected, &current);

        info!(
            reference = expected.len(),
            current = current.len(),
            missing = result.missing.len(),
            new = result.new.len(),
            "compared exported symbols"
        );

        if result.is_compatible() {
            Ok(CheckOutcome::Compatible)
        } else {
            Ok(CheckOutcome::Diverged(result))
        }
    }
}
