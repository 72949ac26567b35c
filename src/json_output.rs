//! JSON output format for check results
//!
//! `--format json` prints one object so build pipelines can consume the
//! comparison without scraping the text report.

use crate::compare::ComparisonResult;
use crate::symbols::ExportedSymbolSet;
use serde::{Deserialize, Serialize};

/// Serialized form of a comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonComparison {
    /// True when no symbol was added or removed
    pub compatible: bool,
    /// Symbols removed since the reference snapshot (breaking)
    pub missing: ExportedSymbolSet,
    /// Symbols added since the reference snapshot (non-breaking)
    pub new: ExportedSymbolSet,
}

impl From<&ComparisonResult> for JsonComparison {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            compatible: result.is_compatible(),
            missing: result.missing.clone(),
            new: result.new.clone(),
        }
    }
}

impl JsonComparison {
    /// Pretty-printed JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
