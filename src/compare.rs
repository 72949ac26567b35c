//! Two-way comparison of a reference snapshot against the current exports
//!
//! A symbol in the reference but not in the current library is *missing*
//! and breaks the ABI. A symbol only in the current library is *new*: it
//! extends the ABI without breaking it, but the snapshot still has to be
//! regenerated.

use crate::symbols::ExportedSymbolSet;

/// Outcome of comparing two exported symbol sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    /// reference − current
    pub missing: ExportedSymbolSet,
    /// current − reference
    pub new: ExportedSymbolSet,
}

/// Compare reference and current export sets
///
/// # Example
/// ```
/// use abi_check::compare::compare;
/// use abi_check::symbols::ExportedSymbolSet;
///
/// let reference: ExportedSymbolSet = ["foo", "bar"].into_iter().collect();
/// let current: ExportedSymbolSet = ["foo", "baz"].into_iter().collect();
///
/// let result = compare(&reference, &current);
/// assert!(result.missing.contains("bar"));
/// assert!(result.new.contains("baz"));
/// ```
pub fn compare(reference: &ExportedSymbolSet, current: &ExportedSymbolSet) -> ComparisonResult {
    ComparisonResult {
        missing: reference.difference(current),
        new: current.difference(reference),
    }
}

impl ComparisonResult {
    /// No symbol was added or removed
    pub fn is_compatible(&self) -> bool {
        self.missing.is_empty() && self.new.is_empty()
    }

    /// At least one previously exported symbol is gone
    pub fn is_breaking(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Human-readable report: missing symbols first, then new ones
    ///
    /// Empty when the sets match.
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        if !self.missing.is_empty() {
            report.push_str(
                "There are missing symbols in the new library. It is a breaking change. \
                 Do not forget to update the ABI version according to the ABI policy.\n",
            );
            report.push_str("The following symbols are missing from the new object file:\n\n");
            report.push_str(&self.missing.to_string());
        }

        if !self.new.is_empty() {
            if !report.is_empty() {
                report.push('\n');
            }
            report.push_str(
                "There are new symbols in the new library. It is a non-breaking change. \
                 Regenerate the snapshot with --mode dump_symbols.\n",
            );
            report.push_str("The following symbols are new to the object file:\n\n");
            report.push_str(&self.new.to_string());
        }

        report
    }
}
