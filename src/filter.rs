//! Export filtering: reduce parsed symbol records to the exported function set
//!
//! ELF records must be functions with global or weak binding defined in
//! `.text`. Any unknown field value rejects the record: a missed export shows
//! up as a diff on the next check, a spurious one corrupts the snapshot.
//! Export-table records are accepted as-is since the table only lists
//! callable entry points. The ignore-list is subtracted last.

use crate::ignore_list::IgnoreList;
use crate::platform::Platform;
use crate::symbols::{ExportedSymbolSet, SymbolKind, SymbolRecord};
use tracing::debug;

/// Executable code section of ELF objects
pub const CODE_SECTION: &str = ".text";

/// Predicate composition plus ignore-list subtraction
#[derive(Debug, Clone)]
pub struct ExportFilter {
    platform: Platform,
    ignore: IgnoreList,
}

impl ExportFilter {
    pub fn new(platform: Platform, ignore: IgnoreList) -> Self {
        Self { platform, ignore }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }

    /// Check the structural predicate for one record
    pub fn is_exported_function(&self, record: &SymbolRecord) -> bool {
        match self.platform {
            Platform::Coff => true,
            Platform::Elf => {
                record.kind == SymbolKind::Function
                    && record.binding.is_exported()
                    && record.section == CODE_SECTION
            }
        }
    }

    /// Filter records and subtract the ignore-list
    pub fn apply<'a, I>(&self, records: I) -> ExportedSymbolSet
    where
        I: IntoIterator<Item = &'a SymbolRecord>,
    {
        let mut seen = 0usize;
        let mut rejected = 0usize;
        let mut ignored = 0usize;
        let mut exported = ExportedSymbolSet::new();

        for record in records {
            seen += 1;
            if !self.is_exported_function(record) {
                rejected += 1;
                continue;
            }
            if self.ignore.contains(&record.name) {
                ignored += 1;
                continue;
            }
            exported.insert(record.name.as_str());
        }

        debug!(
            platform = %self.platform,
            seen,
            rejected,
            ignored,
            exported = exported.len(),
            "filtered symbol records"
        );
        exported
    }
}
