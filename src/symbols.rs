//! Symbol model shared by the parser, filter, snapshot and comparator

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Linkage visibility of a symbol as printed by `llvm-readobj --syms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Global,
    Weak,
    Local,
    Unknown,
}

impl Binding {
    /// Map the leading word of a `Binding:` field (e.g. "Global (0x1)")
    pub fn from_readobj(word: &str) -> Self {
        match word {
            "Global" => Binding::Global,
            "Weak" => Binding::Weak,
            "Local" => Binding::Local,
            _ => Binding::Unknown,
        }
    }

    /// Global and weak symbols are visible to the dynamic linker
    pub fn is_exported(self) -> bool {
        matches!(self, Binding::Global | Binding::Weak)
    }
}

/// Symbol type as printed by `llvm-readobj --syms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Object,
    Unknown,
}

impl SymbolKind {
    /// Map the leading word of a `Type:` field (e.g. "Function (0x2)")
    pub fn from_readobj(word: &str) -> Self {
        match word {
            "Function" => SymbolKind::Function,
            "Object" => SymbolKind::Object,
            _ => SymbolKind::Unknown,
        }
    }
}

/// One candidate symbol extracted from a readobj dump
///
/// Export-table records only carry a name; their other fields stay
/// `Unknown`/empty and the export filter lets them through unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    /// Symbol name, never empty
    pub name: String,
    pub binding: Binding,
    pub kind: SymbolKind,
    /// Section identifier (".text", "Undefined", ...), empty if not observed
    pub section: String,
}

impl SymbolRecord {
    /// Record from an export table, where only the name is observable
    pub fn export(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Unknown,
            kind: SymbolKind::Unknown,
            section: String::new(),
        }
    }
}

/// Set of exported symbol names, kept sorted for deterministic output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportedSymbolSet {
    names: BTreeSet<String>,
}

impl ExportedSymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name; returns false if it was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Names present in `self` but not in `other`
    pub fn difference(&self, other: &ExportedSymbolSet) -> ExportedSymbolSet {
        self.names.difference(&other.names).cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExportedSymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for ExportedSymbolSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl fmt::Display for ExportedSymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.iter() {
            writeln!(f, "{}", name)?;
        }
        Ok(())
    }
}
