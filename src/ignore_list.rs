//! Symbols excluded from the exported set regardless of platform
//!
//! Some exports come and go with the toolchain rather than with the library
//! source (linker choice, glibc version, MSVC vs clang-cl). They are listed
//! here with the reason they are ignored. Additional entries can be loaded
//! from a TOML file:
//!
//! ```toml
//! [[ignore]]
//! symbol = "_dl_relocate_static_pie"
//! reason = "only emitted by ld.gold"
//! ```

use crate::error::{AbiCheckError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One ignored symbol and why it is ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IgnoreEntry {
    pub symbol: String,
    #[serde(default)]
    pub reason: String,
}

impl IgnoreEntry {
    pub fn new(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct IgnoreFile {
    #[serde(default)]
    ignore: Vec<IgnoreEntry>,
}

/// Set of symbol names removed after export filtering
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    entries: Vec<IgnoreEntry>,
    names: HashSet<String>,
}

const GLIBC_CSU_REASON: &str = "removed from crt1.o in glibc 2.34; still present when linking \
     against older glibc (e.g. Ubuntu 20.04 ships 2.31)";

const CLANG_CL_PLUGIN_REASON: &str = "clang-cl exports the function-local static `Plugin` of \
     the dllexport'ed getPlugin<Backend>() instantiations; headers never reference it";

const MSVC_HALF_CTOR_REASON: &str = "MSVC exports the constexpr defaulted copy/move \
     constructors of half although trivially copyable halves are memcpy'ed at use sites";

impl IgnoreList {
    /// Empty list: nothing is ignored
    pub fn empty() -> Self {
        Self::default()
    }

    /// Known toolchain artifacts that must not affect the ABI snapshot
    pub fn toolchain_defaults() -> Self {
        let mut entries = vec![
            IgnoreEntry::new(
                "_dl_relocate_static_pie",
                "emitted or not depending on whether ld.gold or ld.lld links the library",
            ),
            IgnoreEntry::new("__libc_csu_fini", GLIBC_CSU_REASON),
            IgnoreEntry::new("__libc_csu_init", GLIBC_CSU_REASON),
        ];

        for backend in ["$01", "$00", "$04", "$02"] {
            entries.push(IgnoreEntry::new(
                format!(
                    "?Plugin@?1???$getPlugin@{}@pi@detail@_V1@sycl@@YAAEBVplugin@234@XZ@4PEBV5234@EB",
                    backend
                ),
                CLANG_CL_PLUGIN_REASON,
            ));
        }

        entries.push(IgnoreEntry::new(
            "??0half@host_half_impl@detail@_V1@sycl@@QEAA@AEBV01234@@Z",
            MSVC_HALF_CTOR_REASON,
        ));
        entries.push(IgnoreEntry::new(
            "??0half@host_half_impl@detail@_V1@sycl@@QEAA@$$QEAV01234@@Z",
            MSVC_HALF_CTOR_REASON,
        ));

        entries.into_iter().collect()
    }

    /// Parse `[[ignore]]` entries from TOML text
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: IgnoreFile = toml::from_str(content)?;
        Ok(file.ignore.into_iter().collect())
    }

    /// Load `[[ignore]]` entries from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AbiCheckError::IgnoreList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| AbiCheckError::IgnoreList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Add an entry; a symbol listed twice keeps its first reason
    pub fn push(&mut self, entry: IgnoreEntry) {
        if self.names.insert(entry.symbol.clone()) {
            self.entries.push(entry);
        }
    }

    /// Merge another list into this one
    pub fn extend(&mut self, other: IgnoreList) {
        for entry in other.entries {
            self.push(entry);
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.names.contains(symbol)
    }

    pub fn entries(&self) -> &[IgnoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<IgnoreEntry> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = IgnoreEntry>>(iter: I) -> Self {
        let mut list = IgnoreList::empty();
        for entry in iter {
            list.push(entry);
        }
        list
    }
}
