//! Parsers for `llvm-readobj` symbol listings
//!
//! Two listings are understood:
//! - `--syms` on ELF objects, one `Symbol { ... }` block per symbol with
//!   `Name:`, `Binding:`, `Type:` and `Section:` fields
//! - `--coff-exports` on DLLs, one `Export { ... }` block per exported entry
//!   point with a `Name:` field
//!
//! Blocks may appear in any order and with arbitrary indentation. Blocks
//! without a usable name are dropped rather than defaulted.

use crate::symbols::{Binding, SymbolKind, SymbolRecord};
use regex::Regex;
use std::sync::LazyLock;

static ELF_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSymbol\s*\{([^}]*)\}").expect("valid ELF block pattern"));

static COFF_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bExport\s*\{([^}]*)\}").expect("valid COFF block pattern"));

// `Label: value` on its own line
static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([A-Za-z]+):[ \t]*(.*?)[ \t\r]*$").expect("valid field pattern")
});

// ELF names carry their string table offset: "foo (12)"
static STRTAB_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d+\)$").expect("valid strtab suffix pattern"));

/// Turns raw readobj text into candidate symbol records, in source order
pub trait SymbolParser {
    fn parse(&self, raw: &str) -> Vec<SymbolRecord>;
}

/// Value of the first `label:` field in a block body
fn field<'a>(body: &'a str, label: &str) -> Option<&'a str> {
    FIELD
        .captures_iter(body)
        .find(|caps| &caps[1] == label)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// First whitespace-separated word of a field value
fn leading_word(value: &str) -> Option<&str> {
    value.split_whitespace().next()
}

/// Parser for ELF `--syms` output
#[derive(Debug, Default, Clone, Copy)]
pub struct ElfSymbolParser;

impl ElfSymbolParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_block(body: &str) -> Option<SymbolRecord> {
        let raw_name = STRTAB_SUFFIX.replace(field(body, "Name")?, "");
        let name = leading_word(&raw_name)?;

        let binding = field(body, "Binding")
            .and_then(leading_word)
            .map_or(Binding::Unknown, Binding::from_readobj);
        let kind = field(body, "Type")
            .and_then(leading_word)
            .map_or(SymbolKind::Unknown, SymbolKind::from_readobj);
        let section = field(body, "Section")
            .and_then(leading_word)
            .unwrap_or_default();

        Some(SymbolRecord {
            name: name.to_string(),
            binding,
            kind,
            section: section.to_string(),
        })
    }
}

impl SymbolParser for ElfSymbolParser {
    fn parse(&self, raw: &str) -> Vec<SymbolRecord> {
        ELF_BLOCK
            .captures_iter(raw)
            .filter_map(|caps| Self::parse_block(&caps[1]))
            .collect()
    }
}

/// Parser for COFF `--coff-exports` output
#[derive(Debug, Default, Clone, Copy)]
pub struct CoffExportParser;

impl CoffExportParser {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolParser for CoffExportParser {
    fn parse(&self, raw: &str) -> Vec<SymbolRecord> {
        COFF_BLOCK
            .captures_iter(raw)
            .filter_map(|caps| {
                let body = caps.get(1)?.as_str();
                field(body, "Name")
                    .and_then(leading_word)
                    .map(SymbolRecord::export)
            })
            .collect()
    }
}
