//! Object file family of the host: decides which readobj listing to request
//! and which parser reads it back.

use crate::parser::{CoffExportParser, ElfSymbolParser, SymbolParser};
use std::fmt;

/// Object format whose export surface is inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// ELF shared objects, read from the symbol table (`--syms`)
    Elf,
    /// Windows DLLs, read from the COFF export table (`--coff-exports`)
    Coff,
}

impl Platform {
    /// Platform of the operating system this tool runs on
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Coff
        } else {
            Platform::Elf
        }
    }

    /// `llvm-readobj` option that lists the relevant symbols
    pub fn readobj_flag(self) -> &'static str {
        match self {
            Platform::Elf => "--syms",
            Platform::Coff => "--coff-exports",
        }
    }

    /// Name of the block that wraps each entry in the readobj listing
    pub fn block_marker(self) -> &'static str {
        match self {
            Platform::Elf => "Symbol",
            Platform::Coff => "Export",
        }
    }

    /// Value for the `REQUIRES:` line of a snapshot header
    pub fn requires_feature(self) -> &'static str {
        match self {
            Platform::Elf => "linux",
            Platform::Coff => "windows",
        }
    }

    /// Parser for this platform's readobj listing
    pub fn parser(self) -> Box<dyn SymbolParser> {
        match self {
            Platform::Elf => Box::new(ElfSymbolParser::new()),
            Platform::Coff => Box::new(CoffExportParser::new()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Elf => write!(f, "elf"),
            Platform::Coff => write!(f, "coff"),
        }
    }
}
