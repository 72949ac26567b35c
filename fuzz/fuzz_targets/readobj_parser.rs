#![no_main]

use abi_check::parser::{CoffExportParser, ElfSymbolParser, SymbolParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary readobj output must never panic or yield an empty name
    if let Ok(input) = std::str::from_utf8(data) {
        for record in ElfSymbolParser::new().parse(input) {
            assert!(!record.name.is_empty());
        }
        for record in CoffExportParser::new().parse(input) {
            assert!(!record.name.is_empty());
        }
    }
});
