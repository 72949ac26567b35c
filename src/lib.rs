//! abi-check - exported-symbol ABI checker for shared libraries
//!
//! This library extracts the exported function symbols of an ELF shared
//! object or a Windows DLL through `llvm-readobj`, records them in a
//! snapshot file, and compares later builds against that snapshot to flag
//! removed (breaking) and added (non-breaking) symbols.

pub mod cli;
pub mod commands;
pub mod compare;
pub mod error;
pub mod filter;
pub mod ignore_list;
pub mod json_output;
pub mod parser;
pub mod platform;
pub mod readobj;
pub mod snapshot;
pub mod symbols;

pub use error::{AbiCheckError, Result};
