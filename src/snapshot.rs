//! Snapshot codec: the on-disk record of a library's exported symbols
//!
//! Format: a block of `#` comment lines, a blank line, then the sorted
//! symbol names one per line with a trailing newline. Decoding skips blank
//! and comment lines, so header content can change without breaking old
//! readers.

use crate::error::{AbiCheckError, Result};
use crate::platform::Platform;
use crate::symbols::ExportedSymbolSet;
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

/// Marker for header and comment lines
pub const COMMENT_MARKER: char = '#';

const BANNER: &str =
    "################################################################################";

/// Metadata rendered into the snapshot header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    /// File name of the inspected library (no directory)
    pub target_name: String,
    pub platform: Platform,
}

impl SnapshotHeader {
    pub fn new(target: &Path, platform: Platform) -> Self {
        let target_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.display().to_string());
        Self {
            target_name,
            platform,
        }
    }

    /// Header lines, each starting with the comment marker, ending in a blank line
    pub fn render(&self) -> String {
        let lib_dir = match self.platform {
            Platform::Elf => "%sycl_libs_dir",
            Platform::Coff => "%llvm_build_bin_dir",
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", BANNER);
        let _ = writeln!(out, "# This file is automatically generated by abi-check.");
        let _ = writeln!(
            out,
            "# DO NOT EDIT IT MANUALLY. Regenerate it with `abi-check --mode dump_symbols`."
        );
        let _ = writeln!(out, "{}", BANNER);
        out.push('\n');
        let _ = writeln!(
            out,
            "# RUN: env LLVM_BIN_PATH=%llvm_build_bin_dir abi-check --mode check_symbols --reference %s {}/{}",
            lib_dir, self.target_name
        );
        let _ = writeln!(out, "# REQUIRES: {}", self.platform.requires_feature());
        let _ = writeln!(out, "# UNSUPPORTED: libcxx");
        out.push('\n');
        out
    }
}

/// Serialize a symbol set with its header
pub fn encode(symbols: &ExportedSymbolSet, header: &SnapshotHeader) -> String {
    let mut out = header.render();
    for name in symbols.iter() {
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Read a symbol set back, skipping blank and comment lines
pub fn decode(text: &str) -> ExportedSymbolSet {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .collect()
}

/// Load the reference snapshot used by check mode
pub fn read_snapshot(path: &Path) -> Result<ExportedSymbolSet> {
    let text = fs::read_to_string(path).map_err(|source| AbiCheckError::MissingReference {
        path: path.to_path_buf(),
        source,
    })?;
    let symbols = decode(&text);
    debug!(path = %path.display(), symbols = symbols.len(), "read reference snapshot");
    Ok(symbols)
}

/// Temporary file in `dir` created with the mode a plain `File::create` would get
fn snapshot_tempfile(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".abi-snapshot");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Replace the snapshot at `path` in one step
///
/// The content goes to a temporary file next to `path` which is then
/// renamed over it, so readers never observe a partial snapshot.
pub fn write_snapshot(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| AbiCheckError::SnapshotWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = snapshot_tempfile(dir).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    // A replaced snapshot keeps its mode; a new one gets the umask default
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }
    file.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), bytes = contents.len(), "wrote snapshot");
    Ok(())
}
