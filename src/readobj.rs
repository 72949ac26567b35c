//! Symbol source: obtain the raw readobj listing for a library
//!
//! The production source runs `llvm-readobj` synchronously. Tests substitute
//! any `Fn(&Path) -> Result<String>` so no toolchain needs to be installed.

use crate::error::{AbiCheckError, Result};
use crate::platform::Platform;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Name of the object dump executable
pub const READOBJ_TOOL: &str = "llvm-readobj";

/// Environment variable holding the directory of the LLVM binaries
pub const LLVM_BIN_PATH_ENV: &str = "LLVM_BIN_PATH";

/// Capability: produce raw symbol listing text for a binary
pub trait SymbolSource {
    fn dump(&self, target: &Path) -> Result<String>;
}

impl<F> SymbolSource for F
where
    F: Fn(&Path) -> Result<String>,
{
    fn dump(&self, target: &Path) -> Result<String> {
        self(target)
    }
}

/// Resolve the readobj executable from an optional directory prefix
///
/// An empty prefix leaves lookup to the `PATH` search of the OS.
pub fn resolve_tool(bin_tool_path: &str) -> PathBuf {
    if bin_tool_path.is_empty() {
        PathBuf::from(READOBJ_TOOL)
    } else {
        Path::new(bin_tool_path).join(READOBJ_TOOL)
    }
}

/// Runs `llvm-readobj` with the listing option of the platform
#[derive(Debug, Clone)]
pub struct ReadobjSource {
    tool: PathBuf,
    platform: Platform,
}

impl ReadobjSource {
    pub fn new(bin_tool_path: &str, platform: Platform) -> Self {
        Self {
            tool: resolve_tool(bin_tool_path),
            platform,
        }
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }
}

impl SymbolSource for ReadobjSource {
    fn dump(&self, target: &Path) -> Result<String> {
        let flag = self.platform.readobj_flag();
        info!(
            tool = %self.tool.display(),
            flag,
            target = %target.display(),
            "running object dump"
        );

        let output = Command::new(&self.tool)
            .arg(flag)
            .arg(target)
            .output()
            .map_err(|source| AbiCheckError::ToolInvocation {
                tool: self.tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AbiCheckError::ToolFailed {
                tool: self.tool.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(bytes = output.stdout.len(), "object dump finished");
        String::from_utf8(output.stdout).map_err(|_| AbiCheckError::InvalidUtf8 {
            tool: self.tool.clone(),
        })
    }
}
