//! External diff and three-way merge tools.
//!
//! The reconciliation engine does not implement any diff or merge
//! algorithm itself; it drives line-oriented external tools through the
//! [`MergeTools`] capability. The status contract is fixed regardless of
//! backend: 0 = clean, 1 = differences/conflicts, anything else = the
//! tool invocation itself failed.

mod system;

pub use system::SystemTools;

use async_trait::async_trait;
use std::path::Path;

/// Outcome class of a diff or merge invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// Exit 0: files identical / merge clean.
    Clean,
    /// Exit 1: files differ / merge produced conflict markers.
    Differences,
    /// Exit >= 2, killed by signal, or the process could not be spawned.
    Failed,
}

impl ToolStatus {
    /// Map a process exit code to a status. A missing code (signal death)
    /// counts as failure.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ToolStatus::Clean,
            Some(1) => ToolStatus::Differences,
            _ => ToolStatus::Failed,
        }
    }
}

/// Raw output of a tool invocation.
///
/// `text` is the tool's stdout for `Clean`/`Differences`; for `Failed` it
/// carries a description of the failure instead, so callers can log it
/// without distinguishing the failure mode.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: Vec<u8>,
    pub status: ToolStatus,
}

impl ToolOutput {
    /// Lossy UTF-8 view of the output, for logging.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.text).into_owned()
    }
}

/// Capability interface over the external diff/merge tools.
#[async_trait]
pub trait MergeTools: Send + Sync {
    /// Line-diff two files. `Clean` means byte-identical content,
    /// `Differences` means the files differ.
    async fn diff(&self, original: &Path, changed: &Path) -> ToolOutput;

    /// Three-way merge with conflict-marker output. `mine` is the local
    /// customization, `old` the common ancestor, `yours` the current
    /// upstream file. `Differences` means the merge output contains
    /// conflict markers a human must resolve.
    async fn merge_three_way(&self, mine: &Path, old: &Path, yours: &Path) -> ToolOutput;
}
