#![allow(dead_code)]

use async_trait::async_trait;
use driftwatch::tools::{MergeTools, ToolOutput, ToolStatus};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for a test fixture tree.
pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("Should create temp dir")
}

/// Install a package as `{name}-{version}` under the given root, with the
/// given relative-path/content file pairs. Returns the package base path.
pub fn install_package(
    root: &Path,
    name: &str,
    version: &str,
    files: &[(&str, &str)],
) -> PathBuf {
    let base = root.join(format!("{name}-{version}"));

    for (relative, content) in files {
        let path = base.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Should create package dirs");
        }
        std::fs::write(&path, content).expect("Should write package file");
    }

    if files.is_empty() {
        std::fs::create_dir_all(&base).expect("Should create package base");
    }

    base
}

/// Write an `overrides.json` declaring a single override at a package
/// base directory.
pub fn write_single_override(
    package_base: &Path,
    source_package: &str,
    version: &str,
    path: &str,
    local_path: &str,
) {
    let content = serde_json::json!({
        "schemaVersion": 1,
        "overrides": [
            {
                "package": source_package,
                "version": version,
                "path": path,
                "localPath": local_path,
            }
        ]
    });

    std::fs::write(
        package_base.join("overrides.json"),
        serde_json::to_string_pretty(&content).expect("Should serialize overrides"),
    )
    .expect("Should write overrides file");
}

/// [`MergeTools`] stub that records invocations instead of spawning
/// subprocesses. Used to assert that the up-to-date path performs no
/// tool calls at all.
#[derive(Debug, Default)]
pub struct RecordingTools {
    calls: Mutex<Vec<String>>,
}

impl RecordingTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock poisoned").push(call);
    }
}

#[async_trait]
impl MergeTools for RecordingTools {
    async fn diff(&self, original: &Path, changed: &Path) -> ToolOutput {
        self.record(format!(
            "diff {} {}",
            original.display(),
            changed.display()
        ));
        ToolOutput {
            text: Vec::new(),
            status: ToolStatus::Clean,
        }
    }

    async fn merge_three_way(&self, mine: &Path, old: &Path, yours: &Path) -> ToolOutput {
        self.record(format!(
            "merge {} {} {}",
            mine.display(),
            old.display(),
            yours.display()
        ));
        ToolOutput {
            text: Vec::new(),
            status: ToolStatus::Clean,
        }
    }
}
