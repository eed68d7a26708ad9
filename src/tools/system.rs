use super::{MergeTools, ToolOutput, ToolStatus};
use crate::utils::normalize_path;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use tokio::process::Command;

/// Default line-diff program.
const DIFF_PROGRAM: &str = "diff";

/// Default three-way merge program.
const MERGE_PROGRAM: &str = "diff3";

/// [`MergeTools`] backend that shells out to `diff -p` and `diff3 -m`.
///
/// The program names are plain fields so an alternative toolchain (or a
/// deliberately broken one, in tests) can be substituted without touching
/// the reconciliation state machine.
#[derive(Debug, Clone)]
pub struct SystemTools {
    pub diff_program: String,
    pub merge_program: String,
}

impl Default for SystemTools {
    fn default() -> Self {
        Self {
            diff_program: DIFF_PROGRAM.to_string(),
            merge_program: MERGE_PROGRAM.to_string(),
        }
    }
}

impl SystemTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a tool invocation as a scoped subprocess: pipes are fully
    /// drained and the exit code captured before returning. Spawn
    /// failures and signal deaths are converted into `Failed` with a
    /// descriptive message, never propagated as errors.
    async fn run<I, S>(&self, program: &str, args: I) -> ToolOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        match Command::new(program).args(args).output().await {
            Ok(output) => {
                let status = ToolStatus::from_exit_code(output.status.code());
                let text = match status {
                    ToolStatus::Failed => {
                        if output.stderr.is_empty() {
                            format!("{program} exited with {}", output.status).into_bytes()
                        } else {
                            output.stderr
                        }
                    }
                    _ => output.stdout,
                };
                ToolOutput { text, status }
            }
            Err(e) => ToolOutput {
                text: format!("failed to invoke {program}: {e}").into_bytes(),
                status: ToolStatus::Failed,
            },
        }
    }
}

#[async_trait]
impl MergeTools for SystemTools {
    async fn diff(&self, original: &Path, changed: &Path) -> ToolOutput {
        let original = normalize_path(original);
        let changed = normalize_path(changed);

        self.run(
            &self.diff_program,
            [OsStr::new("-p"), original.as_os_str(), changed.as_os_str()],
        )
        .await
    }

    async fn merge_three_way(&self, mine: &Path, old: &Path, yours: &Path) -> ToolOutput {
        self.run(
            &self.merge_program,
            [
                OsStr::new("-m"),
                mine.as_os_str(),
                old.as_os_str(),
                yours.as_os_str(),
            ],
        )
        .await
    }
}
