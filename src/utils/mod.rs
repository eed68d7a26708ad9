use std::path::{Component, Path, PathBuf};

/// The name of the per-package overrides declaration file
pub const OVERRIDES_FILE: &str = "overrides.json";

/// Current driftwatch version
pub const DRIFTWATCH_VERSION: &str = "0.1.0";

/// Get the path to a package's overrides declaration file
pub fn get_overrides_path(package_base: &Path) -> PathBuf {
    package_base.join(OVERRIDES_FILE)
}

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Lexically normalize a path: resolve `.` and `..` components without
/// touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}
