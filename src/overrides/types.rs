use serde::{Deserialize, Serialize};

/// On-disk overrides declaration file (`overrides.json` at a package
/// base).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverridesFile {
    pub schema_version: u32,
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
}

/// One declared override: which package/version/path the customization
/// was copied from, and where the customized copy lives locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntry {
    /// Package the vanilla file originates from.
    pub package: String,
    /// Version of `package` the customization was written against.
    pub version: String,
    /// Path of the file inside `package`.
    pub path: String,
    /// Path of the customized copy inside the local package.
    pub local_path: String,
}
