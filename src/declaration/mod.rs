//! Override declarations and the reconciliation engine.
//!
//! A [`Declaration`] pairs a locally customized file with the vanilla
//! file and package version it was copied from. [`Declaration::check`]
//! detects whether the upstream file changed since that baseline and, if
//! so, attempts a three-way merge of (customization, baseline vanilla,
//! current vanilla), optionally writing the merge result back over the
//! customization.

use crate::locator::{LocatorError, PackageLocator};
use crate::report::CheckSink;
use crate::tools::{MergeTools, ToolStatus};
use crate::utils::normalize_path;
use crate::version::{compare_versions, PackageVersion, VersionComparison, VersionError};
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum DeclarationError {
    #[error("File to be overridden is not found: {}", .0.display())]
    OverrideSourceMissing(PathBuf),

    #[error("Locator error: {0}")]
    LocatorError(#[from] LocatorError),

    #[error("Version error: {0}")]
    VersionError(#[from] VersionError),
}

/// Declaration of one overridden file. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Package the vanilla file originates from.
    pub source_package: String,
    /// Version of `source_package` the customization was written against.
    pub baseline_version: PackageVersion,
    /// Path of the file inside `source_package`.
    pub relative_path: PathBuf,
    /// Package holding the customization.
    pub local_package: String,
    /// Path of the customized file inside `local_package`.
    pub local_relative_path: PathBuf,

    /// Resolved absolute path of the vanilla file in the currently
    /// installed `source_package`.
    pub current_file_path: PathBuf,
    /// Resolved absolute path of the customized file.
    pub local_file_path: PathBuf,
    /// Version of the currently installed `source_package`.
    pub installed_version: PackageVersion,
}

impl Declaration {
    /// Build a declaration, resolving both file paths through the
    /// locator.
    ///
    /// Fails when the source or local package is not installed, the
    /// baseline version string does not parse, or the declared file does
    /// not exist inside the installed source package. The last case means
    /// the declaration itself is broken and must not be silently carried
    /// along.
    pub async fn new(
        locator: &dyn PackageLocator,
        source_package: &str,
        baseline_version: &str,
        relative_path: &str,
        local_package: &str,
        local_relative_path: &str,
    ) -> Result<Self, DeclarationError> {
        let baseline_version = PackageVersion::parse(baseline_version)?;
        let installed = locator.resolve_installed(source_package).await?;
        let local = locator.resolve_installed(local_package).await?;

        let current_file_path = normalize_path(&installed.base_path.join(relative_path));
        let local_file_path = normalize_path(&local.base_path.join(local_relative_path));

        if !current_file_path.exists() {
            return Err(DeclarationError::OverrideSourceMissing(current_file_path));
        }

        Ok(Self {
            source_package: source_package.to_string(),
            baseline_version,
            relative_path: PathBuf::from(relative_path),
            local_package: local_package.to_string(),
            local_relative_path: PathBuf::from(local_relative_path),
            current_file_path,
            local_file_path,
            installed_version: installed.version,
        })
    }

    /// True iff the installed source package is still at the baseline
    /// version. Pure parsed-version comparison, no I/O.
    pub fn is_latest(&self) -> bool {
        self.installed_version == self.baseline_version
    }

    /// Reconcile this declaration against the installed source package.
    ///
    /// Runs the full state machine: up-to-date short-circuit, baseline
    /// lookup through the locator, baseline-vs-current diff, three-way
    /// merge, and optional persistence of the merge output (verbatim,
    /// conflict markers included) when `write` is set.
    ///
    /// Returns true only when no upstream change existed or the merge was
    /// clean. Missing baseline, tool failures, unresolved conflicts, and
    /// persistence failures all return false; none of them aborts the
    /// surrounding run.
    pub async fn check(
        &self,
        sink: &dyn CheckSink,
        locator: &dyn PackageLocator,
        tools: &dyn MergeTools,
        write: bool,
    ) -> bool {
        if self.is_latest() {
            sink.info(&format!(
                "The override {} in package {} is already based on version {}. Nothing to do.",
                self.relative_path.display(),
                self.source_package,
                self.baseline_version
            ));
            return true;
        }

        sink.info(&format!(
            "The override {} in package {} is based on version {}. Currently installed version is {}. Checking for changes.",
            self.relative_path.display(),
            self.source_package,
            self.baseline_version,
            self.installed_version
        ));
        if compare_versions(&self.baseline_version, &self.installed_version)
            == VersionComparison::BaselineAhead
        {
            sink.warn(&format!(
                "Baseline version {} is newer than the installed {}. Was package {} downgraded?",
                self.baseline_version, self.installed_version, self.source_package
            ));
        }

        // Locate the baseline copy of the source package.
        let baseline_dir = match locator
            .resolve_historical(&self.source_package, &self.baseline_version)
            .await
        {
            Ok(Some(dir)) => dir,
            Ok(None) => {
                sink.error(&format!(
                    "Did not find version {} of package {}",
                    self.baseline_version, self.source_package
                ));
                return false;
            }
            Err(e) => {
                sink.error(&format!(
                    "Failed looking up version {} of package {}: {}",
                    self.baseline_version, self.source_package, e
                ));
                return false;
            }
        };
        let baseline_file_path = normalize_path(&baseline_dir.join(&self.relative_path));

        // Did the vanilla file change between baseline and installed?
        let diff = tools.diff(&baseline_file_path, &self.current_file_path).await;
        match diff.status {
            ToolStatus::Clean => {
                sink.info("No changes found. Nothing to do!");
                return true;
            }
            ToolStatus::Differences => {
                sink.info("Found some changes!");
                sink.debug(&diff.text_lossy());
            }
            ToolStatus::Failed => {
                sink.error("Error while performing diff!");
                sink.error(&diff.text_lossy());
                return false;
            }
        }

        let merge = tools
            .merge_three_way(
                &self.local_file_path,
                &baseline_file_path,
                &self.current_file_path,
            )
            .await;
        match merge.status {
            ToolStatus::Clean => sink.info("Three-way merge was successful!"),
            ToolStatus::Differences => {
                sink.warn("Conflicts detected! Please fix them on your own!")
            }
            ToolStatus::Failed => {
                sink.error("Error while merging three-way!");
                sink.error(&merge.text_lossy());
                return false;
            }
        }

        let mut ok = merge.status == ToolStatus::Clean;

        if write {
            // Persist the merge output verbatim, conflict markers included.
            match fs::write(&self.local_file_path, &merge.text).await {
                Ok(()) => {
                    if merge.status == ToolStatus::Differences {
                        sink.info(&format!(
                            "Changes (with conflicts) written into {}",
                            self.local_file_path.display()
                        ));
                    } else {
                        sink.info(&format!(
                            "Changes written into {}",
                            self.local_file_path.display()
                        ));
                    }
                }
                Err(e) => {
                    sink.error(&format!(
                        "Failed writing changes into {}: {}",
                        self.local_file_path.display(),
                        e
                    ));
                    ok = false;
                }
            }
        } else {
            sink.info(&format!(
                "Changes NOT written into {}",
                self.local_file_path.display()
            ));
        }

        ok
    }
}

/// Ordered, append-only set of declarations belonging to one local
/// package.
#[derive(Debug, Clone)]
pub struct DeclarationCollection {
    local_package: String,
    declarations: Vec<Declaration>,
}

impl DeclarationCollection {
    pub fn new(local_package: impl Into<String>) -> Self {
        Self {
            local_package: local_package.into(),
            declarations: Vec::new(),
        }
    }

    pub fn local_package(&self) -> &str {
        &self.local_package
    }

    /// Construct a declaration for this collection's local package and
    /// append it. Construction failures propagate; nothing is appended in
    /// that case.
    pub async fn add(
        &mut self,
        locator: &dyn PackageLocator,
        source_package: &str,
        baseline_version: &str,
        relative_path: &str,
        local_relative_path: &str,
    ) -> Result<(), DeclarationError> {
        let declaration = Declaration::new(
            locator,
            source_package,
            baseline_version,
            relative_path,
            &self.local_package,
            local_relative_path,
        )
        .await?;
        self.declarations.push(declaration);
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl<'a> IntoIterator for &'a DeclarationCollection {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}
