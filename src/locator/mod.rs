//! Package location on the filesystem.
//!
//! Resolving "where does the installed copy of package X live" and "where
//! is the historical copy of X at version V" is packaging-ecosystem
//! specific, so it sits behind the [`PackageLocator`] trait; the
//! reconciliation engine never pattern-matches directory names itself.

mod directory;

pub use directory::DirectoryLocator;

use crate::version::PackageVersion;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Package not installed: {0}")]
    PackageNotFound(String),
}

/// An installed package resolved on disk.
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub name: String,
    pub version: PackageVersion,
    /// Base directory the package's relative paths resolve against.
    pub base_path: PathBuf,
}

/// Capability for resolving installed and historical package locations.
#[async_trait]
pub trait PackageLocator: Send + Sync {
    /// Resolve the currently installed copy of a package.
    async fn resolve_installed(&self, package: &str) -> Result<InstalledPackage, LocatorError>;

    /// Resolve the base directory of a historical copy of a package at
    /// the given version. `Ok(None)` means no matching copy exists; this
    /// is an expected per-declaration condition, not an error.
    async fn resolve_historical(
        &self,
        package: &str,
        version: &PackageVersion,
    ) -> Result<Option<PathBuf>, LocatorError>;

    /// List every package installed under this locator.
    async fn installed_packages(&self) -> Result<Vec<InstalledPackage>, LocatorError>;
}
