use super::{InstalledPackage, LocatorError, PackageLocator};
use crate::version::PackageVersion;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Locator over a directory-per-version package layout.
///
/// Installed packages live directly under the install root as
/// `{name}-{version}` directories; historical copies of packages live
/// under a separate archive root as `{name}-{version}` entries (an
/// arbitrary suffix after the version token is tolerated). The version
/// token is the `-`-separated segment that follows the package-name
/// prefix.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    install_root: PathBuf,
    archive_root: PathBuf,
}

impl DirectoryLocator {
    pub fn new(install_root: impl Into<PathBuf>, archive_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            archive_root: archive_root.into(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }

    /// Top-level directory entries of a root, skipping unreadable ones.
    fn scan_entries(root: &Path) -> Vec<(String, PathBuf)> {
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                Some((name, e.path().to_path_buf()))
            })
            .collect()
    }

    /// Extract the version token of a `{package}-{version}` entry name.
    ///
    /// Returns the segment between the package-name prefix and the next
    /// `-` (or the end of the name). Entries for other packages, or with
    /// a token that is not a parseable version, yield `None`.
    fn version_token(package: &str, entry_name: &str) -> Option<PackageVersion> {
        let rest = entry_name.strip_prefix(package)?.strip_prefix('-')?;
        let token = rest.split('-').next()?;
        PackageVersion::parse(token).ok()
    }
}

#[async_trait]
impl PackageLocator for DirectoryLocator {
    async fn resolve_installed(&self, package: &str) -> Result<InstalledPackage, LocatorError> {
        let mut best: Option<InstalledPackage> = None;

        for (name, path) in Self::scan_entries(&self.install_root) {
            let Some(version) = Self::version_token(package, &name) else {
                continue;
            };

            // Several installed versions: the highest wins.
            if best.as_ref().map_or(true, |b| version > b.version) {
                best = Some(InstalledPackage {
                    name: package.to_string(),
                    version,
                    base_path: path,
                });
            }
        }

        best.ok_or_else(|| LocatorError::PackageNotFound(package.to_string()))
    }

    async fn resolve_historical(
        &self,
        package: &str,
        version: &PackageVersion,
    ) -> Result<Option<PathBuf>, LocatorError> {
        for (name, path) in Self::scan_entries(&self.archive_root) {
            if Self::version_token(package, &name).as_ref() == Some(version) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    async fn installed_packages(&self) -> Result<Vec<InstalledPackage>, LocatorError> {
        let mut packages = Vec::new();

        for (name, path) in Self::scan_entries(&self.install_root) {
            // `{name}-{version}`: the version token is the segment after
            // the last `-` that parses as a version.
            let Some((package, version_str)) = name.rsplit_once('-') else {
                continue;
            };
            let Ok(version) = PackageVersion::parse(version_str) else {
                continue;
            };

            packages.push(InstalledPackage {
                name: package.to_string(),
                version,
                base_path: path,
            });
        }

        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packages)
    }
}
