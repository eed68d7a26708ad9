//! Loading of per-package override declarations.
//!
//! Each local package registers its overridden files in an
//! `overrides.json` at its base directory; loading builds a
//! [`DeclarationCollection`] through the package locator.

mod types;

pub use types::{OverrideEntry, OverridesFile};

use crate::declaration::{DeclarationCollection, DeclarationError};
use crate::locator::{LocatorError, PackageLocator};
use crate::utils::get_overrides_path;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum OverridesError {
    #[error("Failed to read overrides file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse overrides file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid package identifier: {0}")]
    InvalidPackageName(String),

    #[error("Locator error: {0}")]
    LocatorError(#[from] LocatorError),

    #[error("Declaration error: {0}")]
    DeclarationError(#[from] DeclarationError),
}

/// Package identifiers: dotted lowercase-ish names, no path separators.
static PACKAGE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]+(-[A-Za-z0-9_.]+)*$").expect("valid regex"));

/// Validate a package identifier from an overrides file.
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME_RE.is_match(name)
}

/// Read the overrides file at a package base directory. `Ok(None)` when
/// the package declares no overrides.
pub async fn read_overrides(package_base: &Path) -> Result<Option<OverridesFile>, OverridesError> {
    let path = get_overrides_path(package_base);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).await?;
    let parsed: OverridesFile = serde_json::from_str(&content)?;
    Ok(Some(parsed))
}

/// Load a package's declared overrides into a [`DeclarationCollection`].
///
/// `Ok(None)` when the package carries no overrides file. Per-entry
/// declaration construction failures propagate: a broken declaration
/// means the package's overrides list itself is broken.
pub async fn load_declarations(
    locator: &dyn PackageLocator,
    local_package: &str,
) -> Result<Option<DeclarationCollection>, OverridesError> {
    let installed = locator.resolve_installed(local_package).await?;

    let Some(file) = read_overrides(&installed.base_path).await? else {
        return Ok(None);
    };

    let mut collection = DeclarationCollection::new(local_package);

    for entry in &file.overrides {
        if !is_valid_package_name(&entry.package) {
            return Err(OverridesError::InvalidPackageName(entry.package.clone()));
        }

        collection
            .add(
                locator,
                &entry.package,
                &entry.version,
                &entry.path,
                &entry.local_path,
            )
            .await?;
    }

    Ok(Some(collection))
}
