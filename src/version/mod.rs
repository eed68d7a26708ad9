//! Version management for driftwatch.
//!
//! This module provides parsed package versions, version comparison,
//! and utilities for checking whether a customization baseline matches
//! the currently installed package version.

mod types;

pub use types::{PackageVersion, VersionError};

/// Result of comparing a customization baseline against the installed
/// package version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComparison {
    /// Baseline matches the installed version; the override is current.
    Equal,
    /// Baseline is older than the installed version (upstream moved on).
    BaselineBehind,
    /// Baseline is newer than the installed version (package downgraded).
    BaselineAhead,
}

/// Compare a baseline version against the installed package version.
pub fn compare_versions(
    baseline: &PackageVersion,
    installed: &PackageVersion,
) -> VersionComparison {
    match baseline.cmp(installed) {
        std::cmp::Ordering::Equal => VersionComparison::Equal,
        std::cmp::Ordering::Less => VersionComparison::BaselineBehind,
        std::cmp::Ordering::Greater => VersionComparison::BaselineAhead,
    }
}
