//! Version types for parsed package versions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Error types for version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),
}

/// A parsed package version (major.minor.patch with an optional
/// pre-release tag, e.g. "2.1.0" or "2.1.0-beta.1").
///
/// Parsing is lenient about the number of numeric parts: "2" and "2.1"
/// are accepted and missing parts default to zero, matching how versions
/// appear in installed package directory names. Comparison is always on
/// the parsed value, never on the raw string, so "1.0" and "1.0.0"
/// compare equal and leading zeros are insignificant.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PackageVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Pre-release tag, ordered before the plain release of the same triple.
    pub pre_release: Option<String>,
}

impl PackageVersion {
    /// Create a new release version.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    /// Parse a version string (e.g. "1.2.3", "1.0", "2.0.0-rc.1").
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        if s.is_empty() {
            return Err(VersionError::InvalidFormat(s.to_string()));
        }

        let (numeric, pre_release) = match s.split_once('-') {
            Some((numeric, pre)) if !pre.is_empty() => (numeric, Some(pre.to_string())),
            Some(_) => return Err(VersionError::InvalidFormat(s.to_string())),
            None => (s, None),
        };

        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(VersionError::InvalidFormat(s.to_string()));
        }

        let mut numbers = [0u32; 3];
        for (i, part) in parts.iter().enumerate() {
            numbers[i] = part
                .parse()
                .map_err(|_| VersionError::InvalidFormat(s.to_string()))?;
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            pre_release,
        })
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let triple = (self.major, self.minor, self.patch);
        let other_triple = (other.major, other.minor, other.patch);

        match triple.cmp(&other_triple) {
            Ordering::Equal => match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            },
            other => other,
        }
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
