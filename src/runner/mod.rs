//! Batch driver for override reconciliation.
//!
//! Processes packages strictly one at a time, in the order supplied, and
//! each package's declarations in declaration order. Per-declaration
//! failures never abort the run; they are aggregated into the report.

use crate::locator::{LocatorError, PackageLocator};
use crate::overrides::{load_declarations, OverridesError};
use crate::report::CheckSink;
use crate::tools::MergeTools;
use crate::utils::now_iso;

/// Outcome of checking one package's declarations.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub package: String,
    /// AND of all declaration check outcomes for this package.
    pub ok: bool,
    pub declarations_checked: usize,
    /// Recommended `source=baseline` version pins for this package's
    /// declarations.
    pub pins: Vec<String>,
}

/// Aggregated result of a full run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub outcomes: Vec<PackageOutcome>,
    /// True only when every declaration of every package reconciled
    /// cleanly.
    pub all_ok: bool,
    /// Packages skipped because they are not installed or declare no
    /// overrides.
    pub skipped: Vec<String>,
}

/// Check every declaration of every given package.
///
/// An empty `packages` list means "all installed packages that declare
/// overrides". Packages that are not installed or carry no overrides
/// file are skipped with a debug message, matching the taxonomy: only a
/// broken declaration inside an overrides file is an error.
pub async fn run_checks(
    locator: &dyn PackageLocator,
    tools: &dyn MergeTools,
    sink: &dyn CheckSink,
    packages: &[String],
    write: bool,
) -> RunReport {
    let mut report = RunReport {
        started_at: now_iso(),
        all_ok: true,
        ..Default::default()
    };

    let packages = if packages.is_empty() {
        discover_packages(locator, sink).await
    } else {
        packages.to_vec()
    };

    for package in &packages {
        let collection = match load_declarations(locator, package).await {
            Ok(Some(collection)) => collection,
            Ok(None) => {
                sink.debug(&format!(
                    "Package \"{package}\" declares no overrides. Skipping."
                ));
                report.skipped.push(package.clone());
                continue;
            }
            Err(OverridesError::LocatorError(LocatorError::PackageNotFound(_))) => {
                sink.debug(&format!("Package \"{package}\" not found. Skipping."));
                report.skipped.push(package.clone());
                continue;
            }
            Err(e) => {
                sink.error(&format!(
                    "Failed loading overrides of package \"{package}\": {e}"
                ));
                report.all_ok = false;
                report.outcomes.push(PackageOutcome {
                    package: package.clone(),
                    ok: false,
                    declarations_checked: 0,
                    pins: Vec::new(),
                });
                continue;
            }
        };

        let mut ok = true;
        let mut pins = Vec::new();

        for declaration in &collection {
            ok &= declaration.check(sink, locator, tools, write).await;
            pins.push(format!(
                "{}={}",
                declaration.source_package, declaration.baseline_version
            ));
        }
        pins.sort();
        pins.dedup();

        if ok {
            if write {
                sink.info(&format!(
                    "No conflicts detected for all declarations of package {package}. You may pin the following source package versions:\n{}",
                    pins.join("\n")
                ));
            } else {
                sink.info(&format!(
                    "No conflicts detected for all declarations of package {package}. You may use --merge for merging, when there were changes."
                ));
            }
        } else {
            sink.warn(&format!("The package {package} needs further inspection."));
        }

        report.all_ok &= ok;
        report.outcomes.push(PackageOutcome {
            package: package.clone(),
            ok,
            declarations_checked: collection.len(),
            pins,
        });
    }

    report.finished_at = now_iso();
    report
}

/// All installed packages that carry an overrides file, in name order.
async fn discover_packages(locator: &dyn PackageLocator, sink: &dyn CheckSink) -> Vec<String> {
    let installed = match locator.installed_packages().await {
        Ok(installed) => installed,
        Err(e) => {
            sink.error(&format!("Failed scanning installed packages: {e}"));
            return Vec::new();
        }
    };

    let mut packages = Vec::new();
    for package in installed {
        if crate::utils::get_overrides_path(&package.base_path).exists() {
            packages.push(package.name);
        }
    }

    sink.debug(&format!(
        "Discovered {} package(s) declaring overrides.",
        packages.len()
    ));
    packages
}
