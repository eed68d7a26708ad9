mod common;

use common::{create_test_dir, install_package, write_single_override};
use driftwatch::locator::DirectoryLocator;
use driftwatch::report::MemorySink;
use driftwatch::runner::run_checks;
use driftwatch::tools::SystemTools;
use std::path::{Path, PathBuf};

const VANILLA_V1: &str = "alpha\nbeta\ngamma\ndelta\nepsilon\n";
const VANILLA_V2: &str = "alpha\nbeta\ngamma\ndelta\nepsilon updated upstream\n";
const CUSTOMIZED: &str = "alpha customized\nbeta\ngamma\ndelta\nepsilon\n";
const MERGED: &str = "alpha customized\nbeta\ngamma\ndelta\nepsilon updated upstream\n";

struct Fixture {
    _dir: tempfile::TempDir,
    locator: DirectoryLocator,
    local_file: PathBuf,
}

/// Install root with acme.core upgraded 1.0 -> 2.0 (1.0 archived) and
/// my.addon customizing the 1.0 file.
fn setup(customized: &str) -> Fixture {
    let dir = create_test_dir();
    let install_root = dir.path().join("install");
    let archive_root = dir.path().join("archive");
    std::fs::create_dir_all(&install_root).unwrap();
    std::fs::create_dir_all(&archive_root).unwrap();

    install_package(
        &install_root,
        "acme.core",
        "2.0",
        &[("templates/footer.txt", VANILLA_V2)],
    );
    install_package(
        &archive_root,
        "acme.core",
        "1.0",
        &[("templates/footer.txt", VANILLA_V1)],
    );
    let local_base = install_package(
        &install_root,
        "my.addon",
        "0.1",
        &[("overrides/footer.txt", customized)],
    );
    write_single_override(
        &local_base,
        "acme.core",
        "1.0",
        "templates/footer.txt",
        "overrides/footer.txt",
    );

    Fixture {
        locator: DirectoryLocator::new(install_root, archive_root),
        local_file: local_base.join("overrides/footer.txt"),
        _dir: dir,
    }
}

#[tokio::test]
async fn test_run_reconciles_package_cleanly() {
    let fixture = setup(CUSTOMIZED);
    let sink = MemorySink::new();

    let report = run_checks(
        &fixture.locator,
        &SystemTools::new(),
        &sink,
        &["my.addon".to_string()],
        true,
    )
    .await;

    assert!(report.all_ok, "Clean merge run should be all ok");
    assert_eq!(report.outcomes.len(), 1);
    assert!(report.outcomes[0].ok);
    assert_eq!(report.outcomes[0].declarations_checked, 1);
    assert_eq!(
        std::fs::read_to_string(&fixture.local_file).unwrap(),
        MERGED
    );
}

#[tokio::test]
async fn test_run_recommends_baseline_pins() {
    let fixture = setup(CUSTOMIZED);
    let sink = MemorySink::new();

    let report = run_checks(
        &fixture.locator,
        &SystemTools::new(),
        &sink,
        &["my.addon".to_string()],
        true,
    )
    .await;

    assert_eq!(report.outcomes[0].pins, vec!["acme.core=1.0.0".to_string()]);
}

#[tokio::test]
async fn test_run_aggregates_conflict_as_failure() {
    // Customization rewrote the same line upstream rewrote.
    let conflicting = "alpha\nbeta\ngamma\ndelta\nepsilon changed locally\n";
    let fixture = setup(conflicting);
    let sink = MemorySink::new();

    let report = run_checks(
        &fixture.locator,
        &SystemTools::new(),
        &sink,
        &["my.addon".to_string()],
        false,
    )
    .await;

    assert!(!report.all_ok, "A conflicting declaration must fail the run");
    assert!(!report.outcomes[0].ok);
    assert_eq!(
        std::fs::read_to_string(&fixture.local_file).unwrap(),
        conflicting,
        "Persistence off: the customization stays untouched"
    );
}

#[tokio::test]
async fn test_run_skips_unknown_and_undeclared_packages() {
    let fixture = setup(CUSTOMIZED);
    let sink = MemorySink::new();

    let report = run_checks(
        &fixture.locator,
        &SystemTools::new(),
        &sink,
        &[
            "ghost.package".to_string(),
            "acme.core".to_string(),
            "my.addon".to_string(),
        ],
        true,
    )
    .await;

    // ghost.package is not installed, acme.core declares no overrides;
    // neither fails the run.
    assert!(report.all_ok);
    assert_eq!(report.skipped, vec!["ghost.package", "acme.core"]);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].package, "my.addon");
}

#[tokio::test]
async fn test_run_discovers_packages_when_none_given() {
    let fixture = setup(CUSTOMIZED);
    let sink = MemorySink::new();

    let report = run_checks(&fixture.locator, &SystemTools::new(), &sink, &[], true).await;

    assert!(report.all_ok);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].package, "my.addon");
    assert_eq!(
        std::fs::read_to_string(&fixture.local_file).unwrap(),
        MERGED
    );
}

#[tokio::test]
async fn test_run_fails_package_with_broken_declaration() {
    let fixture = setup(CUSTOMIZED);
    // Declare an override whose source file does not exist in the
    // installed package: a configuration error.
    let local_base = fixture
        .locator
        .install_root()
        .join(Path::new("my.addon-0.1"));
    write_single_override(
        &local_base,
        "acme.core",
        "1.0",
        "templates/no-such-file.txt",
        "overrides/footer.txt",
    );

    let sink = MemorySink::new();
    let report = run_checks(
        &fixture.locator,
        &SystemTools::new(),
        &sink,
        &["my.addon".to_string()],
        false,
    )
    .await;

    assert!(!report.all_ok);
    assert_eq!(report.outcomes.len(), 1);
    assert!(!report.outcomes[0].ok);
    assert_eq!(report.outcomes[0].declarations_checked, 0);
}

#[tokio::test]
async fn test_run_report_carries_timestamps() {
    let fixture = setup(CUSTOMIZED);
    let sink = MemorySink::new();

    let report = run_checks(
        &fixture.locator,
        &SystemTools::new(),
        &sink,
        &["my.addon".to_string()],
        false,
    )
    .await;

    assert!(chrono::DateTime::parse_from_rfc3339(&report.started_at).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(&report.finished_at).is_ok());
}
