//! Conformance tests that run YAML fixtures against flatmatch
//!
//! Run with: cargo test -p flatmatch-test --test conformance
//!
//! Note: This test file requires the `fixtures` feature (on by default).

#![cfg(feature = "fixtures")]

use flatmatch_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the fixtures directory relative to the workspace root
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let ext_test = Path::new(manifest_dir);

    // Go up: ext/test -> ext -> workspace root
    let root = ext_test
        .parent() // ext
        .and_then(|p| p.parent()) // root
        .expect("Could not find workspace root");

    root.join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    if !dir.exists() {
        panic!("Fixtures directory does not exist: {}", dir.display());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|e| e == "yaml" || e == "yml"))
        .collect();
    paths.sort();
    assert!(!paths.is_empty(), "no fixtures in {}", dir.display());

    for path in paths {
        println!("Running fixture: {}", path.display());

        let yaml = fs::read_to_string(&path).expect("read yaml");

        // Parse potentially multiple fixtures (separated by ---)
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

#[test]
fn test_scalar() {
    run_fixtures_in_dir(&fixtures_dir().join("01_scalar"));
}

#[test]
fn test_nested() {
    run_fixtures_in_dir(&fixtures_dir().join("02_nested"));
}

#[test]
fn test_state() {
    run_fixtures_in_dir(&fixtures_dir().join("03_state"));
}

#[test]
fn test_invariants() {
    run_fixtures_in_dir(&fixtures_dir().join("04_invariants"));
}

#[test]
fn test_demo_checks() {
    use flatmatch::{load_file, run_checks, ChecksConfig, State};

    let demos = fixtures_dir().with_file_name("demos");
    let state: State = load_file(demos.join("web.tfstate")).expect("load state");
    let config: ChecksConfig = load_file(demos.join("checks.yaml")).expect("load checks");
    let checks = config.into_checks().expect("valid checks");

    let passed: Vec<bool> = run_checks(&checks, &state)
        .iter()
        .map(|outcome| outcome.passed())
        .collect();
    assert_eq!(passed, vec![true, true, true, true, false]);
}
