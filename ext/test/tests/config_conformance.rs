//! Config conformance tests: dictionaries loaded through the config path.
//!
//! Run with: cargo test -p ngram-test --test config_conformance --features config

#![cfg(feature = "config")]

use ngram_test::config_fixture::ConfigFixture;
use std::path::{Path, PathBuf};

/// Get the fixtures directory relative to the workspace root.
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent() // ext
        .and_then(|p| p.parent()) // root
        .expect("Could not find workspace root")
        .join("fixtures")
}

#[test]
fn test_config_fixtures() {
    let dir = fixtures_dir().join("05_config");
    let files = ConfigFixture::load_dir(&dir).unwrap_or_else(|e| panic!("{e}"));
    assert!(!files.is_empty(), "no config fixtures in {}", dir.display());

    let mut errors = 0;
    for (path, fixtures) in files {
        println!("Loading config fixture: {}", path.display());
        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            if fixture.expect_error {
                errors += 1;
            }
            fixture.run_and_assert();
        }
    }
    assert!(errors > 0, "no expect_error fixtures were exercised");
}
