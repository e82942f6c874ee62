//! Test suite check: pytest files, test functions and configuration.
//!
//! Reports the test-function census as a scored outcome so finding some
//! tests earns proportional credit.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{python_files, read_lossy, CheckProducer};

static TEST_FN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:async\s+)?def\s+test_\w+").unwrap());

/// Test functions at or above which the scored outcome reaches full
/// credit.
pub const EXPECTED_TEST_FUNCTIONS: usize = 5;

pub struct TestingCheck;

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("test_") || name.ends_with("_test.py"))
}

fn has_pytest_config(repo: &Path) -> bool {
    if repo.join("pytest.ini").is_file() || repo.join("conftest.py").is_file() {
        return true;
    }
    if let Some(contents) = read_lossy(&repo.join("pyproject.toml")) {
        if contents.contains("[tool.pytest") {
            return true;
        }
    }
    if let Some(contents) = read_lossy(&repo.join("setup.cfg")) {
        if contents.contains("[tool:pytest]") {
            return true;
        }
    }
    false
}

impl CheckProducer for TestingCheck {
    fn name(&self) -> &'static str {
        "testing"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let mut test_files = 0usize;
        let mut test_functions = 0usize;

        for path in python_files(repo, 4) {
            if !is_test_file(&path) {
                continue;
            }
            test_files += 1;
            if let Some(source) = read_lossy(&path) {
                test_functions += TEST_FN_RE.find_iter(&source).count();
            }
        }

        let score = test_functions.min(EXPECTED_TEST_FUNCTIONS);

        Ok(json!({
            "passed": test_functions >= EXPECTED_TEST_FUNCTIONS,
            "score": score,
            "max_score": EXPECTED_TEST_FUNCTIONS,
            "test_files": test_files,
            "test_functions": test_functions,
            "has_pytest_config": has_pytest_config(repo),
        }))
    }
}
