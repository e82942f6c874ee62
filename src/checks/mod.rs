//! Check producers: independent inspections of a student repository.
//!
//! Each producer registers its findings under a canonical top-level key
//! equal to its own name. Producers are black boxes to the scoring engine;
//! a producer that fails is converted into a failed check result for its
//! key and the run continues — one broken check never aborts grading.

pub mod app_import;
pub mod auth;
pub mod database;
pub mod docker;
pub mod endpoints;
pub mod readme;
pub mod requirements;
pub mod structure;
pub mod testing;

use std::path::Path;

use serde_json::Value;

use crate::core::{CheckResult, Results};

pub use app_import::AppImportCheck;
pub use auth::AuthCheck;
pub use database::DatabaseCheck;
pub use docker::DockerCheck;
pub use endpoints::EndpointsCheck;
pub use readme::ReadmeCheck;
pub use requirements::RequirementsCheck;
pub use structure::StructureCheck;
pub use testing::TestingCheck;

/// One rubric-area inspection of a repository.
pub trait CheckProducer {
    /// Canonical results key this producer's value is registered under.
    fn name(&self) -> &'static str;

    fn run(&self, repo: &Path) -> anyhow::Result<Value>;
}

/// Run every producer, isolating failures per check.
pub fn run_producers(producers: &[Box<dyn CheckProducer>], repo: &Path) -> Results {
    let mut results = Results::new();
    for producer in producers {
        let name = producer.name();
        log::debug!("running check producer `{name}`");
        let value = match producer.run(repo) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("check producer `{name}` failed: {err:#}");
                CheckResult::fail_with_error(err.to_string()).into()
            }
        };
        results.insert(name.to_string(), value);
    }
    results
}

/// Read a UTF-8-ish text file, tolerating invalid sequences the way
/// student repositories require.
pub(crate) fn read_lossy(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// Collect Python sources under the repository root, skipping vendored and
/// generated trees.
pub(crate) fn python_files(repo: &Path, max_depth: usize) -> Vec<std::path::PathBuf> {
    const SKIP_DIRS: &[&str] = &[
        ".git",
        ".venv",
        "venv",
        "env",
        "__pycache__",
        "node_modules",
        ".mypy_cache",
        ".pytest_cache",
    ];

    walkdir::WalkDir::new(repo)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| !SKIP_DIRS.contains(&name))
                .unwrap_or(true)
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "py"))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(&'static str, Value);
    impl CheckProducer for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }
        fn run(&self, _repo: &Path) -> anyhow::Result<Value> {
            Ok(self.1.clone())
        }
    }

    struct Broken;
    impl CheckProducer for Broken {
        fn name(&self) -> &'static str {
            "database_connection"
        }
        fn run(&self, _repo: &Path) -> anyhow::Result<Value> {
            anyhow::bail!("connection refused")
        }
    }

    #[test]
    fn failing_producer_is_isolated() {
        let producers: Vec<Box<dyn CheckProducer>> = vec![
            Box::new(Fixed("structure", json!({"ok": true}))),
            Box::new(Broken),
            Box::new(Fixed("readme", json!({"exists": true}))),
        ];
        let results = run_producers(&producers, Path::new("/tmp"));

        assert_eq!(results.len(), 3);
        assert_eq!(results["structure"], json!({"ok": true}));
        assert_eq!(results["database_connection"]["passed"], json!(false));
        assert_eq!(
            results["database_connection"]["error"],
            json!("connection refused")
        );
        assert_eq!(results["readme"]["exists"], json!(true));
    }

    #[test]
    fn results_preserve_producer_order() {
        let producers: Vec<Box<dyn CheckProducer>> = vec![
            Box::new(Fixed("b_second", json!(1))),
            Box::new(Fixed("a_first", json!(2))),
        ];
        let results = run_producers(&producers, Path::new("/tmp"));
        let keys: Vec<_> = results.keys().collect();
        assert_eq!(keys, ["b_second", "a_first"]);
    }
}
