//! Static endpoint check: scans route decorators in the student's Python
//! sources and compares them against the paths the week expects.
//!
//! This is a source-level scan, not an HTTP probe: the student's app is
//! never started. Coverage of the expected paths is reported as a scored
//! outcome so the engine can award proportional credit.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{python_files, read_lossy, CheckProducer};

static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"@\s*(?:app|router|api)\.(get|post|put|delete|patch|websocket)\(\s*["']([^"']*)["']"#,
    )
    .unwrap()
});

static APP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"FastAPI\s*\(").unwrap());

pub struct EndpointsCheck {
    /// Route paths the week's assignment asks for.
    pub expected: &'static [&'static str],
}

/// A declared route matches an expected path when the literal paths agree
/// or when they have the same segments with `{...}` placeholders treated
/// as wildcards on either side.
fn paths_match(declared: &str, expected: &str) -> bool {
    if declared == expected {
        return true;
    }
    let d: Vec<&str> = declared.trim_matches('/').split('/').collect();
    let e: Vec<&str> = expected.trim_matches('/').split('/').collect();
    d.len() == e.len()
        && d.iter().zip(&e).all(|(ds, es)| {
            ds == es || ds.starts_with('{') || es.starts_with('{')
        })
}

impl CheckProducer for EndpointsCheck {
    fn name(&self) -> &'static str {
        "endpoints"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let mut routes: Vec<(String, String)> = Vec::new();
        let mut has_app_factory = false;
        let mut root_returns_json = false;

        for path in python_files(repo, 4) {
            let Some(source) = read_lossy(&path) else {
                continue;
            };
            if APP_RE.is_match(&source) {
                has_app_factory = true;
            }
            for captures in ROUTE_RE.captures_iter(&source) {
                let method = captures[1].to_string();
                let route = captures[2].to_string();
                if method == "get" && route == "/" {
                    // Look just past the decorator for a JSON-ish return.
                    let tail_start = captures.get(0).map(|m| m.end()).unwrap_or(0);
                    let tail: String = source[tail_start..].chars().take(400).collect();
                    if tail.contains("return {") || tail.contains("JSONResponse") {
                        root_returns_json = true;
                    }
                }
                routes.push((method, route));
            }
        }

        let root_working = routes
            .iter()
            .any(|(method, route)| method == "get" && route == "/");
        let parametric_endpoint = routes.iter().any(|(_, route)| route.contains('{'));
        // /docs is served by FastAPI itself unless explicitly disabled.
        let docs_accessible = has_app_factory;

        let matched = self
            .expected
            .iter()
            .filter(|expected| {
                routes
                    .iter()
                    .any(|(_, declared)| paths_match(declared, expected))
            })
            .count();

        Ok(json!({
            "passed": root_working && docs_accessible,
            "score": matched,
            "max_score": self.expected.len(),
            "root_working": root_working,
            "docs_accessible": docs_accessible,
            "parametric_endpoint": parametric_endpoint,
            "root_returns_json": root_returns_json,
            "routes": routes
                .iter()
                .map(|(method, route)| format!("{} {}", method.to_uppercase(), route))
                .collect::<Vec<_>>(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;

    const WEEK1: &[&str] = &["/", "/hello/{name}"];

    fn check(source: &str) -> Value {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.py"), source).unwrap();
        EndpointsCheck { expected: WEEK1 }.run(dir.path()).unwrap()
    }

    #[test]
    fn hello_world_app_scores_full_coverage() {
        let value = check(indoc! {r#"
            from fastapi import FastAPI

            app = FastAPI()

            @app.get("/")
            def root():
                return {"message": "hello"}

            @app.get("/hello/{name}")
            def hello(name: str):
                return {"hello": name}
        "#});

        assert_eq!(value["root_working"], true);
        assert_eq!(value["docs_accessible"], true);
        assert_eq!(value["parametric_endpoint"], true);
        assert_eq!(value["root_returns_json"], true);
        assert_eq!(value["score"], 2);
        assert_eq!(value["max_score"], 2);
        assert_eq!(value["passed"], true);
    }

    #[test]
    fn empty_module_scores_nothing() {
        let value = check("x = 1\n");
        assert_eq!(value["root_working"], false);
        assert_eq!(value["docs_accessible"], false);
        assert_eq!(value["score"], 0);
        assert_eq!(value["passed"], false);
    }

    #[test]
    fn partial_coverage_is_a_partial_score() {
        let value = check(indoc! {r#"
            from fastapi import FastAPI
            app = FastAPI()

            @app.get("/")
            def root():
                return {"ok": True}
        "#});
        assert_eq!(value["score"], 1);
        assert_eq!(value["max_score"], 2);
    }

    #[test]
    fn placeholder_segments_match_as_wildcards() {
        assert!(paths_match("/hello/{person}", "/hello/{name}"));
        assert!(paths_match("/items/{id}", "/items/{item_id}"));
        assert!(!paths_match("/items", "/items/{id}"));
        assert!(!paths_match("/other/{id}", "/items/{id}"));
    }

    #[test]
    fn router_decorators_are_recognized() {
        let value = check(indoc! {r#"
            from fastapi import APIRouter
            router = APIRouter()

            @router.get("/")
            def root():
                return {"ok": True}
        "#});
        assert_eq!(value["root_working"], true);
        // No FastAPI() factory in sight, so docs cannot be assumed.
        assert_eq!(value["docs_accessible"], false);
    }
}
