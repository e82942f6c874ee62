//! Result resolution protocol: locate the outcome for a named check inside
//! a loosely structured results map.
//!
//! Check producers evolved independently across bootcamp weeks and nest
//! semantically similar data at different depths. Resolution order, first
//! match wins:
//!
//! 1. the legacy fixed table of well-known check names -> key paths (a
//!    compatibility shim, disabled via `scoring.legacy_resolution: false`);
//! 2. the canonical top-level key equal to the check name, the shape every
//!    new producer emits;
//! 3. a recursive, depth-bounded search for an exactly matching key. Best
//!    effort only: the first match in traversal order wins, which is not
//!    guaranteed stable across result-shape changes;
//! 4. otherwise resolved `false` — an unrecognized or absent check never
//!    grants credit.

use serde_json::Value;

use crate::core::Results;

/// Depth bound for the recursive fallback search.
pub const MAX_SEARCH_DEPTH: usize = 5;

/// Outcome located for a check: a boolean verdict, or a score pair when
/// the producer awards partial credit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Passed(bool),
    Scored { score: f64, max_score: f64 },
}

impl Resolution {
    /// Collapse to the binary view (a scored outcome counts as passed when
    /// any credit was earned).
    pub fn is_pass(&self) -> bool {
        match *self {
            Resolution::Passed(p) => p,
            Resolution::Scored { score, .. } => score > 0.0,
        }
    }
}

/// What a legacy table entry expects at the end of its key paths.
#[derive(Debug, Clone, Copy)]
enum Expect {
    Truthy,
    AtLeast(f64),
}

/// One legacy rule: every path must satisfy `expect` for the check to
/// resolve true. Any missing key or type mismatch is a resolution failure,
/// not an error.
struct LegacyRule {
    check: &'static str,
    paths: &'static [&'static [&'static str]],
    expect: Expect,
}

/// The compatibility table for check names that predate canonical result
/// keys. New producers emit results under their own registered name and
/// never need an entry here.
static LEGACY_RULES: &[LegacyRule] = &[
    // Project structure
    LegacyRule {
        check: "requirements_txt",
        paths: &[&["structure", "files", "requirements_txt"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "main_py_exists",
        paths: &[&["structure", "files", "main_py"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "readme_exists",
        paths: &[&["structure", "files", "readme_md"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "project_structure",
        paths: &[&["structure", "ok"]],
        expect: Expect::Truthy,
    },
    // Dependencies
    LegacyRule {
        check: "fastapi_dependency",
        paths: &[&["requirements", "fastapi"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "uvicorn_dependency",
        paths: &[&["requirements", "uvicorn"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "sqlalchemy_installed",
        paths: &[&["requirements", "sqlalchemy"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "pytest_setup",
        paths: &[&["requirements", "pytest"]],
        expect: Expect::Truthy,
    },
    // App and endpoints
    LegacyRule {
        check: "app_import",
        paths: &[&["app_import", "import_ok"], &["app_import", "has_app"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "root_endpoint",
        paths: &[&["endpoints", "root_working"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "docs_accessible",
        paths: &[&["endpoints", "docs_accessible"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "parametric_endpoint",
        paths: &[&["endpoints", "parametric_endpoint"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "json_responses",
        paths: &[&["endpoints", "root_returns_json"]],
        expect: Expect::Truthy,
    },
    // Documentation
    LegacyRule {
        check: "readme_reflection",
        paths: &[&["readme", "has_reflection"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "setup_commands",
        paths: &[&["readme", "has_commands"]],
        expect: Expect::Truthy,
    },
    // General quality
    LegacyRule {
        check: "code_quality",
        paths: &[&["app_import", "import_ok"]],
        expect: Expect::Truthy,
    },
    // Advanced checks
    LegacyRule {
        check: "database_config",
        paths: &[&["database", "connection_ok"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "models_created",
        paths: &[&["database", "models_exist"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "crud_operations",
        paths: &[&["crud", "all_operations"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "authentication_system",
        paths: &[&["auth", "jwt_working"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "containerization",
        paths: &[&["docker", "dockerfile_exists"]],
        expect: Expect::Truthy,
    },
    LegacyRule {
        check: "testing_coverage",
        paths: &[&["testing", "coverage_percentage"]],
        expect: Expect::AtLeast(70.0),
    },
];

/// Resolve the outcome for `name` within `results`.
pub fn resolve(name: &str, results: &Results, legacy: bool) -> Resolution {
    if legacy {
        if let Some(rule) = LEGACY_RULES.iter().find(|r| r.check == name) {
            return Resolution::Passed(apply_rule(rule, results));
        }
    }

    if let Some(value) = results.get(name) {
        if let Some(resolution) = resolve_canonical(value) {
            return resolution;
        }
    }

    // Each top-level producer value already sits one level below the
    // results mapping, so the walk starts at depth 1.
    for value in results.values() {
        if let Some(found) = search_key(name, value, 1) {
            return Resolution::Passed(found);
        }
    }

    Resolution::Passed(false)
}

fn apply_rule(rule: &LegacyRule, results: &Results) -> bool {
    rule.paths.iter().all(|path| {
        let leaf = lookup_path(results, path);
        match (rule.expect, leaf) {
            (_, None) => false,
            (Expect::Truthy, Some(value)) => truthy(value),
            (Expect::AtLeast(threshold), Some(value)) => {
                value.as_f64().is_some_and(|v| v >= threshold)
            }
        }
    })
}

fn lookup_path<'a>(results: &'a Results, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = results.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Interpret a value found under the check's own canonical key.
fn resolve_canonical(value: &Value) -> Option<Resolution> {
    match value {
        Value::Bool(b) => Some(Resolution::Passed(*b)),
        Value::Number(n) => Some(Resolution::Passed(n.as_f64().is_some_and(|v| v > 0.0))),
        Value::Object(map) => {
            if let Some(score) = map.get("score").and_then(Value::as_f64) {
                let max_score = map.get("max_score").and_then(Value::as_f64);
                return Some(match max_score {
                    Some(max) if max > 0.0 => Resolution::Scored {
                        score,
                        max_score: max,
                    },
                    _ => Resolution::Passed(score > 0.0),
                });
            }
            map.get("passed")
                .and_then(Value::as_bool)
                .map(Resolution::Passed)
        }
        _ => None,
    }
}

/// Depth-bounded walk for a key exactly equal to the check name. A direct
/// hit returns that value's truthiness (even when false); deeper matches
/// only propagate when true, mirroring the behavior the per-week
/// evaluators have relied on.
fn search_key(name: &str, value: &Value, depth: usize) -> Option<bool> {
    if depth >= MAX_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => {
            if let Some(hit) = map.get(name) {
                return Some(truthy(hit));
            }
            for child in map.values() {
                if search_key(name, child, depth + 1) == Some(true) {
                    return Some(true);
                }
            }
            None
        }
        Value::Array(items) => {
            for item in items {
                if search_key(name, item, depth + 1) == Some(true) {
                    return Some(true);
                }
            }
            None
        }
        _ => None,
    }
}

/// JSON truthiness: booleans as-is, numbers must be positive, strings and
/// containers must be non-empty.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results_from(value: serde_json::Value) -> Results {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("results fixture must be an object"),
        }
    }

    #[test]
    fn legacy_table_resolves_nested_path() {
        let results = results_from(json!({
            "structure": {"files": {"main_py": true}}
        }));
        assert_eq!(
            resolve("main_py_exists", &results, true),
            Resolution::Passed(true)
        );
    }

    #[test]
    fn legacy_table_requires_all_paths() {
        // app_import needs both import_ok and has_app.
        let results = results_from(json!({
            "app_import": {"import_ok": true, "has_app": false}
        }));
        assert_eq!(
            resolve("app_import", &results, true),
            Resolution::Passed(false)
        );
    }

    #[test]
    fn legacy_accessor_failure_is_resolution_failure() {
        // "structure" is a string, not a mapping: type mismatch, no panic.
        let results = results_from(json!({"structure": "broken"}));
        assert_eq!(
            resolve("main_py_exists", &results, true),
            Resolution::Passed(false)
        );
    }

    #[test]
    fn legacy_threshold_rule_compares_numeric_leaf() {
        let results = results_from(json!({"testing": {"coverage_percentage": 82}}));
        assert_eq!(
            resolve("testing_coverage", &results, true),
            Resolution::Passed(true)
        );

        let low = results_from(json!({"testing": {"coverage_percentage": 42}}));
        assert_eq!(
            resolve("testing_coverage", &low, true),
            Resolution::Passed(false)
        );
    }

    #[test]
    fn legacy_table_can_be_disabled() {
        // Without the shim the same name falls through to recursive search,
        // which finds the raw key instead of the mapped path.
        let results = results_from(json!({
            "structure": {"files": {"main_py": true}},
            "week": {"main_py_exists": false}
        }));
        assert_eq!(
            resolve("main_py_exists", &results, false),
            Resolution::Passed(false)
        );
    }

    #[test]
    fn canonical_key_with_score_pair_resolves_scored() {
        let results = results_from(json!({
            "endpoints": {"passed": false, "score": 3, "max_score": 4}
        }));
        assert_eq!(
            resolve("endpoints", &results, true),
            Resolution::Scored {
                score: 3.0,
                max_score: 4.0
            }
        );
    }

    #[test]
    fn canonical_score_without_max_is_binary() {
        let results = results_from(json!({"custom": {"score": 2}}));
        assert_eq!(resolve("custom", &results, true), Resolution::Passed(true));

        let zero = results_from(json!({"custom": {"score": 0}}));
        assert_eq!(resolve("custom", &zero, true), Resolution::Passed(false));
    }

    #[test]
    fn canonical_passed_flag_resolves() {
        let results = results_from(json!({"my_check": {"passed": true}}));
        assert_eq!(
            resolve("my_check", &results, true),
            Resolution::Passed(true)
        );
    }

    #[test]
    fn recursive_search_finds_deeply_nested_key() {
        let results = results_from(json!({
            "week_specific": {"nested": {"custom_check_x": true}}
        }));
        assert_eq!(
            resolve("custom_check_x", &results, true),
            Resolution::Passed(true)
        );
    }

    #[test]
    fn recursive_search_respects_depth_bound() {
        let results = results_from(json!({
            "a": {"b": {"c": {"d": {"e": {"too_deep": true}}}}}
        }));
        assert_eq!(
            resolve("too_deep", &results, true),
            Resolution::Passed(false)
        );
    }

    #[test]
    fn recursive_search_reaches_the_last_allowed_level() {
        // One object level shallower than the rejected case above.
        let results = results_from(json!({
            "a": {"b": {"c": {"d": {"at_limit": true}}}}
        }));
        assert_eq!(
            resolve("at_limit", &results, true),
            Resolution::Passed(true)
        );
    }

    #[test]
    fn recursive_search_walks_arrays() {
        let results = results_from(json!({
            "checks": [{"other": 1}, {"array_hit": 2}]
        }));
        assert_eq!(
            resolve("array_hit", &results, true),
            Resolution::Passed(true)
        );
    }

    #[test]
    fn unknown_check_fails_closed() {
        let results = results_from(json!({"anything": {"else": true}}));
        assert_eq!(
            resolve("never_produced", &results, true),
            Resolution::Passed(false)
        );
    }

    #[test]
    fn numeric_leaves_require_positive_values() {
        let results = results_from(json!({"hits": 0, "misses": -2, "count": 3}));
        assert_eq!(resolve("hits", &results, true), Resolution::Passed(false));
        assert_eq!(resolve("misses", &results, true), Resolution::Passed(false));
        assert_eq!(resolve("count", &results, true), Resolution::Passed(true));
    }
}
