//! Shared types for the evaluation pipeline.
//!
//! Check producers hand their findings to the scoring engine through a
//! loosely structured [`Results`] map: one top-level key per producer, with
//! a JSON value underneath. New-style producers build those values from
//! [`CheckResult`], which gives the engine a typed [`CheckOutcome`] view;
//! legacy-shaped values are handled by the resolution protocol in
//! [`crate::scoring::resolution`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Results of one evaluation run: producer name -> produced value.
///
/// Created fresh for each run and never persisted; the scoring engine only
/// ever reads it.
pub type Results = IndexMap<String, Value>;

/// Structured result for a single rubric item, the contract every new
/// check producer emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    /// Numeric score pair for checks that award partial credit (for
    /// example counting test functions found). When present and
    /// `max_score > 0`, the ratio is used instead of the boolean.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    /// Diagnostic surfaced to the student, never scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

/// Tagged view of a check's outcome: either a boolean verdict or a scored
/// pair for fine-grained credit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckOutcome {
    Passed(bool),
    Scored { score: f64, max_score: f64 },
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            score: None,
            max_score: None,
            error: None,
            details: Map::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn fail() -> Self {
        Self {
            passed: false,
            ..Self::pass()
        }
    }

    pub fn from_bool(passed: bool) -> Self {
        if passed {
            Self::pass()
        } else {
            Self::fail()
        }
    }

    /// A failed check carrying a producer error message.
    pub fn fail_with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::fail()
        }
    }

    /// Partial-credit result. `passed` reflects full credit only.
    pub fn scored(score: f64, max_score: f64) -> Self {
        Self {
            passed: max_score > 0.0 && score >= max_score,
            score: Some(score),
            max_score: Some(max_score),
            ..Self::pass()
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    pub fn with_recommendation(mut self, message: impl Into<String>) -> Self {
        self.recommendations.push(message.into());
        self
    }

    pub fn outcome(&self) -> CheckOutcome {
        match (self.score, self.max_score) {
            (Some(score), Some(max_score)) if max_score > 0.0 => {
                CheckOutcome::Scored { score, max_score }
            }
            _ => CheckOutcome::Passed(self.passed),
        }
    }
}

impl From<CheckResult> for Value {
    /// Flattens into the wire shape consumed by the resolution protocol:
    /// `details` entries are lifted to the top level next to `passed`, so
    /// both canonical and recursive lookup can see them.
    fn from(result: CheckResult) -> Value {
        let mut map = Map::new();
        map.insert("passed".into(), Value::Bool(result.passed));
        if let Some(n) = result.score.and_then(Number::from_f64) {
            map.insert("score".into(), Value::Number(n));
        }
        if let Some(n) = result.max_score.and_then(Number::from_f64) {
            map.insert("max_score".into(), Value::Number(n));
        }
        if let Some(error) = result.error {
            map.insert("error".into(), Value::String(error));
        }
        for (key, value) in result.details {
            map.entry(key).or_insert(value);
        }
        if !result.recommendations.is_empty() {
            map.insert(
                "recommendations".into(),
                Value::Array(
                    result
                        .recommendations
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }
        Value::Object(map)
    }
}
