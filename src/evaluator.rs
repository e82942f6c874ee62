//! Evaluation orchestration: load the week's rubric, run its check
//! producers against the submission, score the results and package
//! everything into a report envelope.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::checks::run_producers;
use crate::config::{self, Criteria};
use crate::core::Results;
use crate::errors::EvalError;
use crate::scoring::{ScoringEngine, ScoringResult};
use crate::weeks::{suite_for, WeekSuite};

/// Successful evaluation of one submission.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub week: u32,
    pub week_title: String,
    pub repo: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub passing_threshold: f64,
    /// Convenience copy of the overall percentage.
    pub final_score: f64,
    /// Convenience copy of the scoring verdict.
    pub passed: bool,
    pub scoring: ScoringResult,
    /// Raw check-producer output, keyed by producer name.
    pub results: Results,
    /// Student-facing markdown, rendered with the built-in layout so the
    /// JSON envelope is self-contained.
    pub report: String,
}

/// Report emitted when evaluation could not run at all. It still carries
/// a zeroed scoring block so downstream consumers see a uniform shape.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub error: bool,
    pub error_type: String,
    pub error_message: String,
    pub week: u32,
    pub timestamp: DateTime<Utc>,
    pub final_score: f64,
    pub passed: bool,
    pub scoring: ScoringResult,
    /// Always empty: no checks ran.
    pub results: Results,
}

/// What an evaluation run hands to the output layer: either a full
/// report or an error report, serialized without an outer tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(Box<EvaluationReport>),
    Error(ErrorReport),
}

impl Envelope {
    pub fn passed(&self) -> bool {
        match self {
            Envelope::Success(report) => report.scoring.passed,
            Envelope::Error(_) => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Error(_))
    }
}

/// Build an error envelope from a failure that prevented evaluation.
pub fn error_envelope(week: u32, error: &EvalError) -> Envelope {
    Envelope::Error(ErrorReport {
        error: true,
        error_type: error.error_type().to_string(),
        error_message: error.to_string(),
        week,
        timestamp: Utc::now(),
        final_score: 0.0,
        passed: false,
        scoring: ScoringResult::empty_failure(),
        results: Results::new(),
    })
}

#[derive(Debug)]
pub struct Evaluator {
    week: u32,
    repo: PathBuf,
    criteria: Criteria,
    suite: &'static WeekSuite,
}

impl Evaluator {
    /// Set up an evaluation for one week against one submission repo.
    /// Fails early when the repo is missing, the week is unknown, or
    /// the rubric does not validate.
    pub fn new(week: u32, repo: &Path, criteria_override: Option<&Path>) -> Result<Self, EvalError> {
        if !repo.is_dir() {
            return Err(EvalError::RepoNotFound(repo.to_path_buf()));
        }
        let suite = suite_for(week).ok_or_else(|| {
            EvalError::config(format!("no evaluation suite for week {week}, expected 1-11"))
        })?;
        let criteria = config::loader::load(week, criteria_override)?;
        Ok(Self {
            week,
            repo: repo.to_path_buf(),
            criteria,
            suite,
        })
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Toggle the legacy check-name table for this run.
    pub fn set_legacy_resolution(&mut self, enabled: bool) {
        self.criteria.scoring.legacy_resolution = enabled;
    }

    /// Run every check producer for the week, score the collected
    /// results and assemble the report.
    pub fn evaluate(&self) -> Envelope {
        let started = Instant::now();
        info!(
            "evaluating week {} ({}) at {}",
            self.week,
            self.suite.title,
            self.repo.display()
        );

        let producers = self.suite.producers();
        let results = run_producers(&producers, &self.repo);
        debug!("collected {} check results", results.len());

        let engine = ScoringEngine::new(&self.criteria);
        let scoring = engine.score(&results);

        let mut report = EvaluationReport {
            week: self.week,
            week_title: self.suite.title.to_string(),
            repo: self.repo.clone(),
            timestamp: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
            passing_threshold: self.criteria.week_info.passing_threshold,
            final_score: scoring.total.percentage,
            passed: scoring.passed,
            scoring,
            results,
            report: String::new(),
        };
        report.report = crate::report::render_markdown(&report);
        Envelope::Success(Box::new(report))
    }
}
