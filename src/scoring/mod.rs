//! Configurable scoring engine: evaluates check results against a criteria
//! rubric and produces the normalized 0-100 score with category breakdowns.
//!
//! The engine is a pure computation over its two inputs — the read-only
//! [`Criteria`] and the per-run [`Results`] map — so identical inputs
//! always yield an identical [`ScoringResult`].

pub mod grade;
pub mod resolution;

pub use grade::{round1, Grade};
pub use resolution::{resolve, Resolution};

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{CategoryConfig, CheckSpec, Criteria, ScoringOptions};
use crate::core::Results;

/// Full engine output: per-category breakdowns, totals, pass verdict and
/// letter grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    pub categories: IndexMap<String, CategoryScore>,
    pub total: TotalScore,
    /// Flat category -> earned view for quick consumption by reports.
    pub breakdown: IndexMap<String, f64>,
    pub passed: bool,
    pub grade: Grade,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalScore {
    pub earned: f64,
    pub possible: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    /// Normalized onto the category's weight scale and clamped to it.
    pub earned: f64,
    pub possible: f64,
    pub percentage: f64,
    pub checks: IndexMap<String, CheckScore>,
    /// Pre-normalization point pool, kept for report transparency.
    pub raw_points: RawPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawPoints {
    pub earned: f64,
    pub possible: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckScore {
    pub passed: bool,
    pub points_possible: f64,
    pub points_earned: f64,
    pub required: bool,
}

impl ScoringResult {
    /// The conservative scoring block used in error envelopes: nothing
    /// earned out of the nominal 100.
    pub fn empty_failure() -> Self {
        Self {
            categories: IndexMap::new(),
            total: TotalScore {
                earned: 0.0,
                possible: 100.0,
                percentage: 0.0,
            },
            breakdown: IndexMap::new(),
            passed: false,
            grade: Grade::F,
        }
    }
}

pub struct ScoringEngine<'a> {
    criteria: &'a Criteria,
    options: ScoringOptions,
}

impl<'a> ScoringEngine<'a> {
    /// Engine using the rubric's own scoring options.
    pub fn new(criteria: &'a Criteria) -> Self {
        Self {
            criteria,
            options: criteria.scoring,
        }
    }

    pub fn with_options(criteria: &'a Criteria, options: ScoringOptions) -> Self {
        Self { criteria, options }
    }

    /// Score one run's results against the rubric.
    pub fn score(&self, results: &Results) -> ScoringResult {
        let mut categories = IndexMap::new();
        let mut breakdown = IndexMap::new();
        let mut total_earned = 0.0;
        let mut total_possible = 0.0;

        for (name, category) in &self.criteria.categories {
            let score = self.score_category(category, results);
            total_earned += score.earned;
            total_possible += score.possible;
            breakdown.insert(name.clone(), score.earned);
            categories.insert(name.clone(), score);
        }

        let percentage = if total_possible > 0.0 {
            round1(total_earned / total_possible * 100.0)
        } else {
            0.0
        };

        // Threshold compares earned points, not percentage; weights are
        // designed to sum to ~100 so the two normally coincide.
        let passed = total_earned >= self.criteria.week_info.passing_threshold;

        ScoringResult {
            categories,
            total: TotalScore {
                earned: total_earned,
                possible: total_possible,
                percentage,
            },
            breakdown,
            passed,
            grade: Grade::from_percentage(percentage),
        }
    }

    /// Normalize a category's internal point pool onto its weight scale,
    /// never exceeding the category cap even for misconfigured pools.
    fn score_category(&self, category: &CategoryConfig, results: &Results) -> CategoryScore {
        let mut checks = IndexMap::new();
        let mut raw_earned = 0.0;
        let raw_possible: f64 = category.checks.iter().map(|c| c.points).sum();

        for spec in &category.checks {
            let check_score = self.evaluate_check(spec, results);
            raw_earned += check_score.points_earned;
            checks.insert(spec.name.clone(), check_score);
        }

        let normalized = if raw_possible > 0.0 {
            (raw_earned / raw_possible * category.weight).min(category.weight)
        } else {
            0.0
        };

        let percentage = if category.weight > 0.0 {
            round1(normalized / category.weight * 100.0)
        } else {
            0.0
        };

        CategoryScore {
            earned: normalized,
            possible: category.weight,
            percentage,
            checks,
            raw_points: RawPoints {
                earned: raw_earned,
                possible: raw_possible,
            },
        }
    }

    /// Convert one check spec plus the results map into earned points.
    ///
    /// Scored outcomes earn proportional credit; binary failures earn
    /// nothing when required, or the consolation fraction when optional.
    fn evaluate_check(&self, spec: &CheckSpec, results: &Results) -> CheckScore {
        let resolution = resolve(&spec.name, results, self.options.legacy_resolution);

        let (passed, earned) = match resolution {
            Resolution::Scored { score, max_score } => {
                let fraction = (score / max_score).clamp(0.0, 1.0);
                (fraction >= 1.0, fraction * spec.points)
            }
            Resolution::Passed(true) => (true, spec.points),
            Resolution::Passed(false) if spec.required => (false, 0.0),
            Resolution::Passed(false) => {
                (false, spec.points * self.options.consolation_fraction)
            }
        };

        CheckScore {
            passed,
            points_possible: spec.points,
            points_earned: earned.clamp(0.0, spec.points),
            required: spec.required,
        }
    }
}
