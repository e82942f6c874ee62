//! Criteria model: the declarative grading rubric for one week.
//!
//! A criteria file names categories, each contributing `weight` points to
//! the 100-point total, and each holding a list of named checks with a
//! per-check point value inside the category's internal pool. The model is
//! loaded once per evaluation run, validated up front, and read-only for
//! the scoring engine afterwards.

pub mod loader;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::errors::EvalError;

/// Total category weight may exceed 100 by this much before the rubric is
/// rejected (rounding slack for hand-written criteria files).
pub const MAX_TOTAL_WEIGHT: f64 = 110.0;

pub const DEFAULT_PASSING_THRESHOLD: f64 = 70.0;

/// Fraction of a check's points awarded when an optional check fails,
/// rewarding attempted-but-incomplete work. Overridable per rubric via the
/// `scoring.consolation_fraction` key.
pub const DEFAULT_CONSOLATION_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Deserialize)]
pub struct Criteria {
    pub week_info: WeekInfo,
    /// Ordered: reports render categories in rubric order.
    pub categories: IndexMap<String, CategoryConfig>,
    #[serde(default)]
    pub scoring: ScoringOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeekInfo {
    pub number: u32,
    pub title: String,
    /// Compared against total *earned points*, not percentage. Categories
    /// are weighted to sum to ~100 so the two usually coincide.
    #[serde(default = "default_passing_threshold")]
    pub passing_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Points this category contributes toward the 100-point total.
    pub weight: f64,
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckSpec {
    pub name: String,
    /// Points inside the category's internal pool; normalized against the
    /// category weight during aggregation.
    pub points: f64,
    /// Required checks earn nothing when they fail; optional ones keep a
    /// consolation fraction of their points.
    #[serde(default = "default_true")]
    pub required: bool,
}

/// Engine tunables carried by the rubric.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoringOptions {
    #[serde(default = "default_consolation_fraction")]
    pub consolation_fraction: f64,
    /// Keeps the fixed check-name accessor table active for rubrics whose
    /// producers predate canonical result keys.
    #[serde(default = "default_true")]
    pub legacy_resolution: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            consolation_fraction: DEFAULT_CONSOLATION_FRACTION,
            legacy_resolution: true,
        }
    }
}

fn default_passing_threshold() -> f64 {
    DEFAULT_PASSING_THRESHOLD
}

fn default_consolation_fraction() -> f64 {
    DEFAULT_CONSOLATION_FRACTION
}

fn default_true() -> bool {
    true
}

impl Criteria {
    /// Parse a rubric from YAML and validate it in one step. Fails fast:
    /// a malformed rubric must abort evaluation before any checks run.
    pub fn from_yaml_str(contents: &str) -> Result<Self, EvalError> {
        let criteria: Criteria = serde_yaml::from_str(contents)
            .map_err(|e| EvalError::config(format!("invalid YAML: {e}")))?;
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn total_weight(&self) -> f64 {
        self.categories.values().map(|c| c.weight).sum()
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        if self.categories.is_empty() {
            return Err(EvalError::config("no categories defined"));
        }

        let total_weight = self.total_weight();
        if total_weight <= 0.0 {
            return Err(EvalError::config("total weight of categories is 0"));
        }
        if total_weight > MAX_TOTAL_WEIGHT {
            return Err(EvalError::config(format!(
                "total weight ({total_weight}) exceeds 100"
            )));
        }
        // The pass threshold compares earned points against a value
        // configured as a percentage; the two only agree when weights sum
        // to ~100, so flag rubrics where they diverge.
        if (total_weight - 100.0).abs() > 1.0 {
            log::warn!(
                "category weights sum to {total_weight}, not 100; threshold {} compares against earned points",
                self.week_info.passing_threshold
            );
        }

        for (name, category) in &self.categories {
            if category.weight < 0.0 {
                return Err(EvalError::config(format!(
                    "category `{name}` has negative weight"
                )));
            }
            for check in &category.checks {
                if check.points < 0.0 {
                    return Err(EvalError::config(format!(
                        "check `{}` in category `{name}` has negative points",
                        check.name
                    )));
                }
            }
        }

        if !(0.0..=1.0).contains(&self.scoring.consolation_fraction) {
            return Err(EvalError::config(format!(
                "consolation_fraction must be within 0.0..=1.0, got {}",
                self.scoring.consolation_fraction
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn minimal_yaml() -> &'static str {
        indoc! {"
            week_info:
              number: 1
              title: Hello World API
              passing_threshold: 70
            categories:
              setup:
                weight: 60
                checks:
                  - name: main_py_exists
                    points: 10
              docs:
                weight: 40
                checks:
                  - name: readme_exists
                    points: 5
                  - name: has_screenshot
                    points: 5
                    required: false
        "}
    }

    #[test]
    fn parses_and_validates_minimal_rubric() {
        let criteria = Criteria::from_yaml_str(minimal_yaml()).unwrap();
        assert_eq!(criteria.week_info.number, 1);
        assert_eq!(criteria.total_weight(), 100.0);
        // Ordered as written, not alphabetical.
        let names: Vec<_> = criteria.categories.keys().collect();
        assert_eq!(names, ["setup", "docs"]);
        assert!(criteria.categories["docs"].checks[1].required == false);
        assert!(criteria.categories["docs"].checks[0].required);
    }

    #[test]
    fn default_threshold_and_scoring_options() {
        let yaml = indoc! {"
            week_info:
              number: 3
              title: Forms
            categories:
              all:
                weight: 100
                checks: []
        "};
        let criteria = Criteria::from_yaml_str(yaml).unwrap();
        assert_eq!(
            criteria.week_info.passing_threshold,
            DEFAULT_PASSING_THRESHOLD
        );
        assert_eq!(
            criteria.scoring.consolation_fraction,
            DEFAULT_CONSOLATION_FRACTION
        );
        assert!(criteria.scoring.legacy_resolution);
    }

    #[test]
    fn rejects_empty_categories() {
        let yaml = indoc! {"
            week_info:
              number: 1
              title: Empty
            categories: {}
        "};
        let err = Criteria::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("no categories"));
    }

    #[test]
    fn rejects_zero_total_weight() {
        let yaml = indoc! {"
            week_info:
              number: 1
              title: Zero
            categories:
              a:
                weight: 0
                checks: []
        "};
        let err = Criteria::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("total weight"));
    }

    #[test]
    fn rejects_weight_beyond_tolerance() {
        let yaml = indoc! {"
            week_info:
              number: 1
              title: Overweight
            categories:
              a:
                weight: 70
                checks: []
              b:
                weight: 70
                checks: []
        "};
        let err = Criteria::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("exceeds 100"));
    }

    #[test]
    fn tolerates_weight_within_rounding_slack() {
        let yaml = indoc! {"
            week_info:
              number: 1
              title: Slack
            categories:
              a:
                weight: 105
                checks: []
        "};
        assert!(Criteria::from_yaml_str(yaml).is_ok());
    }

    #[test]
    fn rejects_missing_week_info() {
        let yaml = indoc! {"
            categories:
              a:
                weight: 100
                checks: []
        "};
        let err = Criteria::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.error_type(), "ConfigError");
    }

    #[test]
    fn rejects_out_of_range_consolation_fraction() {
        let yaml = indoc! {"
            week_info:
              number: 1
              title: Bad fraction
            categories:
              a:
                weight: 100
                checks: []
            scoring:
              consolation_fraction: 1.5
        "};
        let err = Criteria::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("consolation_fraction"));
    }
}
