// Export modules for library usage
pub mod checks;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod evaluator;
pub mod output;
pub mod report;
pub mod scoring;
pub mod weeks;

// Re-export commonly used types
pub use crate::core::{CheckOutcome, CheckResult, Results};

pub use crate::config::{
    CategoryConfig, CheckSpec, Criteria, ScoringOptions, WeekInfo, DEFAULT_CONSOLATION_FRACTION,
    DEFAULT_PASSING_THRESHOLD, MAX_TOTAL_WEIGHT,
};

pub use crate::errors::EvalError;

pub use crate::evaluator::{Envelope, ErrorReport, EvaluationReport, Evaluator};

pub use crate::scoring::{
    resolution::{resolve, Resolution},
    CategoryScore, CheckScore, Grade, ScoringEngine, ScoringResult, TotalScore,
};

pub use crate::checks::{run_producers, CheckProducer};

pub use crate::output::{create_writer, OutputFormat, ReportWriter};

pub use crate::weeks::{suite_for, WeekSuite, WEEKS};
