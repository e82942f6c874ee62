//! Custom report templates.
//!
//! A template is plain text with `{variable}` placeholders. Every
//! placeholder must name a known variable, otherwise rendering fails and
//! the caller falls back to the built-in layout.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::EvalError;
use crate::evaluator::EvaluationReport;
use crate::scoring::grade::round1;

use super::{bullet_list, feedback_for, humanize};

static VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z0-9_]+)\}").unwrap());

fn number(value: f64) -> String {
    format!("{}", round1(value))
}

/// Variables available to templates, including one `<category>_score`
/// and `<category>_status` pair per rubric category.
pub fn variables(report: &EvaluationReport) -> HashMap<String, String> {
    let feedback = feedback_for(report);
    let mut vars = HashMap::new();

    let status = if report.scoring.passed {
        "PASSED"
    } else {
        "NOT PASSED"
    };
    vars.insert("status".to_string(), status.to_string());
    vars.insert(
        "pass_status".to_string(),
        if report.scoring.passed { "✅" } else { "❌" }.to_string(),
    );
    vars.insert(
        "total_score".to_string(),
        number(report.scoring.total.earned),
    );
    vars.insert(
        "max_score".to_string(),
        number(report.scoring.total.possible),
    );
    vars.insert(
        "percentage".to_string(),
        number(report.scoring.total.percentage),
    );
    vars.insert("grade".to_string(), report.scoring.grade.to_string());
    vars.insert("week_number".to_string(), report.week.to_string());
    vars.insert("week_title".to_string(), report.week_title.clone());
    vars.insert(
        "passing_threshold".to_string(),
        number(report.passing_threshold),
    );
    vars.insert(
        "evaluation_date".to_string(),
        report.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    vars.insert(
        "positive_feedback".to_string(),
        bullet_list(&feedback.positive),
    );
    vars.insert(
        "improvement_feedback".to_string(),
        bullet_list(&feedback.improvements),
    );
    vars.insert("next_steps".to_string(), bullet_list(&feedback.next_steps));

    for (name, category) in &report.scoring.categories {
        vars.insert(format!("{name}_score"), number(category.earned));
        vars.insert(
            format!("{name}_status"),
            if category.percentage >= 100.0 {
                format!("{}: complete", humanize(name))
            } else {
                format!("{}: {}%", humanize(name), number(category.percentage))
            },
        );
    }

    vars
}

pub fn render(source: &str, report: &EvaluationReport) -> Result<String, EvalError> {
    let vars = variables(report);
    let mut unknown: Option<String> = None;

    let rendered = VAR_RE.replace_all(source, |captures: &regex::Captures<'_>| {
        let name = &captures[1];
        match vars.get(name) {
            Some(value) => value.clone(),
            None => {
                if unknown.is_none() {
                    unknown = Some(name.to_string());
                }
                String::new()
            }
        }
    });

    match unknown {
        Some(name) => Err(EvalError::Report(format!(
            "template references unknown variable `{name}`"
        ))),
        None => Ok(rendered.into_owned()),
    }
}
