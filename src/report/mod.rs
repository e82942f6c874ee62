//! Report composition: turns an evaluation report into student-facing
//! markdown, either through the built-in layout or a custom template.

pub mod template;

use std::fmt::Write as _;

use log::warn;

use crate::evaluator::{Envelope, ErrorReport, EvaluationReport};

/// Feedback lines derived from the scoring breakdown.
#[derive(Debug, Default, Clone)]
pub struct Feedback {
    pub positive: Vec<String>,
    pub improvements: Vec<String>,
    pub next_steps: Vec<String>,
}

pub fn feedback_for(report: &EvaluationReport) -> Feedback {
    let mut feedback = Feedback::default();

    for (name, category) in &report.scoring.categories {
        let label = humanize(name);
        if category.percentage >= 100.0 {
            feedback.positive.push(format!("{label}: all checks passed"));
        } else if category.percentage > 0.0 {
            feedback.positive.push(format!(
                "{label}: {:.1}/{:.1} points",
                category.earned, category.possible
            ));
        }

        for (check, score) in &category.checks {
            if !score.passed && score.required {
                feedback
                    .improvements
                    .push(format!("{label}: fix `{}`", check));
            }
        }
    }

    if report.scoring.passed {
        feedback
            .next_steps
            .push("Submission meets the passing threshold. Review the notes above and move on to the next week.".to_string());
    } else {
        feedback.next_steps.push(format!(
            "Score is below the passing threshold of {:.0}%. Address the items above and resubmit.",
            report.passing_threshold
        ));
    }

    feedback
}

fn humanize(name: &str) -> String {
    let mut label = name.replace('_', " ");
    if let Some(first) = label.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    label
}

fn bullet_list(lines: &[String]) -> String {
    if lines.is_empty() {
        return "- None".to_string();
    }
    lines
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The built-in markdown layout.
pub fn render_markdown(report: &EvaluationReport) -> String {
    let feedback = feedback_for(report);
    let status = if report.scoring.passed {
        "PASSED"
    } else {
        "NOT PASSED"
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Week {} Evaluation: {}\n",
        report.week, report.week_title
    );
    let _ = writeln!(
        out,
        "**Status:** {status} | **Score:** {:.1}/{:.1} ({:.1}%) | **Grade:** {}\n",
        report.scoring.total.earned,
        report.scoring.total.possible,
        report.scoring.total.percentage,
        report.scoring.grade
    );

    out.push_str("## Category Breakdown\n\n");
    out.push_str("| Category | Earned | Possible | % |\n");
    out.push_str("|----------|--------|----------|---|\n");
    for (name, category) in &report.scoring.categories {
        let _ = writeln!(
            out,
            "| {} | {:.1} | {:.1} | {:.1}% |",
            humanize(name),
            category.earned,
            category.possible,
            category.percentage
        );
    }

    out.push_str("\n## What Went Well\n\n");
    out.push_str(&bullet_list(&feedback.positive));
    out.push_str("\n\n## What To Improve\n\n");
    out.push_str(&bullet_list(&feedback.improvements));
    out.push_str("\n\n## Next Steps\n\n");
    out.push_str(&bullet_list(&feedback.next_steps));

    let _ = write!(
        out,
        "\n\n---\nPassing threshold: {:.0}% | Evaluated: {}\n",
        report.passing_threshold,
        report.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    out
}

fn render_error_markdown(report: &ErrorReport) -> String {
    format!(
        "# Week {} Evaluation Failed\n\n**{}:** {}\n\nScore recorded as 0.0%.\n",
        report.week, report.error_type, report.error_message
    )
}

/// Render an envelope as markdown. When a custom template is supplied
/// and it fails to render, fall back to the built-in layout.
pub fn render(envelope: &Envelope, custom_template: Option<&str>) -> String {
    match envelope {
        Envelope::Error(report) => render_error_markdown(report),
        Envelope::Success(report) => match custom_template {
            None => render_markdown(report),
            Some(source) => match template::render(source, report) {
                Ok(rendered) => rendered,
                Err(err) => {
                    warn!("template render failed, using built-in layout: {err}");
                    render_markdown(report)
                }
            },
        },
    }
}
