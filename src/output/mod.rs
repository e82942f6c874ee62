//! Output layer: serializes an evaluation envelope as JSON, markdown,
//! or a short colored terminal summary.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::evaluator::Envelope;
use crate::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    Summary,
}

pub trait ReportWriter {
    fn write_envelope(&mut self, envelope: &Envelope, template: Option<&str>) -> Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_envelope(&mut self, envelope: &Envelope, _template: Option<&str>) -> Result<()> {
        let json = serde_json::to_string_pretty(envelope)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for MarkdownWriter<W> {
    fn write_envelope(&mut self, envelope: &Envelope, template: Option<&str>) -> Result<()> {
        let markdown = report::render(envelope, template);
        write!(self.writer, "{markdown}")?;
        Ok(())
    }
}

/// Compact terminal summary, one glance for a grader working through a
/// stack of submissions.
pub struct SummaryWriter<W: Write> {
    writer: W,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for SummaryWriter<W> {
    fn write_envelope(&mut self, envelope: &Envelope, _template: Option<&str>) -> Result<()> {
        match envelope {
            Envelope::Error(error) => {
                writeln!(
                    self.writer,
                    "{} week {}: {} ({})",
                    "ERROR".red().bold(),
                    error.week,
                    error.error_message,
                    error.error_type
                )?;
            }
            Envelope::Success(report) => {
                let status = if report.scoring.passed {
                    "PASS".green().bold()
                } else {
                    "FAIL".red().bold()
                };
                writeln!(
                    self.writer,
                    "{} week {} ({}): {:.1}% grade {}",
                    status,
                    report.week,
                    report.week_title,
                    report.scoring.total.percentage,
                    report.scoring.grade
                )?;
                for (name, category) in &report.scoring.categories {
                    let marker = if category.percentage >= 100.0 {
                        "ok".green()
                    } else {
                        format!("{:.0}%", category.percentage).yellow()
                    };
                    writeln!(
                        self.writer,
                        "  {:<16} {:>5.1}/{:<5.1} {}",
                        name, category.earned, category.possible, marker
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Writer for the requested format, targeting stdout.
pub fn create_writer(format: OutputFormat) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(io::stdout())),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(io::stdout())),
        OutputFormat::Summary => Box::new(SummaryWriter::new(io::stdout())),
    }
}

/// Emit the envelope to stdout or, when `output` is given, to a file.
pub fn write_output(
    envelope: &Envelope,
    format: OutputFormat,
    output: Option<&Path>,
    template: Option<&str>,
) -> Result<()> {
    match output {
        None => create_writer(format).write_envelope(envelope, template),
        Some(path) => {
            let mut buffer = Vec::new();
            let mut writer: Box<dyn ReportWriter + '_> = match format {
                OutputFormat::Json => Box::new(JsonWriter::new(&mut buffer)),
                OutputFormat::Markdown => Box::new(MarkdownWriter::new(&mut buffer)),
                OutputFormat::Summary => Box::new(SummaryWriter::new(&mut buffer)),
            };
            writer.write_envelope(envelope, template)?;
            drop(writer);
            fs::write(path, buffer)?;
            Ok(())
        }
    }
}
