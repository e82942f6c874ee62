use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full evaluation report as JSON
    Json,
    /// Student-facing markdown report
    Markdown,
    /// One-glance terminal summary
    Summary,
}

impl From<OutputFormat> for crate::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => crate::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::output::OutputFormat::Markdown,
            OutputFormat::Summary => crate::output::OutputFormat::Summary,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fastgrade")]
#[command(about = "Automated grading for FastAPI course submissions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a submission repository against a week's rubric
    Evaluate {
        /// Path to the submission repository
        repo: PathBuf,

        /// Course week to grade (1-11)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=11))]
        week: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rubric YAML overriding the built-in criteria for the week
        #[arg(long)]
        criteria: Option<PathBuf>,

        /// Custom markdown report template
        #[arg(long)]
        template: Option<PathBuf>,

        /// Resolve check names only against producer output, skipping
        /// the legacy name table
        #[arg(long = "no-legacy-resolution")]
        no_legacy_resolution: bool,
    },

    /// List the course weeks this tool can grade
    Weeks,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
