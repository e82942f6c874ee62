use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use fastgrade::cli::{Cli, Commands, OutputFormat};
use fastgrade::evaluator::{error_envelope, Envelope, Evaluator};
use fastgrade::output::write_output;
use fastgrade::weeks::WEEKS;

const EXIT_PASS: u8 = 0;
const EXIT_FAIL: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Evaluate {
            repo,
            week,
            format,
            output,
            criteria,
            template,
            no_legacy_resolution,
        } => handle_evaluate(
            &repo,
            week,
            format,
            output.as_deref(),
            criteria.as_deref(),
            template.as_deref(),
            no_legacy_resolution,
        ),
        Commands::Weeks => {
            handle_weeks();
            Ok(EXIT_PASS)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_evaluate(
    repo: &Path,
    week: u32,
    format: OutputFormat,
    output: Option<&Path>,
    criteria: Option<&Path>,
    template: Option<&Path>,
    no_legacy_resolution: bool,
) -> Result<u8> {
    let template_source = template
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("reading template {}", path.display()))
        })
        .transpose()?;

    // Setup failures still produce a report envelope so graders and CI
    // consume one shape regardless of what went wrong.
    let envelope = match Evaluator::new(week, repo, criteria) {
        Ok(mut evaluator) => {
            if no_legacy_resolution {
                evaluator.set_legacy_resolution(false);
            }
            evaluator.evaluate()
        }
        Err(err) => {
            error!("evaluation could not start: {err}");
            error_envelope(week, &err)
        }
    };

    write_output(&envelope, format.into(), output, template_source.as_deref())?;
    if let Some(path) = output {
        eprintln!("Report written to {}", path.display());
    }

    Ok(exit_code(&envelope))
}

fn exit_code(envelope: &Envelope) -> u8 {
    if envelope.is_error() {
        EXIT_ERROR
    } else if envelope.passed() {
        EXIT_PASS
    } else {
        EXIT_FAIL
    }
}

fn handle_weeks() {
    println!("{:<6} {:<34} DEPENDENCIES", "WEEK", "TITLE");
    for suite in WEEKS {
        println!(
            "{:<6} {:<34} {}",
            suite.number,
            suite.title,
            suite.dependencies.join(", ")
        );
    }
}
