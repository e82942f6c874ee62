//! End-to-end evaluation runs against synthetic submission repos.

use std::fs;
use std::path::Path;

use fastgrade::evaluator::{Envelope, Evaluator};
use fastgrade::scoring::Grade;
use pretty_assertions::assert_eq;

fn write(repo: &Path, relative: &str, contents: &str) {
    let path = repo.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn evaluate(week: u32, repo: &Path) -> fastgrade::evaluator::EvaluationReport {
    let evaluator = Evaluator::new(week, repo, None).unwrap();
    match evaluator.evaluate() {
        Envelope::Success(report) => *report,
        Envelope::Error(error) => panic!("unexpected error envelope: {}", error.error_message),
    }
}

#[test]
fn empty_repo_fails_week_one_with_an_f() {
    let dir = tempfile::tempdir().unwrap();
    let report = evaluate(1, dir.path());

    assert!(!report.scoring.passed);
    assert_eq!(report.scoring.grade, Grade::F);
    // The week 1 rubric carries two optional checks (screenshot and
    // gitignore) whose consolation credit survives even an empty repo;
    // every required check earns nothing.
    assert!(report.scoring.total.earned > 0.0);
    assert!(report.scoring.total.earned < 1.0);
    assert!(report.scoring.total.earned < report.passing_threshold);
    assert_eq!(report.scoring.total.possible, 100.0);

    for category in report.scoring.categories.values() {
        for check in category.checks.values() {
            if check.required {
                assert_eq!(check.points_earned, 0.0);
            }
        }
    }
}

#[test]
fn week_one_report_carries_every_rubric_category() {
    let dir = tempfile::tempdir().unwrap();
    let report = evaluate(1, dir.path());

    let categories: Vec<&str> = report
        .scoring
        .categories
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        categories,
        ["setup", "hello_world", "testing_docs", "deliverables", "understanding"]
    );
}

#[test]
fn structured_week_one_submission_earns_setup_and_endpoint_credit() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "requirements.txt",
        "fastapi==0.115.0\nuvicorn[standard]\n",
    );
    write(
        dir.path(),
        "README.md",
        "# Hello API\n\nThis FastAPI app exposes an api with two endpoints. \
         Building it taught me how FastAPI routes requests.\n\n\
         ## Setup\n\nRun `pip install -r requirements.txt` then `uvicorn main:app`.\n\n\
         ![screenshot](docs.png)\n",
    );
    write(
        dir.path(),
        "main.py",
        "from fastapi import FastAPI\n\napp = FastAPI()\n\n\
         @app.get(\"/\")\ndef root():\n    return {\"message\": \"hello\"}\n\n\
         @app.get(\"/hello/{name}\")\ndef hello(name: str):\n    return {\"hello\": name}\n",
    );
    write(dir.path(), ".gitignore", "__pycache__/\n.venv/\n");

    let report = evaluate(1, dir.path());

    let setup = &report.scoring.categories["setup"];
    assert_eq!(setup.earned, setup.possible, "setup should be complete");

    let deliverables = &report.scoring.categories["deliverables"];
    assert_eq!(deliverables.earned, deliverables.possible);

    let understanding = &report.scoring.categories["understanding"];
    assert_eq!(understanding.earned, understanding.possible);

    assert!(report.final_score > 50.0);
    assert!(report.results.contains_key("structure"));
    assert!(report.results.contains_key("requirements"));
    assert!(report.results.contains_key("endpoints"));
}

#[test]
fn week_eight_runs_the_docker_check() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Dockerfile", "FROM python:3.12-slim\n");
    write(dir.path(), "main.py", "app = None\n");

    let report = evaluate(8, dir.path());
    let docker = &report.results["docker"];
    assert_eq!(docker["dockerfile_exists"], true);
    assert_eq!(docker["compose_exists"], false);
}

#[test]
fn week_one_does_not_run_later_course_checks() {
    let dir = tempfile::tempdir().unwrap();
    let report = evaluate(1, dir.path());

    assert!(!report.results.contains_key("database"));
    assert!(!report.results.contains_key("auth"));
    assert!(!report.results.contains_key("docker"));
}

#[test]
fn custom_criteria_override_is_honored() {
    let repo = tempfile::tempdir().unwrap();
    write(repo.path(), "requirements.txt", "fastapi\n");

    let rubric = tempfile::tempdir().unwrap();
    let rubric_path = rubric.path().join("week01.yaml");
    fs::write(
        &rubric_path,
        "week_info:\n  number: 1\n  title: Custom\n  passing_threshold: 1\n\
         categories:\n  files:\n    weight: 100\n    checks:\n      - name: requirements_txt\n        points: 100\n",
    )
    .unwrap();

    let evaluator = Evaluator::new(1, repo.path(), Some(&rubric_path)).unwrap();
    let Envelope::Success(report) = evaluator.evaluate() else {
        panic!("expected a success envelope");
    };

    assert!(report.scoring.passed);
    assert_eq!(report.scoring.total.earned, 100.0);
    assert_eq!(report.scoring.grade, Grade::APlus);
}

#[test]
fn report_serializes_with_a_stable_shape() {
    let dir = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(2, dir.path(), None).unwrap();
    let envelope = evaluator.evaluate();

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["week"], 2);
    assert!(json["final_score"].is_number());
    assert!(json["passed"].is_boolean());
    assert!(json["report"].as_str().unwrap().contains("# Week 2 Evaluation"));
    assert!(json["scoring"]["categories"].is_object());
    assert!(json["results"].is_object());
    assert!(json.get("error").is_none());
}
