//! Database layer check: SQLAlchemy models, engine and session setup,
//! Alembic migrations.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{python_files, read_lossy, CheckProducer};

static MODEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"class\s+\w+\s*\(\s*(?:Base|DeclarativeBase|SQLModel|db\.Model)")
        .unwrap()
});

static ENGINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"create_(?:async_)?engine\s*\(").unwrap());

static SESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:sessionmaker|async_sessionmaker)\s*\(").unwrap());

pub struct DatabaseCheck;

impl CheckProducer for DatabaseCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let mut models_exist = false;
        let mut connection_ok = false;
        let mut session_setup = false;

        for path in python_files(repo, 4) {
            let Some(source) = read_lossy(&path) else {
                continue;
            };
            models_exist |= MODEL_RE.is_match(&source) || source.contains("__tablename__");
            connection_ok |= ENGINE_RE.is_match(&source);
            session_setup |= SESSION_RE.is_match(&source);
        }

        let migrations = repo.join("alembic.ini").is_file()
            || repo.join("alembic").is_dir()
            || repo.join("migrations").is_dir();

        Ok(json!({
            "models_exist": models_exist,
            "connection_ok": connection_ok,
            "session_setup": session_setup,
            "migrations": migrations,
        }))
    }
}
