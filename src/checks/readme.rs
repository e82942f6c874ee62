//! README heuristics: setup commands, screenshot, short reflection.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{read_lossy, CheckProducer};

static COMMANDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(uvicorn|fastapi\s+dev|python\s+main\.py|pip\s+install)").unwrap()
});

pub struct ReadmeCheck;

impl CheckProducer for ReadmeCheck {
    fn name(&self) -> &'static str {
        "readme"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let contents = read_lossy(&repo.join("README.md"))
            .or_else(|| read_lossy(&repo.join("readme.md")));

        let Some(text) = contents else {
            return Ok(json!({
                "exists": false,
                "has_commands": false,
                "has_screenshot": false,
                "has_reflection": false,
            }));
        };

        let lower = text.to_lowercase();
        let has_commands = COMMANDS_RE.is_match(&text);
        let has_screenshot = text.contains("![") || lower.contains("<img");
        // Reflection heuristic: a couple of sentences that actually talk
        // about the framework or APIs.
        let mentions = lower.matches("fastapi").count() + lower.matches("api").count();
        let has_reflection = mentions >= 2 && text.matches('.').count() >= 2;

        Ok(json!({
            "exists": true,
            "has_commands": has_commands,
            "has_screenshot": has_screenshot,
            "has_reflection": has_reflection,
        }))
    }
}
