//! Containerization check: Dockerfile and compose configuration presence.

use std::path::Path;

use serde_json::{json, Value};

use super::CheckProducer;

pub struct DockerCheck;

impl CheckProducer for DockerCheck {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let dockerfile_exists = repo.join("Dockerfile").is_file();
        let compose_exists = repo.join("docker-compose.yml").is_file()
            || repo.join("docker-compose.yaml").is_file()
            || repo.join("compose.yaml").is_file();
        let dockerignore = repo.join(".dockerignore").is_file();

        Ok(json!({
            "dockerfile_exists": dockerfile_exists,
            "compose_exists": compose_exists,
            "dockerignore": dockerignore,
        }))
    }
}
