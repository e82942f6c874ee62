//! Dependency check: does `requirements.txt` declare the packages the
//! week's material requires?

use std::path::Path;

use serde_json::{json, Map, Value};

use super::{read_lossy, CheckProducer};

pub struct RequirementsCheck {
    /// Packages expected for the week being graded.
    pub dependencies: &'static [&'static str],
}

/// Package name from one requirements line, lowercased and stripped of
/// version specifiers, extras and environment markers.
fn package_name(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
        return None;
    }
    let name: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect();
    if name.is_empty() {
        None
    } else {
        Some(name.to_ascii_lowercase())
    }
}

impl CheckProducer for RequirementsCheck {
    fn name(&self) -> &'static str {
        "requirements"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let mut map = Map::new();

        let Some(contents) = read_lossy(&repo.join("requirements.txt")) else {
            map.insert("ok".into(), json!(false));
            for dep in self.dependencies {
                map.insert((*dep).into(), json!(false));
            }
            return Ok(Value::Object(map));
        };

        let declared: Vec<String> = contents.lines().filter_map(package_name).collect();

        map.insert("ok".into(), json!(true));
        map.insert("declared".into(), json!(declared.len()));
        for dep in self.dependencies {
            let found = declared.iter().any(|name| name == dep);
            map.insert((*dep).into(), json!(found));
        }
        Ok(Value::Object(map))
    }
}
