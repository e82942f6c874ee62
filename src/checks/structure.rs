//! Project structure check: expected files at the repository root.

use std::path::Path;

use serde_json::{json, Value};

use super::{python_files, CheckProducer};

/// Locations a student's entry module is accepted at.
pub const MAIN_CANDIDATES: &[&str] = &["main.py", "app.py", "src/main.py"];

pub struct StructureCheck;

impl StructureCheck {
    /// First entry-module candidate that exists, if any.
    pub fn find_main(repo: &Path) -> Option<std::path::PathBuf> {
        MAIN_CANDIDATES
            .iter()
            .map(|candidate| repo.join(candidate))
            .find(|path| path.is_file())
    }
}

impl CheckProducer for StructureCheck {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let main_py = Self::find_main(repo).is_some();
        let requirements_txt = repo.join("requirements.txt").is_file();
        let readme_md = repo.join("README.md").is_file() || repo.join("readme.md").is_file();
        let gitignore = repo.join(".gitignore").is_file();

        let ok = main_py && requirements_txt && readme_md;
        let python_count = python_files(repo, 6).len();

        Ok(json!({
            "ok": ok,
            "files": {
                "main_py": main_py,
                "requirements_txt": requirements_txt,
                "readme_md": readme_md,
                "gitignore": gitignore,
            },
            "python_files": python_count,
        }))
    }
}
