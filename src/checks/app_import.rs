//! Sandboxed import of the student's entry module.
//!
//! Runs a small probe script under the Python interpreter that imports
//! `main.py` and reports whether an `app` attribute exists. The probe
//! executes student code, so it runs under a hard wall-clock timeout after
//! which the child is killed and the check records a failure. No retries:
//! a timed-out import is a failed check and the run proceeds.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde_json::{json, Value};
use wait_timeout::ChildExt;

use super::{structure::StructureCheck, CheckProducer};

/// Hard cap on how long the student's module may take to import.
pub const IMPORT_TIMEOUT: Duration = Duration::from_secs(3);

/// Probe executed with `python -c`; receives the module path as argv[1]
/// and prints a single JSON line.
const PROBE: &str = r#"
import importlib.util, json, sys

path = sys.argv[1]
spec = importlib.util.spec_from_file_location("student_main", path)
if spec is None or spec.loader is None:
    print(json.dumps({"import_ok": False, "has_app": False,
                      "error": "could not load main module"}))
    sys.exit(0)
module = importlib.util.module_from_spec(spec)
try:
    spec.loader.exec_module(module)
except BaseException as exc:
    print(json.dumps({"import_ok": False, "has_app": False,
                      "error": f"{type(exc).__name__}: {exc}"}))
    sys.exit(0)
print(json.dumps({"import_ok": True, "has_app": hasattr(module, "app")}))
"#;

pub struct AppImportCheck {
    pub timeout: Duration,
}

impl Default for AppImportCheck {
    fn default() -> Self {
        Self {
            timeout: IMPORT_TIMEOUT,
        }
    }
}

fn failure(error: impl Into<String>) -> Value {
    json!({"import_ok": false, "has_app": false, "error": error.into()})
}

fn interpreter() -> Option<std::path::PathBuf> {
    which::which("python3").or_else(|_| which::which("python")).ok()
}

impl CheckProducer for AppImportCheck {
    fn name(&self) -> &'static str {
        "app_import"
    }

    fn run(&self, repo: &Path) -> anyhow::Result<Value> {
        let Some(main_py) = StructureCheck::find_main(repo) else {
            return Ok(failure("main.py not found"));
        };
        let Some(python) = interpreter() else {
            return Ok(failure("no python interpreter on PATH"));
        };

        let mut child = Command::new(&python)
            .arg("-c")
            .arg(PROBE)
            .arg(&main_py)
            .current_dir(repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                child.kill()?;
                child.wait()?;
                log::info!(
                    "import of {} exceeded {:?}, killed",
                    main_py.display(),
                    self.timeout
                );
                return Ok(failure(format!(
                    "timeout importing main module after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        let mut stdout = String::new();
        if let Some(mut pipe) = child.stdout.take() {
            pipe.read_to_string(&mut stdout)?;
        }

        if let Some(line) = stdout.lines().rev().find(|l| !l.trim().is_empty()) {
            if let Ok(value) = serde_json::from_str::<Value>(line) {
                return Ok(value);
            }
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            pipe.read_to_string(&mut stderr)?;
        }
        Ok(failure(format!(
            "probe exited with {status}: {}",
            stderr.trim().chars().take(200).collect::<String>()
        )))
    }
}
