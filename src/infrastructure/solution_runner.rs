//! Solution-file execution - infrastructure layer.
//!
//! Solution files are untrusted user code. They are always executed as a
//! separate OS process with captured stdout, never in-process, and a task
//! abandoned at the deadline kills the child via `kill_on_drop`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::warn;

/// Argument that tells a solution file it is being checked, not debugged.
/// Part of the solution-file contract: with this argument the file must print
/// its committed answer to stdout and exit.
pub const CHECKER_MODE_ARG: &str = "checker";

/// Runs solution files in checker mode.
#[derive(Clone, Debug)]
pub struct SolutionRunner {
    command: String,
    workdir: PathBuf,
}

impl SolutionRunner {
    /// `command` is the interpreter (e.g. `python3`), `workdir` the solution
    /// folder. Files run with the folder as cwd so their relative
    /// `open("../files/...")` references resolve.
    pub fn new(command: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            workdir: workdir.into(),
        }
    }

    /// Recovers the committed answer by executing the file.
    ///
    /// Stdout is lower-cased and trimmed, and is used even when the file
    /// exits non-zero (the exit is only logged). A spawn failure degrades to
    /// an empty answer; the checker never crashes because of user code.
    pub async fn committed_answer(&self, file: &Path) -> String {
        let output = Command::new(&self.command)
            .arg(file)
            .arg(CHECKER_MODE_ARG)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) => {
                if !output.status.success() {
                    warn!("⚠️ решение {} завершилось с ошибкой", file.display());
                }
                String::from_utf8_lossy(&output.stdout)
                    .to_lowercase()
                    .trim_matches(|c| c == ' ' || c == '\n')
                    .to_string()
            }
            Err(e) => {
                warn!("⚠️ не удалось запустить {}: {}", file.display(), e);
                String::new()
            }
        }
    }
}
