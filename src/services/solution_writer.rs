//! Solution stub writer - business capability layer.
//!
//! Produces the files a user later fills in by hand. Their shape is a
//! contract with check mode and with solution files written by earlier runs,
//! so both the filename pattern and the `Ответ:` marker are fixed.

use std::path::PathBuf;

use tracing::info;

use crate::config::{Config, OverwritePolicy};
use crate::error::{AppError, Result};
use crate::models::SolutionKind;

/// Placeholder the user replaces with the actual answer.
pub const ANSWER_PLACEHOLDER: &str = "ВСТАВЬТЕ_ОТВЕТ";
/// Marker line prefix holding the committed answer in plain-text stubs.
pub const ANSWER_MARKER: &str = "Ответ:";

const WRAP_WIDTH: usize = 120;

/// Writes solution stubs into the solution folder.
pub struct SolutionWriter {
    folder: PathBuf,
    source_url: String,
    policy: OverwritePolicy,
}

impl SolutionWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            folder: PathBuf::from(&config.solution_folder),
            source_url: config.listing_url.clone(),
            policy: config.overwrite,
        }
    }

    /// Filename for a problem's stub, e.g. `Задача номер 7.py`.
    pub fn file_name(number: u32, kind: SolutionKind) -> String {
        format!("Задача номер {number}.{}", kind.extension())
    }

    /// Renders and writes the stub. Returns the path, or `Ok(None)` when an
    /// existing file was kept per the overwrite policy.
    pub fn write(
        &self,
        number: u32,
        kind: SolutionKind,
        statement_text: &str,
        attachment_paths: &[PathBuf],
    ) -> Result<Option<PathBuf>> {
        let filename = Self::file_name(number, kind);
        let path = self.folder.join(&filename);

        if path.exists() {
            match self.policy {
                OverwritePolicy::Skip => {
                    info!("Создание отменено: {filename} уже существует");
                    return Ok(None);
                }
                OverwritePolicy::Fail => return Err(AppError::AlreadyExists { path }),
                OverwritePolicy::Overwrite => {}
            }
        }

        let contents = match kind {
            SolutionKind::Plain => self.render_plain(statement_text),
            SolutionKind::Script => self.render_script(statement_text, attachment_paths),
        };

        std::fs::create_dir_all(&self.folder).map_err(|e| AppError::file(&self.folder, e))?;
        std::fs::write(&path, contents).map_err(|e| AppError::file(&path, e))?;
        info!("Создан файл: \"{filename}\"");
        Ok(Some(path))
    }

    /// Plain-text form: wrapped statement with blank lines between paragraphs
    /// and the answer marker at the end.
    fn render_plain(&self, statement_text: &str) -> String {
        let wrapped: Vec<String> = statement_text
            .split('\n')
            .map(|paragraph| crate::utils::text::wrap(paragraph, WRAP_WIDTH, ""))
            .collect();
        format!(
            "Источник: {u}\n\nЗадача:\n{d}\n\n\n{m} {p}\n",
            u = self.source_url,
            d = wrapped.join("\n\n"),
            m = ANSWER_MARKER,
            p = ANSWER_PLACEHOLDER,
        )
    }

    /// Code-stub form: statement as `# ` comments plus `open(...)` reference
    /// lines for the downloaded attachments, relative to the solution folder.
    fn render_script(&self, statement_text: &str, attachment_paths: &[PathBuf]) -> String {
        let description = crate::utils::text::wrap(statement_text, WRAP_WIDTH, "# ");

        let files_block = if attachment_paths.is_empty() {
            "\n".to_string()
        } else {
            let lines: Vec<String> = attachment_paths
                .iter()
                .map(|p| format!("open(r\"../{}\")", p.display().to_string().replace('\\', "/")))
                .collect();
            format!("# Файлы:\n{}\n", lines.join("\n"))
        };

        format!(
            "# Источник: {u}\n\n# Задача:\n{d}\n\n{f}",
            u = self.source_url,
            d = description,
            f = files_block,
        )
    }
}

/// Recovers the committed answer from a plain-text stub: the rest of the
/// line after the first `Ответ:` marker, trimmed.
pub fn parse_answer_line(contents: &str) -> Option<String> {
    let start = contents.find(ANSWER_MARKER)? + ANSWER_MARKER.len();
    let rest = &contents[start..];
    let line = match rest.find('\n') {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(line.trim().to_string())
}
