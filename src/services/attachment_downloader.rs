//! Attachment download - business capability layer.

use std::path::{Path, PathBuf};

use phf::phf_map;
use tracing::{info, warn};

use crate::config::{Config, OverwritePolicy};
use crate::error::{AppError, Result};
use crate::infrastructure::PageFetcher;
use crate::models::AttachmentRef;
use crate::utils::text;

/// Human-readable attachment category, used as the fallback filename.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileCategory {
    Table,
    Image,
    Document,
    Unknown,
}

impl FileCategory {
    /// Name shown in logs and used when an attachment has no label.
    pub fn name(self) -> &'static str {
        match self {
            FileCategory::Table => "Таблица",
            FileCategory::Image => "Картинка",
            FileCategory::Document => "Текстовик",
            FileCategory::Unknown => "unknown",
        }
    }
}

static CATEGORY_BY_EXTENSION: phf::Map<&'static str, FileCategory> = phf_map! {
    "xlsx" => FileCategory::Table,
    "jpg" => FileCategory::Image,
    "jpeg" => FileCategory::Image,
    "png" => FileCategory::Image,
    "txt" => FileCategory::Document,
    "docx" => FileCategory::Document,
};

/// What happened to one attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    Written,
    Skipped,
    Failed,
}

/// Per-attachment report for the ingest summary.
#[derive(Clone, Debug)]
pub struct DownloadReport {
    pub filename: String,
    pub category: FileCategory,
    pub outcome: DownloadOutcome,
    /// Destination path, present unless the download failed early.
    pub path: Option<PathBuf>,
}

/// Downloads a problem's attachments into `files/Задача номер {N}/`.
pub struct AttachmentDownloader {
    origin: String,
    policy: OverwritePolicy,
}

impl AttachmentDownloader {
    pub fn new(config: &Config) -> Self {
        Self {
            origin: config.site_origin(),
            policy: config.overwrite,
        }
    }

    /// Downloads every attachment; one failure never aborts the others.
    pub async fn download_all(
        &self,
        fetcher: &PageFetcher,
        folder: &Path,
        attachments: &[AttachmentRef],
    ) -> Vec<DownloadReport> {
        let mut reports = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            match self.download_one(fetcher, folder, attachment).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!("❌ файл {} не скачан: {}", attachment.link, e);
                    reports.push(DownloadReport {
                        filename: attachment.link.clone(),
                        category: FileCategory::Unknown,
                        outcome: DownloadOutcome::Failed,
                        path: None,
                    });
                }
            }
        }
        log_summary(&reports);
        reports
    }

    async fn download_one(
        &self,
        fetcher: &PageFetcher,
        folder: &Path,
        attachment: &AttachmentRef,
    ) -> Result<DownloadReport> {
        let url = if attachment.link.starts_with("http") {
            attachment.link.clone()
        } else {
            format!("{}{}", self.origin, attachment.link)
        };

        let (bytes, content_type) = fetcher.fetch_bytes(&url).await?;
        let content_type = content_type.unwrap_or_default();
        let extension = extension_for(&content_type).ok_or(AppError::UnknownMimeType {
            content_type: content_type.clone(),
        })?;
        let category = CATEGORY_BY_EXTENSION
            .get(extension)
            .copied()
            .unwrap_or(FileCategory::Unknown);

        let stem = text::sanitize(&attachment.label);
        let stem = if stem.trim().is_empty() {
            category.name().to_string()
        } else {
            stem
        };
        let filename = format!("{stem}.{extension}");
        let path = folder.join(&filename);

        let outcome = persist(&bytes, &path, self.policy)?;
        Ok(DownloadReport {
            filename,
            category,
            outcome,
            path: Some(path),
        })
    }
}

/// Derives a filesystem extension from a Content-Type value. The site's known
/// types are mapped directly; everything else goes through `mime_guess`.
fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "text/plain" => Some("txt"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some("xlsx"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        _ => mime_guess::get_mime_extensions_str(essence).and_then(|list| list.first().copied()),
    }
}

/// Writes bytes to `path`, creating the per-problem folder (and the download
/// root) on first use. Existing files are resolved by the overwrite policy.
fn persist(bytes: &[u8], path: &Path, policy: OverwritePolicy) -> Result<DownloadOutcome> {
    if path.exists() {
        match policy {
            OverwritePolicy::Skip => return Ok(DownloadOutcome::Skipped),
            OverwritePolicy::Fail => {
                return Err(AppError::AlreadyExists {
                    path: path.to_path_buf(),
                })
            }
            OverwritePolicy::Overwrite => {}
        }
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::file(parent, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| AppError::file(path, e))?;
    Ok(DownloadOutcome::Written)
}

// ========== log helpers ==========

fn log_summary(reports: &[DownloadReport]) {
    if reports.is_empty() {
        info!(" - Нечего скачивать ✖");
        return;
    }
    info!(
        " ✅ Найдено {} файл{}.",
        reports.len(),
        text::file_suffix(reports.len())
    );
    info!(" - Скаченные файлы:");
    for (i, report) in reports.iter().enumerate() {
        let mark = match report.outcome {
            DownloadOutcome::Written => "✔",
            DownloadOutcome::Skipped => "↷",
            DownloadOutcome::Failed => "❌",
        };
        info!(
            "\t{}. {:25} | {} | ({})",
            i + 1,
            report.filename,
            mark,
            report.category.name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_content_type_maps_to_image_category() {
        let ext = extension_for("image/png").unwrap();
        assert_eq!(ext, "png");
        assert_eq!(CATEGORY_BY_EXTENSION.get(ext).copied(), Some(FileCategory::Image));
    }

    #[test]
    fn parameters_are_stripped_from_content_type() {
        assert_eq!(extension_for("text/plain; charset=utf-8"), Some("txt"));
    }

    #[test]
    fn spreadsheet_maps_to_table() {
        let ext = extension_for(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )
        .unwrap();
        assert_eq!(ext, "xlsx");
        assert_eq!(CATEGORY_BY_EXTENSION.get(ext).copied(), Some(FileCategory::Table));
    }

    #[test]
    fn unmappable_content_type_is_an_error() {
        assert_eq!(extension_for("application/x-nonsense-format"), None);
    }

    #[test]
    fn unknown_extension_still_gets_a_category() {
        assert_eq!(
            CATEGORY_BY_EXTENSION.get("pdf").copied(),
            None,
            "pdf не входит в известные категории"
        );
    }

    #[test]
    fn persist_respects_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Задача номер 1").join("Картинка.png");

        assert_eq!(
            persist(b"one", &path, OverwritePolicy::Skip).unwrap(),
            DownloadOutcome::Written
        );
        assert_eq!(
            persist(b"two", &path, OverwritePolicy::Skip).unwrap(),
            DownloadOutcome::Skipped
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"one");

        assert_eq!(
            persist(b"three", &path, OverwritePolicy::Overwrite).unwrap(),
            DownloadOutcome::Written
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"three");

        let err = persist(b"four", &path, OverwritePolicy::Fail).unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { .. }));
    }
}
