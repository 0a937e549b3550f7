//! Per-problem ingest flow - workflow layer.
//!
//! Composes the services for a single problem: locate the body on the listing
//! page, extract the statement, download attachments, write the stub. Holds
//! no scarce resources itself; the fetcher is passed in by the orchestrator.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::PageFetcher;
use crate::models::SolutionKind;
use crate::services::attachment_downloader::DownloadOutcome;
use crate::services::{
    AttachmentDownloader, ProblemListParser, SolutionWriter, StatementExtractor,
};

/// Ingests one problem end to end.
pub struct IngestFlow {
    downloader: AttachmentDownloader,
    writer: SolutionWriter,
    config: Config,
}

impl IngestFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            downloader: AttachmentDownloader::new(config),
            writer: SolutionWriter::new(config),
            config: config.clone(),
        }
    }

    /// Runs the flow for problem `number` against an already-fetched listing
    /// page. Returns the stub path, or `None` when an existing stub was kept.
    pub async fn run(
        &self,
        fetcher: &PageFetcher,
        listing_html: &str,
        number: u32,
        kind: SolutionKind,
    ) -> Result<Option<std::path::PathBuf>> {
        log_banner(number);

        let body_html = ProblemListParser::problem_body_html(listing_html, number)?;
        let statement = StatementExtractor::extract(&body_html);
        info!(" ✅ Текст задачи получен.");

        let folder = self.config.problem_folder(number);
        let reports = self
            .downloader
            .download_all(fetcher, &folder, &statement.attachments)
            .await;

        // failed downloads are reported but never referenced from the stub
        let attachment_paths: Vec<_> = reports
            .iter()
            .filter(|r| r.outcome != DownloadOutcome::Failed)
            .filter_map(|r| r.path.clone())
            .collect();

        let written = self
            .writer
            .write(number, kind, &statement.text, &attachment_paths)?;
        if written.is_none() {
            warn!(" - Файл задачи {number} оставлен без изменений.");
        }
        Ok(written)
    }
}

// ========== log helpers ==========

fn log_banner(number: u32) {
    info!("");
    info!("#===   Задача номер {number}  ===#");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::list_parser::tests::listing_fixture;

    #[tokio::test]
    async fn flow_writes_stub_for_listing_problem() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            solution_folder: dir.path().join("solutions").to_string_lossy().into_owned(),
            download_folder: dir.path().join("files").to_string_lossy().into_owned(),
            ..Config::default()
        };
        let flow = IngestFlow::new(&config);
        let fetcher = PageFetcher::new(&config).unwrap();

        let path = flow
            .run(&fetcher, &listing_fixture(), 1, SolutionKind::Plain)
            .await
            .unwrap()
            .unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("Первая задача."));
        assert!(contents.contains("Ответ: ВСТАВЬТЕ_ОТВЕТ"));
    }

    #[tokio::test]
    async fn flow_fails_cleanly_for_missing_number() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            solution_folder: dir.path().join("solutions").to_string_lossy().into_owned(),
            download_folder: dir.path().join("files").to_string_lossy().into_owned(),
            ..Config::default()
        };
        let flow = IngestFlow::new(&config);
        let fetcher = PageFetcher::new(&config).unwrap();

        let err = flow
            .run(&fetcher, &listing_fixture(), 9, SolutionKind::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::NotFound { .. }));
    }
}
