//! Application error types.
//!
//! Failure policy, from coarse to fine:
//! - failing to fetch or parse the listing page aborts the whole run;
//! - `NotFound` aborts a single problem, never the run;
//! - `UnknownMimeType` aborts a single attachment;
//! - solution-file execution failures never surface here at all, they
//!   degrade inside [`crate::infrastructure::SolutionRunner`].

use std::path::PathBuf;

use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// An HTTP request failed or returned a non-success status.
    #[error("запрос к {url} не удался: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An expected page section is missing. Scoped to one problem.
    #[error("не найдено: {what}")]
    NotFound { what: String },

    /// No filesystem extension could be derived from a Content-Type.
    /// Scoped to one attachment.
    #[error("неизвестный тип файла: {content_type}")]
    UnknownMimeType { content_type: String },

    /// A file operation failed.
    #[error("ошибка файла {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing file would be overwritten and the policy forbids it.
    #[error("файл уже существует: {path}")]
    AlreadyExists { path: PathBuf },

    /// Configuration could not be loaded.
    #[error("ошибка конфигурации: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP error carrying the requested URL.
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Http {
            url: url.into(),
            source,
        }
    }

    /// Missing page section, e.g. "тело задачи 7".
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound { what: what.into() }
    }

    /// File error carrying the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

/// Application result type.
pub type Result<T> = std::result::Result<T, AppError>;
