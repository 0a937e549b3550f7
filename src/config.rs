use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// What to do when a write would clobber an existing file.
///
/// The interactive "заменить файл? (y/n)" prompt of the old tool is replaced
/// by this explicit policy so both binaries can run unattended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Replace the existing file.
    Overwrite,
    /// Keep the existing file, report the attachment as skipped.
    #[default]
    Skip,
    /// Surface the conflict as an error.
    Fail,
}

impl FromStr for OverwritePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(OverwritePolicy::Overwrite),
            "skip" => Ok(OverwritePolicy::Skip),
            "fail" => Ok(OverwritePolicy::Fail),
            other => Err(AppError::Config(format!(
                "неизвестная политика перезаписи: {other}"
            ))),
        }
    }
}

/// Program configuration.
///
/// Defaults match the layout produced by earlier runs of the tool, so
/// hand-written solution files keep working. Values can be overridden by an
/// optional `config.toml` next to the binary and then by environment
/// variables.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listing page with the full problem set.
    pub listing_url: String,
    /// Folder with solution stubs (`Задача номер N.py|txt`).
    pub solution_folder: String,
    /// Root folder for downloaded attachments.
    pub download_folder: String,
    /// Rendered scoreboard file.
    pub answers_file: String,
    /// Wall-clock budget for the whole check phase, seconds.
    pub check_timeout_secs: u64,
    /// Interpreter used to execute solution files in checker mode.
    pub solution_command: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Policy for existing files.
    pub overwrite: OverwritePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: "https://inf-ege.sdamgia.ru/test?id=14912698&nt=True&pub=False"
                .to_string(),
            solution_folder: "solutions".to_string(),
            download_folder: "files".to_string(),
            answers_file: "answers.html".to_string(),
            check_timeout_secs: 10,
            solution_command: "python3".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/51.0.2704.103 Safari/537.36"
                .to_string(),
            overwrite: OverwritePolicy::Skip,
        }
    }
}

impl Config {
    /// Loads configuration: defaults, then `config.toml` if present, then
    /// environment variables.
    pub fn load() -> Result<Self> {
        let base = match std::fs::read_to_string("config.toml") {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| AppError::Config(format!("config.toml: {e}")))?,
            Err(_) => Self::default(),
        };
        base.with_env()
    }

    /// Applies environment-variable overrides on top of `self`.
    pub fn with_env(self) -> Result<Self> {
        let overwrite = match std::env::var("OVERWRITE_POLICY") {
            Ok(v) => v.parse()?,
            Err(_) => self.overwrite,
        };
        Ok(Self {
            listing_url: std::env::var("LISTING_URL").unwrap_or(self.listing_url),
            solution_folder: std::env::var("SOLUTION_FOLDER").unwrap_or(self.solution_folder),
            download_folder: std::env::var("DOWNLOAD_FOLDER").unwrap_or(self.download_folder),
            answers_file: std::env::var("ANSWERS_FILE").unwrap_or(self.answers_file),
            check_timeout_secs: std::env::var("CHECK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.check_timeout_secs),
            solution_command: std::env::var("SOLUTION_COMMAND").unwrap_or(self.solution_command),
            user_agent: std::env::var("USER_AGENT").unwrap_or(self.user_agent),
            overwrite,
        })
    }

    /// Scheme + authority of the listing URL, used to resolve relative links.
    pub fn site_origin(&self) -> String {
        let url = &self.listing_url;
        match url.find("//") {
            Some(scheme_end) => match url[scheme_end + 2..].find('/') {
                Some(path_start) => url[..scheme_end + 2 + path_start].to_string(),
                None => url.clone(),
            },
            None => url.clone(),
        }
    }

    /// Per-problem attachment folder, e.g. `files/Задача номер 7`.
    pub fn problem_folder(&self, number: u32) -> std::path::PathBuf {
        Path::new(&self.download_folder).join(format!("Задача номер {number}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_scheme_and_authority() {
        let config = Config::default();
        assert_eq!(config.site_origin(), "https://inf-ege.sdamgia.ru");
    }

    #[test]
    fn origin_without_path_is_whole_url() {
        let config = Config {
            listing_url: "https://example.org".to_string(),
            ..Config::default()
        };
        assert_eq!(config.site_origin(), "https://example.org");
    }

    #[test]
    fn overwrite_policy_parses_case_insensitively() {
        assert_eq!(
            "OVERWRITE".parse::<OverwritePolicy>().unwrap(),
            OverwritePolicy::Overwrite
        );
        assert!("sometimes".parse::<OverwritePolicy>().is_err());
    }

    #[test]
    fn problem_folder_matches_legacy_layout() {
        let config = Config::default();
        assert_eq!(
            config.problem_folder(3),
            Path::new("files").join("Задача номер 3")
        );
    }
}
