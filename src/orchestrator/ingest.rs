//! Ingest orchestration - resource-owning batch layer.
//!
//! Owns the fetcher, asks the user which problems to ingest and in what form,
//! and drives the per-problem workflow. A problem missing from the listing is
//! logged and skipped; a missing listing aborts the run.

use std::io::Write;
use std::str::FromStr;

use anyhow::Context;
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::PageFetcher;
use crate::models::SolutionKind;
use crate::services::ProblemListParser;
use crate::workflow::IngestFlow;

/// Which problems the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    One(u32),
    Range(u32, u32),
    All,
}

impl Selection {
    /// Expands into concrete problem numbers, capped by the listing size.
    pub fn numbers(self, task_count: u32) -> Vec<u32> {
        match self {
            Selection::One(n) => vec![n],
            Selection::Range(a, b) => (a..=b.min(task_count)).collect(),
            Selection::All => (1..=task_count).collect(),
        }
    }
}

impl FromStr for Selection {
    type Err = AppError;

    /// Accepts `7`, `2-5` or `все`/`all`/`*`.
    fn from_str(s: &str) -> crate::error::Result<Self> {
        let s = s.trim();
        if matches!(s.to_lowercase().as_str(), "все" | "all" | "*") {
            return Ok(Selection::All);
        }
        if let Some((a, b)) = s.split_once('-') {
            let a: u32 = a
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("не число: {a}")))?;
            let b: u32 = b
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("не число: {b}")))?;
            if a == b {
                return Err(AppError::Config("Числа должны быть разными".to_string()));
            }
            if a > b {
                return Err(AppError::Config(
                    "Число А должно быть меньше B".to_string(),
                ));
            }
            return Ok(Selection::Range(a, b));
        }
        let n: u32 = s
            .parse()
            .map_err(|_| AppError::Config(format!("не число: {s}")))?;
        Ok(Selection::One(n))
    }
}

/// The ingest application.
pub struct IngestApp {
    config: Config,
    fetcher: PageFetcher,
    flow: IngestFlow,
}

impl IngestApp {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let fetcher = PageFetcher::new(&config)?;
        let flow = IngestFlow::new(&config);
        Ok(Self {
            config,
            fetcher,
            flow,
        })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let listing_html = self
            .fetcher
            .fetch_html(&self.config.listing_url)
            .await
            .context("не удалось получить страницу со списком задач")?;
        let task_count = ProblemListParser::problem_count(&listing_html)? as u32;
        info!("✅ На странице найдено задач: {task_count}");

        let selection: Selection = prompt(" - ❔ Номер задачи (N, A-B или все): ")?.parse()?;

        let mut written = 0usize;
        for number in selection.numbers(task_count) {
            let kind = ask_kind(number)?;
            match self.flow.run(&self.fetcher, &listing_html, number, kind).await {
                Ok(Some(_)) => written += 1,
                Ok(None) => {}
                Err(e @ AppError::NotFound { .. }) => error!("❌ {e}"),
                Err(e) => return Err(e.into()),
            }
        }

        log_done(written);
        Ok(())
    }
}

/// Asks whether the problem needs a code stub or a plain-text answer file.
fn ask_kind(number: u32) -> crate::error::Result<SolutionKind> {
    let reply = prompt(&format!(" - ❔ Задача {number}: простой ответ? (y/n) "))?;
    if reply.trim().eq_ignore_ascii_case("y") {
        Ok(SolutionKind::Plain)
    } else {
        Ok(SolutionKind::Script)
    }
}

fn prompt(text: &str) -> crate::error::Result<String> {
    print!("{text}");
    std::io::stdout()
        .flush()
        .map_err(|e| AppError::Config(e.to_string()))?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| AppError::Config(e.to_string()))?;
    Ok(line.trim().to_string())
}

// ========== log helpers ==========

fn log_done(written: usize) {
    info!("");
    info!(
        "🎉 Готово: создано {written} файл{}.",
        crate::utils::text::file_suffix(written)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_number_parses() {
        assert_eq!("7".parse::<Selection>().unwrap(), Selection::One(7));
        assert_eq!(" 3 ".parse::<Selection>().unwrap(), Selection::One(3));
    }

    #[test]
    fn range_parses_and_validates() {
        assert_eq!("2-5".parse::<Selection>().unwrap(), Selection::Range(2, 5));
        assert!("5-2".parse::<Selection>().is_err());
        assert!("4-4".parse::<Selection>().is_err());
    }

    #[test]
    fn all_keyword_in_both_languages() {
        for s in ["все", "ВСЕ", "all", "*"] {
            assert_eq!(s.parse::<Selection>().unwrap(), Selection::All);
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("abc".parse::<Selection>().is_err());
        assert!("1-x".parse::<Selection>().is_err());
    }

    #[test]
    fn selection_expands_within_task_count() {
        assert_eq!(Selection::All.numbers(3), vec![1, 2, 3]);
        assert_eq!(Selection::Range(2, 9).numbers(4), vec![2, 3, 4]);
        assert_eq!(Selection::One(7).numbers(4), vec![7]);
    }
}
