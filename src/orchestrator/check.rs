//! Check orchestration - resource-owning batch layer.
//!
//! Owns the fetcher, the solution runner and the concurrency budget. Scans
//! the solution folder, checks every solution against the site concurrently
//! under a wall-clock deadline, and renders the scoreboard. Work still
//! running at the deadline is abandoned and reported as timed out; dropping
//! the abandoned tasks kills their child processes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{PageFetcher, SolutionRunner};
use crate::models::{AnswerSource, CheckResult, SolutionArtifact};
use crate::services::solution_writer::parse_answer_line;
use crate::services::{AnswerChecker, ProblemListParser, Scoreboard};

/// A solution file found in the solution folder.
struct ScannedSolution {
    number: u32,
    source: AnswerSource,
    modified: Option<NaiveDate>,
}

/// The check application.
pub struct CheckApp {
    config: Config,
    fetcher: PageFetcher,
}

impl CheckApp {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let listing_html = self
            .fetcher
            .fetch_html(&self.config.listing_url)
            .await
            .context("не удалось получить страницу со списком задач")?;
        let task_count = ProblemListParser::problem_count(&listing_html)? as u32;
        let links: HashMap<u32, String> =
            ProblemListParser::entries(&listing_html, &self.config.site_origin())?
                .into_iter()
                .map(|e| (e.number, e.answer_link))
                .collect();
        info!("✅ На странице найдено задач: {task_count}");

        let solutions = scan_solutions(Path::new(&self.config.solution_folder))?;
        let newest = newest_numbers(&solutions);
        info!(
            "✅ Найдено решений: {}, проверяем параллельно.",
            solutions.len()
        );

        let runner = SolutionRunner::new(
            self.config.solution_command.clone(),
            self.config.solution_folder.clone(),
        );
        let checker = Arc::new(AnswerChecker::new(self.fetcher.clone(), runner));
        let parallelism = std::thread::available_parallelism().map_or(4, |n| n.get());
        let semaphore = Arc::new(Semaphore::new(parallelism));

        let mut handles: Vec<(u32, String, JoinHandle<CheckResult>)> = Vec::new();
        for solution in solutions {
            let link = match links.get(&solution.number) {
                Some(link) => link.clone(),
                None => {
                    warn!("⚠️ задачи {} нет на странице, файл пропущен", solution.number);
                    continue;
                }
            };
            let artifact = SolutionArtifact {
                number: solution.number,
                source: solution.source,
                answer_link: link.clone(),
            };
            let checker = Arc::clone(&checker);
            let semaphore = Arc::clone(&semaphore);
            let handle = tokio::spawn(async move {
                // closed only on shutdown, acquire cannot fail here
                let _permit = semaphore.acquire().await;
                match checker.check(&artifact).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("❌ задача {} не проверена: {}", artifact.number, e);
                        CheckResult::failed(artifact.number, artifact.answer_link.clone())
                    }
                }
            });
            handles.push((solution.number, link, handle));
        }

        let deadline =
            Instant::now() + std::time::Duration::from_secs(self.config.check_timeout_secs);
        let link_of: HashMap<u32, String> = handles
            .iter()
            .map(|(n, link, _)| (*n, link.clone()))
            .collect();
        let tagged = handles.into_iter().map(|(n, _, h)| (n, h)).collect();
        let (completed, abandoned) = collect_with_deadline(tagged, deadline).await;

        let mut results: Vec<CheckResult> = completed.into_iter().map(|(_, r)| r).collect();
        for number in abandoned {
            warn!("⏰ задача {number} не уложилась в лимит времени");
            let link = link_of.get(&number).cloned().unwrap_or_default();
            results.push(CheckResult::timed_out(number, link));
        }

        let board = Scoreboard::build(&results, task_count, &newest);
        let html = board.render()?;
        std::fs::write(&self.config.answers_file, html)
            .with_context(|| format!("не удалось записать {}", self.config.answers_file))?;

        log_done(&self.config.answers_file, &board, &newest);
        Ok(())
    }
}

/// Awaits every handle until `deadline`. Returns completed values and the
/// numbers of tasks that were abandoned (timed out or panicked); abandoned
/// tasks are aborted so their children die with them.
pub async fn collect_with_deadline<T>(
    handles: Vec<(u32, JoinHandle<T>)>,
    deadline: Instant,
) -> (Vec<(u32, T)>, Vec<u32>) {
    let mut completed = Vec::with_capacity(handles.len());
    let mut abandoned = Vec::new();
    for (number, mut handle) in handles {
        // await by reference: the handle must survive the timeout so the
        // task can be aborted instead of silently detached
        match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(value)) => completed.push((number, value)),
            Ok(Err(_)) => abandoned.push(number),
            Err(_) => {
                handle.abort();
                abandoned.push(number);
            }
        }
    }
    (completed, abandoned)
}

/// Scans the solution folder for `Задача номер N.py|txt` files. Plain-text
/// files yield their committed answer immediately; script files are resolved
/// to executables and run later, inside the deadline. A missing folder is
/// created and yields zero solutions, so the run still renders an all-pending
/// report.
fn scan_solutions(folder: &Path) -> anyhow::Result<Vec<ScannedSolution>> {
    let pattern = Regex::new(r"^Задача номер (\d+)\.(.{2,3})$").unwrap();
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(_) => {
            std::fs::create_dir_all(folder).with_context(|| {
                format!("не удалось создать папку решений {}", folder.display())
            })?;
            return Ok(Vec::new());
        }
    };

    let mut solutions = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let captures = match pattern.captures(&name) {
            Some(c) => c,
            None => continue,
        };
        let number: u32 = match captures[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let source = match &captures[2] {
            "txt" => {
                let contents = std::fs::read_to_string(entry.path())
                    .with_context(|| format!("не удалось прочитать {name}"))?;
                match parse_answer_line(&contents) {
                    Some(answer) => AnswerSource::Literal(answer),
                    None => {
                        warn!("⚠️ в файле {name} нет строки \"Ответ:\", файл пропущен");
                        continue;
                    }
                }
            }
            "py" => AnswerSource::Executable(entry.path()),
            other => {
                warn!("⚠️ неизвестное расширение .{other}, файл {name} пропущен");
                continue;
            }
        };
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .map(|t| DateTime::<Local>::from(t).date_naive());
        solutions.push(ScannedSolution {
            number,
            source,
            modified,
        });
    }
    solutions.sort_by_key(|s| s.number);
    Ok(solutions)
}

/// Numbers of the solutions touched on the most recent day.
fn newest_numbers(solutions: &[ScannedSolution]) -> Vec<u32> {
    let max = match solutions.iter().filter_map(|s| s.modified).max() {
        Some(date) => date,
        None => return Vec::new(),
    };
    solutions
        .iter()
        .filter(|s| s.modified == Some(max))
        .map(|s| s.number)
        .collect()
}

// ========== log helpers ==========

fn log_done(answers_file: &str, board: &Scoreboard, newest: &[u32]) {
    info!("");
    info!("🎉 Таблица записана в {answers_file}");
    info!(
        " ✔ {} | ✖ {} | ⚪ {}",
        board.correct_count, board.wrong_count, board.pending_count
    );
    if !newest.is_empty() {
        let labels: Vec<String> = newest.iter().map(|n| format!("#{n}")).collect();
        info!("📔 Новые задания: {}", labels.join(", "));
    }
}
