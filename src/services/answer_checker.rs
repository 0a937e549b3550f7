//! Answer checking - business capability layer.
//!
//! Recovers the committed answer from a solution artifact, scrapes the
//! official answer from the problem's canonical page and compares the two.
//! Safe to run concurrently, one instance of work per problem: the only
//! shared state is the read-only fetcher/runner pair.

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::infrastructure::{PageFetcher, SolutionRunner};
use crate::models::{AnswerSource, CheckResult, SolutionArtifact, Verdict};

/// Shown when the official answer cannot be read at all.
pub const UNREADABLE_ANSWER: &str = "❔";

/// Checks one solution artifact against the live answer page.
pub struct AnswerChecker {
    fetcher: PageFetcher,
    runner: SolutionRunner,
}

impl AnswerChecker {
    pub fn new(fetcher: PageFetcher, runner: SolutionRunner) -> Self {
        Self { fetcher, runner }
    }

    pub async fn check(&self, artifact: &SolutionArtifact) -> Result<CheckResult> {
        // 1. the committed answer
        let given = match &artifact.source {
            AnswerSource::Literal(answer) => answer.clone(),
            AnswerSource::Executable(path) => self.runner.committed_answer(path).await,
        };

        // 2. the official one
        let html = self.fetcher.fetch_html(&artifact.answer_link).await?;
        let correct = extract_correct_answer(&html, artifact.number)?;

        // 3. verdict
        let verdict = if correct == UNREADABLE_ANSWER {
            Verdict::Unreadable
        } else if normalize_answer(&given) == normalize_answer(&correct) {
            Verdict::Correct
        } else {
            Verdict::Wrong
        };

        Ok(CheckResult {
            number: artifact.number,
            given,
            correct,
            verdict,
            link: artifact.answer_link.clone(),
        })
    }
}

/// Strips the characters that never matter for comparison: spaces and the
/// em-dash the site likes to typeset into answers.
pub fn normalize_answer(answer: &str) -> String {
    answer.replace([' ', '—'], "")
}

/// Extracts the official answer from an answer page.
///
/// The solution block is the `div` whose id matches `sol\d+`. The answer
/// normally follows the last occurrence of the word "ответ"; pages without a
/// textual answer (an embedded diagram) fall back to the first `<center><p>`
/// block, and an unreadable page degrades to [`UNREADABLE_ANSWER`] instead of
/// failing the run.
pub fn extract_correct_answer(html: &str, number: u32) -> Result<String> {
    let document = Html::parse_document(html);
    let block_text = solution_block_text(&document)
        .ok_or_else(|| AppError::not_found(format!("блок решения задачи {number}")))?
        .to_lowercase();

    let located = locate_after_marker(&block_text);
    let mut correct = normalize_answer(&located);

    // Non-text answer heuristic: the page embeds a diagram instead of text.
    // Best effort only; mismatches are for manual review.
    let first_alphabetic = correct
        .chars()
        .next()
        .map_or(false, |c| c.is_alphabetic());
    let purely_numeric = !correct.is_empty() && correct.chars().all(|c| c.is_numeric());
    if !first_alphabetic && !purely_numeric {
        correct = match first_center_paragraph(&document) {
            Some(text) => text.to_lowercase(),
            None => return Ok(UNREADABLE_ANSWER.to_string()),
        };
    }

    // Comparability transform for anything that is not a single word.
    let purely_alphabetic = !correct.is_empty() && correct.chars().all(|c| c.is_alphabetic());
    if purely_alphabetic {
        return Ok(correct);
    }
    let runs = Regex::new(r"[\da-zа-яё]+").unwrap();
    let joined = runs
        .find_iter(&correct)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        return Ok(UNREADABLE_ANSWER.to_string());
    }
    Ok(joined)
}

/// Text after the last "ответ" marker up to the next period. A degenerate
/// match (no marker at all) takes the last whitespace-delimited token of the
/// whole block instead.
fn locate_after_marker(block_text: &str) -> String {
    match block_text.rfind("ответ") {
        Some(position) => {
            // skip the word itself plus one delimiter character
            let mut start = position + "ответ".len();
            if let Some(c) = block_text[start..].chars().next() {
                start += c.len_utf8();
            }
            let rest = &block_text[start..];
            let end = rest.find('.').unwrap_or(rest.len());
            rest[..end].trim().to_string()
        }
        None => block_text
            .split_whitespace()
            .last()
            .unwrap_or("")
            .trim_matches(|c| c == '\n' || c == '.' || c == ' ' || c == '—')
            .to_string(),
    }
}

fn solution_block_text(document: &Html) -> Option<String> {
    let divs = Selector::parse("div[id]").unwrap();
    let sol_id = Regex::new(r"^sol\d+$").unwrap();
    document
        .select(&divs)
        .find(|div| {
            div.value()
                .attr("id")
                .map_or(false, |id| sol_id.is_match(id))
        })
        .map(|div| div.text().collect::<String>())
}

fn first_center_paragraph(document: &Html) -> Option<String> {
    let selector = Selector::parse("center > p").unwrap();
    document.select(&selector).next().map(|p| {
        p.text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    })
}
