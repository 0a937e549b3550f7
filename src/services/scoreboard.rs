//! Scoreboard rendering - business capability layer.
//!
//! Builds one row per problem number (pending placeholders fill the gaps) and
//! renders the askama template to `answers.html`. Correct answers are hidden
//! behind a hover-to-reveal span so the report does not spoil them.

use askama::Template;

use crate::models::{CheckResult, Verdict};

/// Sentinel a user writes instead of an answer they do not know yet.
pub const UNKNOWN_SENTINEL: &str = "???";
/// Sentinel a user writes to deliberately skip a problem.
pub const SKIP_SENTINEL: &str = "_skip_";

/// One rendered table row.
#[derive(Clone, Debug)]
pub struct RowView {
    /// "#N", padded and marked with 📔 when recently modified.
    pub label: String,
    /// Displayed committed answer.
    pub answer: String,
    /// Verdict glyph, possibly with a МАЛО/МНОГО token-count note.
    pub mark: String,
    /// CSS class of the mark cell: "ok", "bad" or empty.
    pub mark_class: &'static str,
    /// Official answer, padded for the spoiler span.
    pub correct: String,
    /// Answer-page link, empty for pending rows.
    pub link: String,
    /// CSS class of the whole row.
    pub row_class: &'static str,
}

/// The rendered scoreboard.
#[derive(Debug, Template)]
#[template(path = "scoreboard.html")]
pub struct Scoreboard {
    pub rows: Vec<RowView>,
    pub correct_count: usize,
    pub wrong_count: usize,
    pub pending_count: usize,
    /// "#N" labels of every problem that is not yet correct: wrong answers,
    /// timeouts, unreadable pages and missing solution files alike.
    pub to_fix: Vec<String>,
}

impl Scoreboard {
    /// Builds the table: one row for every number in `1..=task_count`,
    /// whether or not it was checked.
    pub fn build(results: &[CheckResult], task_count: u32, newest: &[u32]) -> Self {
        let width = results
            .iter()
            .map(|r| first_line_len(&r.correct))
            .max()
            .unwrap_or(0);

        let mut rows = Vec::with_capacity(task_count as usize);
        let mut correct_count = 0;
        let mut wrong_count = 0;
        let mut pending_count = 0;
        let mut to_fix = Vec::new();

        for number in 1..=task_count {
            let result = results.iter().find(|r| r.number == number);
            if result.map_or(true, |r| r.verdict != Verdict::Correct) {
                to_fix.push(format!("#{number}"));
            }
            let mut row = match result {
                Some(result) => classify(result, width),
                None => pending_row(number),
            };

            match row.mark_class {
                "ok" => correct_count += 1,
                "bad" => wrong_count += 1,
                _ => pending_count += 1,
            }

            row.label = decorate_label(&row.label, number, newest);
            rows.push(row);
        }

        Self {
            rows,
            correct_count,
            wrong_count,
            pending_count,
            to_fix,
        }
    }
}

/// The 4-way row classification.
fn classify(result: &CheckResult, width: usize) -> RowView {
    let base = RowView {
        label: format!("#{}", result.number),
        answer: if result.given.is_empty() {
            "✖".to_string()
        } else {
            result.given.clone()
        },
        mark: result.verdict.glyph().to_string(),
        mark_class: "",
        correct: pad_spoiler(&result.correct, width),
        link: result.link.clone(),
        row_class: "",
    };

    let mut row = match result.verdict {
        Verdict::Correct => RowView {
            mark_class: "ok",
            ..base
        },
        Verdict::Wrong => RowView {
            mark: wrong_mark(&result.given, &result.correct),
            mark_class: "bad",
            row_class: "wrong",
            ..base
        },
        // timeout / unreadable / pending
        _ => RowView {
            row_class: "neutral",
            ..base
        },
    };

    // sentinels change presentation; only the skip one neutralizes the verdict
    if result.given == UNKNOWN_SENTINEL {
        row.answer = "❔❔❔".to_string();
        row.row_class = "unknown";
    } else if result.given == SKIP_SENTINEL {
        row.answer = "▶ ▶ Пропуск ▶ ▶".to_string();
        row.mark = "💫".to_string();
        row.mark_class = "";
        row.row_class = "skip";
    }
    row
}

fn pending_row(number: u32) -> RowView {
    RowView {
        label: format!("#{number}"),
        answer: String::new(),
        mark: Verdict::Pending.glyph().to_string(),
        mark_class: "",
        correct: "❔".to_string(),
        link: String::new(),
        row_class: "neutral",
    }
}

/// "✖", annotated when the token counts differ on a mismatch.
fn wrong_mark(given: &str, correct: &str) -> String {
    let answers = given.split_whitespace().count();
    let corrects = correct.split_whitespace().count();
    if answers == corrects {
        "✖".to_string()
    } else if answers > corrects {
        "✖ МНОГО".to_string()
    } else {
        "✖ МАЛО".to_string()
    }
}

/// Most-recently-modified numbers get the notebook marker.
fn decorate_label(label: &str, number: u32, newest: &[u32]) -> String {
    if newest.contains(&number) {
        format!("      {label} 📔")
    } else {
        label.to_string()
    }
}

/// Pads the hidden answer so every spoiler span has the same width.
fn pad_spoiler(correct: &str, width: usize) -> String {
    let first_line = correct.split('\n').next().unwrap_or("");
    let pad = " ".repeat(width.saturating_sub(first_line.chars().count()) + 1);
    format!("{pad}{correct}{pad}")
}

fn first_line_len(correct: &str) -> usize {
    correct.split('\n').next().unwrap_or("").chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(number: u32, given: &str, correct: &str, verdict: Verdict) -> CheckResult {
        CheckResult {
            number,
            given: given.to_string(),
            correct: correct.to_string(),
            verdict,
            link: format!("https://example.org/problem?id={number}"),
        }
    }

    #[test]
    fn row_count_equals_task_count() {
        for task_count in [0u32, 1, 12] {
            let board = Scoreboard::build(&[], task_count, &[]);
            assert_eq!(board.rows.len(), task_count as usize);
        }
    }

    #[test]
    fn gaps_render_as_pending_rows() {
        let results = vec![
            result(1, "42", "42", Verdict::Correct),
            result(3, "7", "8", Verdict::Wrong),
        ];
        let board = Scoreboard::build(&results, 3, &[]);

        assert_eq!(board.rows.len(), 3);
        assert_eq!(board.rows[1].mark, "💫");
        assert_eq!(board.rows[1].row_class, "neutral");
        assert_eq!(
            (board.correct_count, board.wrong_count, board.pending_count),
            (1, 1, 1)
        );
        assert_eq!(board.to_fix, vec!["#2", "#3"]);
    }

    #[test]
    fn timeout_rows_are_indeterminate_but_listed_to_fix() {
        let board = Scoreboard::build(
            &[CheckResult::timed_out(2, "link".to_string())],
            2,
            &[],
        );
        assert_eq!(board.rows[1].mark, "⏰");
        assert_eq!(board.rows[1].row_class, "neutral");
        assert_eq!(board.pending_count, 2);
        assert_eq!(board.to_fix, vec!["#1", "#2"]);
    }

    #[test]
    fn sentinels_get_their_own_highlight() {
        let results = vec![
            result(1, "???", "42", Verdict::Wrong),
            result(2, "_skip_", "42", Verdict::Wrong),
        ];
        let board = Scoreboard::build(&results, 2, &[]);

        // unknown keeps its boolean verdict, only the highlight changes
        assert_eq!(board.rows[0].row_class, "unknown");
        assert_eq!(board.rows[0].answer, "❔❔❔");
        assert_eq!(board.rows[0].mark, "✖");
        assert_eq!(board.rows[0].mark_class, "bad");

        // skip neutralizes the verdict entirely
        assert_eq!(board.rows[1].row_class, "skip");
        assert_eq!(board.rows[1].mark, "💫");
        assert_eq!(board.rows[1].mark_class, "");

        assert_eq!(
            (board.correct_count, board.wrong_count, board.pending_count),
            (0, 1, 1)
        );
    }

    #[test]
    fn token_count_mismatch_is_annotated() {
        let board = Scoreboard::build(&[result(1, "1 2 3", "1 2", Verdict::Wrong)], 1, &[]);
        assert_eq!(board.rows[0].mark, "✖ МНОГО");

        let board = Scoreboard::build(&[result(1, "1", "1 2", Verdict::Wrong)], 1, &[]);
        assert_eq!(board.rows[0].mark, "✖ МАЛО");
    }

    #[test]
    fn recent_numbers_are_marked() {
        let board = Scoreboard::build(&[result(1, "42", "42", Verdict::Correct)], 1, &[1]);
        assert!(board.rows[0].label.contains("📔"));
    }

    #[test]
    fn template_renders_every_row() {
        let results = vec![
            result(1, "42", "42", Verdict::Correct),
            result(3, "7", "8", Verdict::Wrong),
        ];
        let board = Scoreboard::build(&results, 3, &[3]);
        let html = board.render().unwrap();

        assert_eq!(html.matches("<tr").count(), 3 + 1 + 2); // rows + 2 tables' headers
        assert!(html.contains("*Клик*"));
        assert!(html.contains("Исправить"));
        assert!(html.contains("📔"));
    }
}
