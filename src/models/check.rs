//! Results of the check phase.

/// Per-problem verdict.
///
/// Everything except `Correct`/`Wrong` is indeterminate: the scoreboard shows
/// a glyph instead of a boolean mark and counts the row as pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong,
    /// No solution file for this number.
    Pending,
    /// The check did not finish within the global budget.
    Timeout,
    /// The official answer could not be read (or the checker itself failed).
    Unreadable,
}

impl Verdict {
    /// True when there is no definitive correct/incorrect decision.
    pub fn is_indeterminate(self) -> bool {
        !matches!(self, Verdict::Correct | Verdict::Wrong)
    }

    /// Console/report glyph for indeterminate states.
    pub fn glyph(self) -> &'static str {
        match self {
            Verdict::Correct => "✔",
            Verdict::Wrong => "✖",
            Verdict::Pending => "💫",
            Verdict::Timeout => "⏰",
            Verdict::Unreadable => "❔",
        }
    }
}

/// Outcome of checking one problem.
#[derive(Clone, Debug)]
pub struct CheckResult {
    pub number: u32,
    /// Committed answer as recovered from the solution file ("✖" when empty).
    pub given: String,
    /// Normalized official answer ("❔" when unreadable).
    pub correct: String,
    pub verdict: Verdict,
    /// Answer page, linked from the scoreboard row.
    pub link: String,
}

impl CheckResult {
    /// Row for a problem whose check was abandoned at the deadline.
    pub fn timed_out(number: u32, link: String) -> Self {
        Self {
            number,
            given: "TIMEOUT".to_string(),
            correct: "❔".to_string(),
            verdict: Verdict::Timeout,
            link,
        }
    }

    /// Row for a problem whose check failed outright (fetch error, missing
    /// answer block). The run carries on.
    pub fn failed(number: u32, link: String) -> Self {
        Self {
            number,
            given: "❌".to_string(),
            correct: "❔".to_string(),
            verdict: Verdict::Unreadable,
            link,
        }
    }
}
