//! Solution-file artifacts written by ingest mode and consumed by check mode.

use std::path::PathBuf;

/// Stub flavour chosen at ingest time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolutionKind {
    /// Executable stub, answer recovered by running the file in checker mode.
    Script,
    /// Plain text stub, answer recovered from the `Ответ:` line.
    Plain,
}

impl SolutionKind {
    pub fn extension(self) -> &'static str {
        match self {
            SolutionKind::Script => "py",
            SolutionKind::Plain => "txt",
        }
    }
}

/// Where a committed answer comes from.
///
/// Resolved once by the orchestrator before dispatch, so the checker itself
/// never has to sniff file formats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerSource {
    /// Answer already read from a plain-text stub; used verbatim.
    Literal(String),
    /// File to execute with the checker-mode argument; stdout is the answer.
    Executable(PathBuf),
}

/// One solution file discovered on disk, ready to be checked.
#[derive(Clone, Debug)]
pub struct SolutionArtifact {
    pub number: u32,
    pub source: AnswerSource,
    /// Canonical answer page for this problem.
    pub answer_link: String,
}
