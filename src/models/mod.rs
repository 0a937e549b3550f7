pub mod check;
pub mod problem;
pub mod solution;

pub use check::{CheckResult, Verdict};
pub use problem::{AttachmentRef, ProblemEntry, Statement};
pub use solution::{AnswerSource, SolutionArtifact, SolutionKind};
