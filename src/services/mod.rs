//! Business capability layer: each service does exactly one thing.

pub mod answer_checker;
pub mod attachment_downloader;
pub mod list_parser;
pub mod scoreboard;
pub mod solution_writer;
pub mod statement_extractor;

pub use answer_checker::AnswerChecker;
pub use attachment_downloader::AttachmentDownloader;
pub use list_parser::ProblemListParser;
pub use scoreboard::Scoreboard;
pub use solution_writer::SolutionWriter;
pub use statement_extractor::StatementExtractor;
