pub mod page_fetcher;
pub mod solution_runner;

pub use page_fetcher::PageFetcher;
pub use solution_runner::{SolutionRunner, CHECKER_MODE_ARG};
