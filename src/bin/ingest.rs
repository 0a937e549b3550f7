use ege_workbench::utils::logging;
use ege_workbench::{Config, IngestApp};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::load()?;
    IngestApp::new(config)?.run().await
}
