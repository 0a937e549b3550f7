use ege_workbench::utils::logging;
use ege_workbench::{CheckApp, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::load()?;
    CheckApp::new(config)?.run().await
}
