use anyhow::Result;
use toolshed::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
