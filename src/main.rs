use anyhow::Result;
use salon_dashboard::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
