use clap::Parser;
use sudan_geodata::cli::{run, Cli};
use sudan_geodata::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
