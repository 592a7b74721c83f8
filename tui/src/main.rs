use clap::Parser;
use quarry_tui::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    quarry_tui::run_main(cli).await
}
