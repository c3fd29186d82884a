use anyhow::Result;
use clap::Parser;
use concourse_summary::cli::Cli;
use concourse_summary::output;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting Concourse Summary");
    cli.execute().await?;

    Ok(())
}
