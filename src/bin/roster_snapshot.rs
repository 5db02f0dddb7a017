use anyhow::Result;
use dotenv::dotenv;

use trader_roster::configure::load_config;
use trader_roster::logger::setup_logger;
use trader_roster::service::TraderRoster;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = load_config()?;
    setup_logger(&config)?;

    let roster = TraderRoster::from_config(&config)?;
    log::info!(target: "roster", "building snapshot for {} tracked traders", roster.traders().len());

    let snapshot = roster.builder().build().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
