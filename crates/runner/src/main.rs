use log::{error, info, warn};
use nftrader_runner::{MarketSimulation, RunnerConfig, load_catalog};
use std::path::Path;

fn print_help() {
    eprintln!(
        r#"NFT Trader - offline market simulation

USAGE:
    nftrader [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    NFTRADER_TICK_INTERVAL_MS   Time between price ticks (default: 10000)
    NFTRADER_HISTORY_POINTS     Price samples kept per asset (default: 60)
    NFTRADER_STRATEGY           random_walk | mean_reverting | bounded
    NFTRADER_SEED               Seed for reproducible prices
    NFTRADER_RUN_FOR_SECS       Demo duration (default: 30)
    NFTRADER_DEMO_USER          User the demo trades as
    NFTRADER_CATALOG            JSON file of catalog rows
    NFTRADER_DATA_URL           Hosted data service URL
    NFTRADER_DATA_KEY           Hosted data service key
    RUST_LOG                    Log level filter

EXAMPLES:
    # Fast ticks for a quick look
    NFTRADER_TICK_INTERVAL_MS=500 NFTRADER_RUN_FOR_SECS=10 nftrader

    # Run with config file
    nftrader --config nftrader.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            RunnerConfig::from_file(&path)?
        }
        None => RunnerConfig::from_env()?,
    };
    config.validate()?;

    if let Some(data_service) = &config.data_service {
        warn!(
            "Data service configured at {}; this build trades against in-memory adapters",
            data_service.url.as_deref().unwrap_or_default()
        );
    }

    let catalog = load_catalog(config.catalog_path.as_deref().map(Path::new))?;
    let simulation = MarketSimulation::with_catalog(config.simulation(), catalog).await?;
    let results = simulation.run().await;

    for asset in &results.assets {
        let range = asset
            .sparkline
            .map(|s| format!("{}..{}", s.min, s.max))
            .unwrap_or_default();
        info!(
            "{} {:<16} {:>10} ({}%) range {}",
            asset.trend.arrow(),
            asset.name,
            asset.price,
            asset.percent,
            range
        );
    }
    for trade in &results.trades {
        info!(
            "tick {:>3}: {:?} {} at {} -> balance {}",
            trade.tick, trade.side, trade.asset_id, trade.price, trade.balance
        );
    }
    if let Some(balance) = results.final_balance {
        info!("Final balance: {}", balance);
    }

    if let Some(err) = &results.error {
        error!("Simulation failed: {}", err);
        std::process::exit(1);
    }
    Ok(())
}
