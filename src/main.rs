use std::path::PathBuf;

use clap::Parser;
use easykatka::app::{App, Config, RunOptions};
use tokio::signal;
use tracing::{error, info};

/// Dota 2 roster tracker: console report or Telegram bot.
#[derive(Parser, Debug)]
#[command(name = "easykatka", version, about)]
struct Cli {
    /// File with one account id (32-bit or SteamID64) per line.
    #[arg(long, default_value = "account_id")]
    roster: PathBuf,

    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the console report and exit instead of monitoring.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!(bot_mode = config.bot_mode(), "easykatka starting");

    let options = RunOptions {
        roster: cli.roster,
        once: cli.once,
    };
    tokio::select! {
        result = App::run(config, options) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }
}
