// src/main.rs

//! hwwatch: homework-review status watcher
//!
//! Polls the homework-review API for one tracked submission and forwards
//! status changes to a Telegram chat. Credentials come from the environment;
//! tunables come from an optional TOML settings file.

use clap::Parser;

use hwwatch::config::{Credentials, Settings};
use hwwatch::error::Result;
use hwwatch::pipeline::Watcher;
use hwwatch::services::{StatusApi, TelegramNotifier};

#[derive(Parser, Debug)]
#[command(name = "hwwatch", version, about = "Homework-review status watcher")]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let settings = Settings::load_or_default(&cli.config);
    settings.validate()?;

    // Missing credentials are the only fatal path: there is nothing to
    // retry and nowhere to report.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(error) => {
            log::error!("refusing to start: {error}");
            std::process::exit(1);
        }
    };

    let api = StatusApi::new(&settings, &credentials)?;
    let notifier = TelegramNotifier::new(&settings, &credentials)?;

    log::info!(
        "polling {} every {}s",
        settings.endpoint,
        settings.poll_interval_secs
    );

    let mut watcher = Watcher::new(&api, &notifier, &settings);
    if cli.once {
        watcher.cycle().await;
        return Ok(());
    }

    watcher.run().await;
    Ok(())
}
