//! CLI interface for poly-scout
//!
//! Provides subcommands for:
//! - `scan`: Single-shot opportunity report
//! - `monitor`: Poll loop with one simulated position
//! - `status`: Show run state and the last closed trade
//! - `config`: Show effective configuration

mod monitor;
mod scan;
mod status;

pub use monitor::MonitorArgs;
pub use scan::ScanArgs;
pub use status::show_status;

use crate::config::Config;
use crate::data::JsonFileStore;
use crate::driver::Driver;
use crate::market::{GammaClient, GammaConfig};
use crate::orderbook::{ClobClient, ClobConfig};
use crate::position::PositionLifecycle;
use crate::scanner::Scanner;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "poly-scout")]
#[command(about = "Opportunity scanner and paper trader for Polymarket order books")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print ranked opportunities once
    Scan(ScanArgs),
    /// Run the poll/monitor loop
    Monitor(MonitorArgs),
    /// Show current state
    Status,
    /// Show configuration
    Config,
}

/// Wire the HTTP clients and JSON store into a driver
pub fn build_driver(config: &Config) -> anyhow::Result<Driver> {
    let catalog = GammaClient::with_config(GammaConfig {
        base_url: config.gamma.base_url.clone(),
        timeout: Duration::from_secs(config.gamma.timeout_secs),
    })?;
    let books = ClobClient::with_config(ClobConfig {
        base_url: config.clob.base_url.clone(),
        timeout: Duration::from_secs(config.clob.timeout_secs),
    })?;
    let store = JsonFileStore::open(&config.storage.state_dir)?;

    Ok(Driver::new(
        Arc::new(catalog),
        Arc::new(books),
        Arc::new(store),
        Scanner::new(config.scanner.clone(), config.scoring.clone()),
        PositionLifecycle::new(config.position.clone()),
    ))
}

/// Print the effective configuration
pub fn show_config(config: &Config) {
    let s = &config.scanner;
    let p = &config.position;
    println!("Current configuration:");
    println!(
        "  Scanner: min_vol={} min_liq={} max_spread={} min_move={} lookahead={}h notional={}",
        s.min_volume_24h, s.min_liquidity, s.max_spread, s.min_move, s.lookahead_hours, s.notional
    );
    println!("  Report: max_alerts={} fetch_limit={}", s.max_alerts, s.fetch_limit);
    println!(
        "  Position: tp=+{} sl=-{} max_hold={}s notional={}",
        p.take_profit_offset, p.stop_loss_offset, p.max_hold_secs, p.notional
    );
    println!("  Poll interval: {}s", config.monitor.poll_interval_secs);
    println!("  Gamma: {}", config.gamma.base_url);
    println!("  CLOB: {}", config.clob.base_url);
    println!("  State dir: {}", config.storage.state_dir.display());
}
