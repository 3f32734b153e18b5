//! Scan command implementation

use super::build_driver;
use crate::config::Config;
use crate::scanner::Opportunity;
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Maximum opportunities to print
    #[arg(long)]
    pub max_alerts: Option<usize>,

    /// Notional used for fill simulation
    #[arg(long)]
    pub notional: Option<Decimal>,

    /// Minimum 24h volume
    #[arg(long)]
    pub min_volume: Option<Decimal>,

    /// Only markets ending within this many hours
    #[arg(long)]
    pub lookahead_hours: Option<u64>,
}

impl ScanArgs {
    /// Apply command-line overrides
    pub fn apply(&self, config: &mut Config) {
        let scanner = &mut config.scanner;
        if let Some(max_alerts) = self.max_alerts {
            scanner.max_alerts = max_alerts;
        }
        if let Some(notional) = self.notional {
            scanner.notional = notional;
        }
        if let Some(min_volume) = self.min_volume {
            scanner.min_volume_24h = min_volume;
        }
        if let Some(hours) = self.lookahead_hours {
            scanner.lookahead_hours = hours;
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        self.apply(&mut config);

        let driver = build_driver(&config)?;
        let opportunities = driver.report_once(Utc::now()).await?;

        if opportunities.is_empty() {
            println!("No opportunities found");
            return Ok(());
        }

        print_report(&opportunities);
        Ok(())
    }
}

fn print_report(opportunities: &[Opportunity]) {
    println!(
        "{:>5}  {:<48}  {:<10}  {:>6}  {:>6}  {:>6}  {:>7}  {:>7}  {:>12}  {:<16}",
        "SCORE", "MARKET", "OUTCOME", "BID", "ASK", "SPREAD", "SLIP_B", "SLIP_S", "VOL_24H", "ENDS"
    );
    for opp in opportunities {
        let ends = opp
            .market
            .end_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<48}  {:<10}  {:>6}  {:>6}  {:>6}  {:>7}  {:>7}  {:>12}  {:<16}",
            opp.score,
            truncate(&opp.market.question, 48),
            truncate(&opp.outcome, 10),
            opp.bid.round_dp(3),
            opp.ask.round_dp(3),
            opp.spread.round_dp(3),
            opp.slippage_buy.round_dp(4),
            opp.slippage_sell.round_dp(4),
            opp.market.volume_24h.round_dp(0),
            ends,
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}
