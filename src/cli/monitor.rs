//! Monitor command implementation

use super::build_driver;
use crate::config::Config;
use crate::driver::{CycleOutcome, Scheduler};
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Seconds between cycles
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Position notional
    #[arg(long)]
    pub notional: Option<Decimal>,

    /// Take-profit distance above entry
    #[arg(long)]
    pub take_profit: Option<Decimal>,

    /// Stop-loss distance below entry
    #[arg(long)]
    pub stop_loss: Option<Decimal>,

    /// Maximum holding time in seconds
    #[arg(long)]
    pub max_hold_secs: Option<u64>,
}

impl MonitorArgs {
    /// Apply command-line overrides
    pub fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.interval_secs {
            config.monitor.poll_interval_secs = secs;
        }
        let position = &mut config.position;
        if let Some(notional) = self.notional {
            position.notional = notional;
        }
        if let Some(tp) = self.take_profit {
            position.take_profit_offset = tp;
        }
        if let Some(sl) = self.stop_loss {
            position.stop_loss_offset = sl;
        }
        if let Some(secs) = self.max_hold_secs {
            position.max_hold_secs = secs;
        }
    }

    pub async fn execute(
        &self,
        config: &Config,
        shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let mut config = config.clone();
        self.apply(&mut config);

        let driver = build_driver(&config)?;
        let state = driver.load_state(Utc::now())?;

        if self.once {
            let (_, outcome) = driver.cycle(state, Utc::now()).await?;
            print_outcome(&outcome);
            return Ok(());
        }

        let interval = Duration::from_secs(config.monitor.poll_interval_secs.max(1));
        let state = Scheduler::new(driver, interval, shutdown).run(state).await?;
        if let Some(position) = state.open_position {
            tracing::info!(
                position_id = %position.id,
                "Stopped with an open position; it resumes on next start"
            );
        }
        Ok(())
    }
}

fn print_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Opened(p) => println!(
            "Opened {} on \"{}\" at {} ({} shares, tp {}, sl {})",
            p.outcome,
            p.question,
            p.entry.avg_price,
            p.entry.shares.round_dp(4),
            p.exits.take_profit,
            p.exits.stop_loss
        ),
        CycleOutcome::NoOpportunity => println!("No opportunity this cycle"),
        CycleOutcome::Held(mark) => println!(
            "Holding: bid {} ask {} unrealized {}",
            mark.bid,
            mark.ask,
            mark.unrealized_pnl.round_dp(4)
        ),
        CycleOutcome::Closed(s) => println!(
            "Closed ({:?}): entry {} exit {} pnl {}",
            s.reason,
            s.entry_avg_price,
            s.exit_avg_price.round_dp(4),
            s.pnl.round_dp(4)
        ),
        CycleOutcome::NoQuote => println!("Open position has no quote this cycle"),
    }
}
