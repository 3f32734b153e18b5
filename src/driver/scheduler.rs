//! Poll loop scheduling

use super::{CycleOutcome, Driver};
use crate::data::{RunState, StoreError};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Runs driver cycles on a fixed interval until shutdown is signalled
///
/// Shutdown is only observed between cycles; a cycle in progress always
/// completes and persists its state.
pub struct Scheduler {
    driver: Driver,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Scheduler {
    pub fn new(driver: Driver, interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            driver,
            interval,
            shutdown,
        }
    }

    /// Run until shutdown; returns the last good state
    ///
    /// A failed fetch is logged and the previous state carried forward. A
    /// storage failure stops the loop and is returned.
    pub async fn run(mut self, mut state: RunState) -> anyhow::Result<RunState> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval = ?self.interval, "Starting poll loop");

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.shutdown.changed() => break,
            }

            match self.driver.cycle(state.clone(), Utc::now()).await {
                Ok((next, outcome)) => {
                    log_outcome(&outcome);
                    state = next;
                }
                Err(e) if e.downcast_ref::<StoreError>().is_some() => {
                    tracing::error!("State storage failed, stopping poll loop: {:#}", e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("Poll cycle failed: {:#}", e);
                }
            }
        }

        tracing::info!("Poll loop stopped");
        Ok(state)
    }
}

fn log_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Opened(position) => tracing::info!(
            position_id = %position.id,
            market = %position.question,
            outcome = %position.outcome,
            "Cycle opened position"
        ),
        CycleOutcome::NoOpportunity => tracing::debug!("Cycle found no opportunity"),
        CycleOutcome::Held(mark) => tracing::debug!(
            bid = %mark.bid,
            unrealized_pnl = %mark.unrealized_pnl,
            "Cycle held position"
        ),
        CycleOutcome::Closed(summary) => tracing::info!(
            position_id = %summary.position_id,
            reason = ?summary.reason,
            pnl = %summary.pnl,
            "Cycle closed position"
        ),
        CycleOutcome::NoQuote => tracing::debug!("Cycle could not price position"),
    }
}
