//! Status command implementation

use crate::config::Config;
use crate::data::{JsonFileStore, StateStore};
use crate::position::ClosedTradeSummary;

/// Print run state and report the last closed trade once
pub fn show_status(config: &Config) -> anyhow::Result<()> {
    let store = JsonFileStore::open(&config.storage.state_dir)?;
    print!("{}", render_status(&store)?);
    Ok(())
}

/// Status text; consumes the unreported last-closed notification
pub fn render_status(store: &dyn StateStore) -> anyhow::Result<String> {
    let mut out = String::from("poly-scout status\n");

    match store.load_run_state()? {
        None => out.push_str("  State: never run\n"),
        Some(state) => {
            out.push_str(&format!("  Started: {}\n", state.created_at.to_rfc3339()));
            if let Some(at) = state.last_scan_at {
                out.push_str(&format!("  Last scan: {}\n", at.to_rfc3339()));
            }
            match state.open_position {
                None => out.push_str("  Position: none\n"),
                Some(p) => {
                    out.push_str(&format!(
                        "  Position: {} \"{}\" entry {} tp {} sl {}\n",
                        p.outcome,
                        p.question,
                        p.entry.avg_price,
                        p.exits.take_profit,
                        p.exits.stop_loss
                    ));
                    if let Some(mark) = p.last_mark {
                        out.push_str(&format!(
                            "  Last mark: bid {} ask {} unrealized {} at {}\n",
                            mark.bid,
                            mark.ask,
                            mark.unrealized_pnl.round_dp(4),
                            mark.at.to_rfc3339()
                        ));
                    }
                }
            }
        }
    }

    if let Some(summary) = store.take_unnotified()? {
        out.push_str(&render_closed(&summary));
    }

    Ok(out)
}

fn render_closed(s: &ClosedTradeSummary) -> String {
    format!(
        "  Closed: {} \"{}\" {:?} entry {} exit {} shares {} pnl {} after {}s\n",
        s.outcome,
        s.question,
        s.reason,
        s.entry_avg_price,
        s.exit_avg_price.round_dp(4),
        s.shares.round_dp(4),
        s.pnl.round_dp(4),
        s.duration_secs
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryStore, RunState};
    use crate::position::{ExitPricing, ExitReason};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_status_never_run() {
        let store = MemoryStore::new();
        let text = render_status(&store).unwrap();
        assert!(text.contains("never run"));
    }

    #[test]
    fn test_closed_trade_reported_once() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.save_run_state(&RunState::new(now)).unwrap();
        store
            .record_close(&ClosedTradeSummary {
                position_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, b"status-test"),
                market_id: "m1".to_string(),
                question: "Will it?".to_string(),
                token_id: "tok".to_string(),
                outcome: "Yes".to_string(),
                opened_at: now,
                closed_at: now,
                duration_secs: 90,
                entry_avg_price: dec!(0.40),
                exit_avg_price: dec!(0.38),
                shares: dec!(125),
                pnl: dec!(-2.5),
                reason: ExitReason::StopLoss,
                exit_pricing: ExitPricing::Simulated,
            })
            .unwrap();

        let first = render_status(&store).unwrap();
        assert!(first.contains("Closed: Yes"));
        assert!(first.contains("StopLoss"));
        assert!(first.contains("Position: none"));

        let second = render_status(&store).unwrap();
        assert!(!second.contains("Closed:"));
    }
}
