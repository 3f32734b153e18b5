//! Configuration loading tests

use poly_scout::config::Config;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_example_matches_defaults() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let defaults = Config::default();

    assert_eq!(config.scanner.max_alerts, defaults.scanner.max_alerts);
    assert_eq!(config.scanner.min_volume_24h, defaults.scanner.min_volume_24h);
    assert_eq!(config.scanner.max_spread, defaults.scanner.max_spread);
    assert_eq!(config.position.notional, defaults.position.notional);
    assert_eq!(config.position.max_hold_secs, defaults.position.max_hold_secs);
    assert_eq!(config.gamma.base_url, defaults.gamma.base_url);
    assert_eq!(config.clob.base_url, defaults.clob.base_url);
    assert_eq!(config.scoring.strong_move, defaults.scoring.strong_move);
    assert_eq!(config.telemetry.metrics_port, None);
}

#[test]
fn test_load_partial_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [scanner]
        max_spread = 0.03
        lookahead_hours = 24

        [position]
        take_profit_offset = "0.05"

        [telemetry]
        metrics_port = 9090
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.scanner.max_spread, dec!(0.03));
    assert_eq!(config.scanner.lookahead_hours, 24);
    assert_eq!(config.scanner.min_liquidity, dec!(2000));
    assert_eq!(config.position.take_profit_offset, dec!(0.05));
    assert_eq!(config.position.stop_loss_offset, dec!(0.02));
    assert_eq!(config.monitor.poll_interval_secs, 30);
    assert_eq!(config.telemetry.metrics_port, Some(9090));
}

#[test]
fn test_load_missing_file_fails() {
    assert!(Config::load("/nonexistent/poly-scout.toml").is_err());
}
