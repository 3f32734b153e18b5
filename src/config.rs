//! Configuration types for poly-scout

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub position: PositionConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub gamma: ApiConfig,
    #[serde(default = "default_clob_api")]
    pub clob: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            scoring: ScoringConfig::default(),
            position: PositionConfig::default(),
            monitor: MonitorConfig::default(),
            gamma: ApiConfig::default(),
            clob: default_clob_api(),
            storage: StorageConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Opportunity scanner configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Maximum opportunities in a single-shot report
    pub max_alerts: usize,
    /// Markets requested from the catalog per cycle
    pub fetch_limit: usize,
    /// Minimum trailing 24h volume
    pub min_volume_24h: Decimal,
    /// Minimum market liquidity
    pub min_liquidity: Decimal,
    /// Maximum bid/ask spread on the selected token
    pub max_spread: Decimal,
    /// Minimum absolute mid move since the last snapshot (live mode only)
    pub min_move: Decimal,
    /// Markets must end within this many hours
    pub lookahead_hours: u64,
    /// Notional used for fill simulation
    pub notional: Decimal,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_alerts: 5,
            fetch_limit: 200,
            min_volume_24h: dec!(5000),
            min_liquidity: dec!(2000),
            max_spread: dec!(0.04),
            min_move: dec!(0.01),
            lookahead_hours: 72,
            notional: dec!(50),
        }
    }
}

/// Weights and saturation points for the opportunity score
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Reward weight for 24h volume
    pub volume_weight: f64,
    /// Reward weight for liquidity
    pub liquidity_weight: f64,
    /// Reward weight for move magnitude
    pub movement_weight: f64,
    /// Penalty weight for spread
    pub spread_penalty: f64,
    /// Penalty weight for combined buy + sell slippage
    pub slippage_penalty: f64,
    /// log10(volume) at which the volume score saturates
    pub volume_log_ceiling: f64,
    /// log10(liquidity) at which the liquidity score saturates
    pub liquidity_log_ceiling: f64,
    /// Move at which the move score saturates
    pub strong_move: f64,
    /// Spread at which the spread penalty saturates
    pub bad_spread: f64,
    /// Combined slippage at which the slippage penalty saturates
    pub bad_slippage: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            volume_weight: 30.0,
            liquidity_weight: 25.0,
            movement_weight: 45.0,
            spread_penalty: 20.0,
            slippage_penalty: 15.0,
            volume_log_ceiling: 6.0,
            liquidity_log_ceiling: 5.0,
            strong_move: 0.05,
            bad_spread: 0.05,
            bad_slippage: 0.04,
        }
    }
}

/// Simulated position configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Take-profit distance above entry
    pub take_profit_offset: Decimal,
    /// Stop-loss distance below entry
    pub stop_loss_offset: Decimal,
    /// Maximum holding time
    pub max_hold_secs: u64,
    /// Entry notional
    pub notional: Decimal,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            take_profit_offset: dec!(0.02),
            stop_loss_offset: dec!(0.02),
            max_hold_secs: 1800,
            notional: dec!(50),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
        }
    }
}

/// Remote API endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::market::GAMMA_API_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

fn default_clob_api() -> ApiConfig {
    ApiConfig {
        base_url: crate::orderbook::CLOB_API_URL.to_string(),
        timeout_secs: 10,
    }
}

/// State document storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub state_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("./state"),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub json_logs: bool,
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
