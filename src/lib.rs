//! poly-scout: Opportunity scanner and single-position paper trader for
//! Polymarket order books
//!
//! This library provides the core components for:
//! - Market discovery via the Gamma API
//! - Order book snapshots from the CLOB REST API
//! - Depth-walking fill simulation
//! - Opportunity scoring, filtering and ranking
//! - A single simulated position with take-profit, stop-loss and time stop
//! - JSON state persistence between poll cycles
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod execution;
pub mod market;
pub mod orderbook;
pub mod position;
pub mod scanner;
pub mod snapshot;
pub mod telemetry;
