//! # Cricket League
//!
//! Fantasy cricket league backend: scores player performances, totals
//! fantasy teams and publishes a tie-aware leaderboard.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, performances, teams, rule sets)
//! - **calculate**: Points calculation, team aggregation and ranking
//! - **standings**: Recompute and persist league standings
//! - **storage**: Storage contract with in-memory and JSONL backends
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod standings;
pub mod storage;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "7d", "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('d') {
        (n, 86_400)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.trim().parse().ok()?;
    num.checked_mul(multiplier).map(Duration::from_secs)
}
