//! Eurogames play-log client
//!
//! Fetches games, play results and win statistics from the Eurogames API,
//! normalizes its loosely specified responses into canonical records and
//! derives win ratios and totals.

pub mod cli;
pub mod services;
pub mod types;
