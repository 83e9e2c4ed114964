//! Services: fetching, normalization, statistics

pub mod client;
pub mod config;
pub mod fetcher;
pub mod normalizer;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{EurogamesClient, DEFAULT_PLAYS_LIMIT};
pub use config::{ClientConfig, ConfigOverrides};
pub use fetcher::{Fetcher, HttpFetcher};
pub use normalizer::{canonicalize, decode_list, decode_record, Canonical};
pub use stats::StatsDeriver;
