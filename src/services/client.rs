//! Eurogames API client: one method per logical operation
//!
//! Each call performs exactly one fetch, normalizes the payload and returns
//! canonical records. Transport failures propagate unchanged; unrecognized
//! payload shapes come back as empty results.

use crate::services::config::ClientConfig;
use crate::services::fetcher::{Fetcher, HttpFetcher};
use crate::services::normalizer::{decode_list, decode_record};
use crate::types::{
    EurogamesError, Game, GameDetail, LastPlayed, NewPlayRecord, PlayRecord, Result, Totals,
    WinnerStat,
};
use serde_json::Value;
use tracing::{info, warn};

/// Default number of plays requested from the plays and recent endpoints
pub const DEFAULT_PLAYS_LIMIT: u32 = 50;

const GAMES_PATH: &str = "/v1/games";
const PLAYS_PATH: &str = "/v1/plays";
const RECENT_PATH: &str = "/v1/stats/recent";
const LAST_PLAYED_PATH: &str = "/v1/stats/last-played";
const WINNERS_PATH: &str = "/v1/stats/winners";
const TOTALS_PATH: &str = "/v1/stats/totals";

// Fallback keys for responses without a `data` envelope
const GAMES_KEY: &str = "games";
const GAME_KEY: &str = "game";
const PLAYS_KEY: &str = "plays";
const WINNERS_KEY: &str = "winners";
const TOTALS_KEY: &str = "totals";

pub struct EurogamesClient<F = HttpFetcher> {
    fetcher: F,
}

impl EurogamesClient<HttpFetcher> {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new(config)?))
    }
}

impl<F: Fetcher> EurogamesClient<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// List games. Without a status filter the `status` parameter is left
    /// out entirely, which makes the service return every status.
    pub fn list_games(&self, status: Option<&str>) -> Result<Vec<Game>> {
        let query: Vec<(&str, String)> = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![("status", s.to_string())])
            .unwrap_or_default();
        let payload = self.fetcher.fetch(GAMES_PATH, &query)?;
        Ok(decode_list(payload, GAMES_KEY))
    }

    /// Single game with its metadata. `Ok(None)` means not found.
    pub fn game_detail(&self, game_id: u64) -> Result<Option<GameDetail>> {
        let payload = self.fetcher.fetch(&game_path(game_id), &[])?;
        Ok(decode_record(payload, GAME_KEY))
    }

    /// Every recorded play of one game
    pub fn game_history(&self, game_id: u64) -> Result<Vec<PlayRecord>> {
        let path = format!("{}/history", game_path(game_id));
        let payload = self.fetcher.fetch(&path, &[])?;
        Ok(decode_list(payload, PLAYS_KEY))
    }

    /// Play log, newest first, up to `limit` entries
    pub fn play_results(&self, limit: u32) -> Result<Vec<PlayRecord>> {
        let payload = self.fetcher.fetch(PLAYS_PATH, &limit_query(limit))?;
        Ok(decode_list(payload, PLAYS_KEY))
    }

    pub fn recent_plays(&self, limit: u32) -> Result<Vec<PlayRecord>> {
        let payload = self.fetcher.fetch(RECENT_PATH, &limit_query(limit))?;
        Ok(decode_list(payload, PLAYS_KEY))
    }

    pub fn last_played(&self) -> Result<Vec<LastPlayed>> {
        let payload = self.fetcher.fetch(LAST_PLAYED_PATH, &[])?;
        Ok(decode_list(payload, GAMES_KEY))
    }

    pub fn winner_stats(&self) -> Result<Vec<WinnerStat>> {
        let payload = self.fetcher.fetch(WINNERS_PATH, &[])?;
        Ok(decode_list(payload, WINNERS_KEY))
    }

    /// Aggregate totals as computed by the service. No data is all zeros.
    pub fn totals(&self) -> Result<Totals> {
        let payload = self.fetcher.fetch(TOTALS_PATH, &[])?;
        Ok(decode_record(payload, TOTALS_KEY).unwrap_or_default())
    }

    /// Record a play. Returns the service's verdict; transport failures
    /// are errors, never `Ok(false)`.
    pub fn add_result(&self, record: &NewPlayRecord) -> Result<bool> {
        let body = serde_json::to_value(record)
            .map_err(|e| EurogamesError::Parse(e.to_string()))?;
        let response = self.fetcher.submit(PLAYS_PATH, &body)?;
        let accepted = submission_accepted(&response);
        if accepted {
            info!(game_id = record.game_id, date = %record.date, "result recorded");
        } else {
            warn!(game_id = record.game_id, date = %record.date, "service rejected result");
        }
        Ok(accepted)
    }
}

fn game_path(game_id: u64) -> String {
    format!("{}/{}", GAMES_PATH, game_id)
}

fn limit_query(limit: u32) -> Vec<(&'static str, String)> {
    vec![("limit", limit.to_string())]
}

/// Success unless the response carries an explicit `success: false`
fn submission_accepted(response: &Value) -> bool {
    response
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}
