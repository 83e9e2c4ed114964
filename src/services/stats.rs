//! Statistics derivation: win ratios, totals, recency
//!
//! The winners/totals endpoints use abbreviated and inconsistently cased
//! field names (`Games`, `Andrew`, `Draw`, `AndrewRatio`, ...). They are
//! remapped to the canonical `WinnerStat` / `Totals` fields here; anything
//! unmapped (including the service's own ratio columns) is dropped.

use crate::types::{FromRow, LastPlayed, Row, Totals, WinnerStat, PLAYERS};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

const GAME_ID_KEYS: &[&str] = &["game_id", "gameId", "id"];
const GAME_NAME_KEYS: &[&str] = &["name", "game_name", "gameName", "game"];
const TOTAL_KEYS: &[&str] = &["totalGames", "total_games", "games", "played", "total"];
const DRAW_KEYS: &[&str] = &["draws", "draw"];

/// Derives presentation statistics from canonical records
pub struct StatsDeriver;

impl StatsDeriver {
    /// Percentage of `total` won, rounded to one decimal.
    /// Zero games played is a 0% ratio, never NaN.
    ///
    /// Rounding is half-to-even on the exact binary value, so `1/16` (6.25%)
    /// gives 6.2 and `3/2000` (stored as 0.1499...) gives 0.1.
    pub fn win_ratio(wins: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let ratio = 100.0 * wins as f64 / total as f64;
        format!("{:.1}", ratio).parse().unwrap_or(ratio)
    }

    /// Win ratio of `player` for one game
    pub fn ratio(stat: &WinnerStat, player: &str) -> f64 {
        Self::win_ratio(stat.wins(player), stat.total_games)
    }

    /// Win ratio of `player` across all games
    pub fn totals_ratio(totals: &Totals, player: &str) -> f64 {
        Self::win_ratio(totals.wins(player), totals.total_games)
    }

    /// Sum games, each player's wins and draws independently.
    /// Missing fields were already decoded as 0, so nothing aborts the sum.
    pub fn aggregate(stats: &[WinnerStat]) -> Totals {
        let mut totals = Totals {
            wins_by_player: zero_wins(),
            ..Totals::default()
        };

        for stat in stats {
            totals.total_games = totals.total_games.saturating_add(stat.total_games);
            totals.draws = totals.draws.saturating_add(stat.draws);
            for (player, wins) in &stat.wins_by_player {
                let entry = totals.wins_by_player.entry(player.clone()).or_insert(0);
                *entry = entry.saturating_add(*wins);
            }
        }

        totals
    }

    /// Translate a per-game statistics row to a `WinnerStat`.
    /// Rows with neither a game id nor a name are not statistics.
    pub fn remap_winner(row: &Row<'_>) -> Option<WinnerStat> {
        let game_id = row.u64(GAME_ID_KEYS);
        let game_name = row.string(GAME_NAME_KEYS);
        if game_id.is_none() && game_name.is_none() {
            return None;
        }

        let stat = WinnerStat {
            game_id,
            game_name: game_name.unwrap_or_default(),
            total_games: row.u64(TOTAL_KEYS).unwrap_or(0),
            wins_by_player: player_wins(row),
            draws: row.u64(DRAW_KEYS).unwrap_or(0),
        };

        if !stat.is_consistent() {
            debug!(
                game = %stat.game_name,
                total = stat.total_games,
                draws = stat.draws,
                "win counts do not add up to games played"
            );
        }
        Some(stat)
    }

    /// Translate an aggregate totals row. Every missing field counts as 0.
    pub fn remap_totals(row: &Row<'_>) -> Totals {
        Totals {
            total_games: row.u64(TOTAL_KEYS).unwrap_or(0),
            wins_by_player: player_wins(row),
            draws: row.u64(DRAW_KEYS).unwrap_or(0),
        }
    }

    /// Whole days from `last_played` to `today`, never negative
    pub fn days_since(last_played: NaiveDate, today: NaiveDate) -> i64 {
        (today - last_played).num_days().max(0)
    }

    /// Fill in `days_since` where the service left it out
    pub fn fill_recency(rows: &mut [LastPlayed], today: NaiveDate) {
        for row in rows.iter_mut() {
            if row.days_since.is_none() {
                row.days_since = row.last_played.map(|d| Self::days_since(d, today));
            }
        }
    }
}

impl FromRow for WinnerStat {
    fn from_row(row: &Row<'_>) -> Option<Self> {
        StatsDeriver::remap_winner(row)
    }
}

impl FromRow for Totals {
    fn from_row(row: &Row<'_>) -> Option<Self> {
        Some(StatsDeriver::remap_totals(row))
    }
}

fn zero_wins() -> BTreeMap<String, u64> {
    PLAYERS.iter().map(|p| (p.to_string(), 0)).collect()
}

/// Wins for each known player; accepts `Andrew`, `andrewWins`, `andrew_wins`
fn player_wins(row: &Row<'_>) -> BTreeMap<String, u64> {
    PLAYERS
        .iter()
        .map(|player| {
            let camel = format!("{}Wins", player.to_lowercase());
            let snake = format!("{}_wins", player.to_lowercase());
            let wins = row.u64(&[*player, camel.as_str(), snake.as_str()]).unwrap_or(0);
            (player.to_string(), wins)
        })
        .collect()
}
