//! Game and play-log records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::row::{FromRow, Row};
use super::stats::DRAW;

const ID_KEYS: &[&str] = &["id", "game_id", "gameId"];
const NAME_KEYS: &[&str] = &["name", "game_name", "gameName", "title"];
const STATUS_KEYS: &[&str] = &["status"];
const COMPLEXITY_KEYS: &[&str] = &["complexity", "weight"];
const RANKING_KEYS: &[&str] = &["ranking", "rank"];
const PLAY_COUNT_KEYS: &[&str] = &["playCount", "play_count", "games", "plays"];
const LAST_PLAYED_KEYS: &[&str] = &["lastPlayed", "last_played"];

/// Collection status of a game. The service adds statuses without notice,
/// so unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameStatus {
    Playing,
    Inbox,
    Evaluating,
    Other(String),
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Playing => "Playing",
            Self::Inbox => "Inbox",
            Self::Evaluating => "Evaluating",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for GameStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Playing" => Self::Playing,
            "Inbox" => Self::Inbox,
            "Evaluating" => Self::Evaluating,
            _ => Self::Other(s),
        }
    }
}

impl From<GameStatus> for String {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: u64,
    pub name: String,
    pub status: Option<GameStatus>,
    pub complexity: Option<f64>,
    pub ranking: Option<f64>,
    pub play_count: u64,
    pub last_played: Option<NaiveDate>,
}

impl FromRow for Game {
    fn from_row(row: &Row<'_>) -> Option<Self> {
        Some(Self {
            id: row.u64(ID_KEYS)?,
            name: row.string(NAME_KEYS).unwrap_or_default(),
            status: row.string(STATUS_KEYS).map(GameStatus::from),
            complexity: row.f64(COMPLEXITY_KEYS),
            ranking: row.f64(RANKING_KEYS),
            play_count: row.u64(PLAY_COUNT_KEYS).unwrap_or(0),
            last_played: row.date(LAST_PLAYED_KEYS),
        })
    }

    fn identity(&self) -> Option<u64> {
        Some(self.id)
    }
}

/// A game plus whatever per-source metadata the detail endpoint returns
/// (external rating info, personal notes, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub metadata: BTreeMap<String, Value>,
}

impl GameDetail {
    fn is_game_key(key: &str) -> bool {
        [
            ID_KEYS,
            NAME_KEYS,
            STATUS_KEYS,
            COMPLEXITY_KEYS,
            RANKING_KEYS,
            PLAY_COUNT_KEYS,
            LAST_PLAYED_KEYS,
        ]
        .iter()
        .flat_map(|keys| keys.iter())
        .any(|k| k.eq_ignore_ascii_case(key))
    }
}

impl FromRow for GameDetail {
    fn from_row(row: &Row<'_>) -> Option<Self> {
        let game = Game::from_row(row)?;
        let metadata = row
            .fields()
            .iter()
            .filter(|(k, v)| {
                let structured = v.is_object() || v.is_array();
                !v.is_null() && (structured || !Self::is_game_key(k))
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Self { game, metadata })
    }

    fn identity(&self) -> Option<u64> {
        Some(self.game.id)
    }
}

/// One recorded play. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecord {
    pub date: NaiveDate,
    pub game_id: u64,
    pub game_name: Option<String>,
    pub winner: String,
    pub scores: Option<String>,
    pub comment: Option<String>,
}

impl PlayRecord {
    pub fn is_draw(&self) -> bool {
        self.winner.eq_ignore_ascii_case(DRAW)
    }
}

impl FromRow for PlayRecord {
    fn from_row(row: &Row<'_>) -> Option<Self> {
        Some(Self {
            date: row.date(&["date", "played_on", "playedOn"])?,
            // play rows may carry their own `id`; the game reference takes priority
            game_id: row.u64(&["game_id", "gameId", "id"])?,
            game_name: row.string(NAME_KEYS),
            winner: row.string(&["winner"])?,
            scores: row.string(&["scores", "score"]),
            comment: row.string(&["comment", "comments"]),
        })
    }
}

/// Outbound body for recording a play. Absent optional fields are left out
/// of the payload entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlayRecord {
    pub date: NaiveDate,
    pub game_id: u64,
    pub winner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewPlayRecord {
    pub fn new(date: NaiveDate, game_id: u64, winner: impl Into<String>) -> Self {
        Self {
            date,
            game_id,
            winner: winner.into(),
            scores: None,
            comment: None,
        }
    }

    pub fn with_scores(mut self, scores: Option<String>) -> Self {
        self.scores = non_blank(scores);
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = non_blank(comment);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Recency row from the last-played statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastPlayed {
    pub game_id: Option<u64>,
    pub name: String,
    pub last_played: Option<NaiveDate>,
    pub days_since: Option<i64>,
    pub play_count: u64,
}

impl FromRow for LastPlayed {
    fn from_row(row: &Row<'_>) -> Option<Self> {
        let game_id = row.u64(ID_KEYS);
        let name = row.string(NAME_KEYS);
        if game_id.is_none() && name.is_none() {
            return None;
        }
        Some(Self {
            game_id,
            name: name.unwrap_or_default(),
            last_played: row.date(LAST_PLAYED_KEYS),
            days_since: row.i64(&["daysSince", "days_since"]),
            play_count: row.u64(PLAY_COUNT_KEYS).unwrap_or(0),
        })
    }
}
