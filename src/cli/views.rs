//! Text views for each report page

use std::fmt::Write as _;

use super::table::Table;
use crate::services::StatsDeriver;
use crate::types::{Game, GameDetail, LastPlayed, PlayRecord, Totals, WinnerStat, PLAYERS};

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn ratio(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn games(games: &[Game]) -> Table {
    let mut table = Table::new(&[
        "Name",
        "ID",
        "Status",
        "Complexity",
        "Ranking",
        "Played",
        "Last played",
    ]);
    for g in games {
        table.push_row(vec![
            g.name.clone(),
            g.id.to_string(),
            opt(g.status.as_ref()),
            opt(g.complexity),
            opt(g.ranking),
            g.play_count.to_string(),
            opt(g.last_played),
        ]);
    }
    table
}

/// Play log across games
pub fn plays(plays: &[PlayRecord]) -> Table {
    let mut table = Table::new(&["Date", "ID", "Name", "Winner", "Scores"]);
    for p in plays {
        table.push_row(vec![
            p.date.to_string(),
            p.game_id.to_string(),
            opt(p.game_name.as_ref()),
            p.winner.clone(),
            opt(p.scores.as_ref()),
        ]);
    }
    table
}

/// Play log of a single game
pub fn history(plays: &[PlayRecord]) -> Table {
    let mut table = Table::new(&["Date", "Winner", "Scores", "Comment"]);
    for p in plays {
        table.push_row(vec![
            p.date.to_string(),
            p.winner.clone(),
            opt(p.scores.as_ref()),
            opt(p.comment.as_ref()),
        ]);
    }
    table
}

pub fn last_played(rows: &[LastPlayed]) -> Table {
    let mut table = Table::new(&["Last played", "Days since", "Played", "Name"]);
    for r in rows {
        table.push_row(vec![
            opt(r.last_played),
            opt(r.days_since),
            r.play_count.to_string(),
            r.name.clone(),
        ]);
    }
    table
}

fn stat_headers(first: &str) -> Vec<String> {
    let mut headers = vec![first.to_string(), "Played".to_string()];
    headers.extend(PLAYERS.iter().map(|p| p.to_string()));
    headers.push("Draw".to_string());
    headers.extend(PLAYERS.iter().map(|p| format!("{} ratio", p)));
    headers
}

pub fn winners(stats: &[WinnerStat]) -> Table {
    let headers = stat_headers("Name");
    let mut table = Table::new(&headers.iter().map(String::as_str).collect::<Vec<_>>());
    for s in stats {
        let mut row = vec![s.game_name.clone(), s.total_games.to_string()];
        row.extend(PLAYERS.iter().map(|p| s.wins(p).to_string()));
        row.push(s.draws.to_string());
        row.extend(PLAYERS.iter().map(|p| ratio(StatsDeriver::ratio(s, p))));
        table.push_row(row);
    }
    table
}

pub fn totals(totals: &Totals) -> Table {
    let headers = stat_headers("");
    let mut table = Table::new(&headers.iter().map(String::as_str).collect::<Vec<_>>());
    let mut row = vec!["Total".to_string(), totals.total_games.to_string()];
    row.extend(PLAYERS.iter().map(|p| totals.wins(p).to_string()));
    row.push(totals.draws.to_string());
    row.extend(
        PLAYERS
            .iter()
            .map(|p| ratio(StatsDeriver::totals_ratio(totals, p))),
    );
    table.push_row(row);
    table
}

/// Key/value listing of one game and its per-source metadata
pub fn detail(detail: &GameDetail) -> String {
    let g = &detail.game;
    let mut out = String::new();
    let fields = [
        ("Name", g.name.clone()),
        ("ID", g.id.to_string()),
        ("Status", opt(g.status.as_ref())),
        ("Complexity", opt(g.complexity)),
        ("Ranking", opt(g.ranking)),
        ("Played", g.play_count.to_string()),
        ("Last played", opt(g.last_played)),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "{:<12}{}", label, value);
    }
    for (source, value) in &detail.metadata {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        };
        let _ = writeln!(out, "\n[{}]\n{}", source, rendered);
    }
    out
}
