//! `eurogames add-result` subcommand for recording a play

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::types::{NewPlayRecord, DRAW, PLAYERS};

/// Record the outcome of a play
#[derive(Args, Debug)]
pub struct AddResultArgs {
    /// Play date as YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Game ID
    #[arg(long)]
    pub game: u64,

    /// Winning player, or "Draw"
    #[arg(long, value_parser = parse_winner)]
    pub winner: String,

    /// Free-form score line (e.g., "112-98")
    #[arg(long)]
    pub scores: Option<String>,

    /// Comment about the play
    #[arg(long)]
    pub comment: Option<String>,

    /// Output the service response as JSON
    #[arg(long)]
    pub json: bool,
}

impl AddResultArgs {
    pub fn to_record(&self) -> NewPlayRecord {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        NewPlayRecord::new(date, self.game, self.winner.clone())
            .with_scores(self.scores.clone())
            .with_comment(self.comment.clone())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

/// Accepts a known player or "Draw" in any case and returns its canonical spelling
fn parse_winner(value: &str) -> Result<String, String> {
    let value = value.trim();
    PLAYERS
        .iter()
        .chain(std::iter::once(&DRAW))
        .find(|name| name.eq_ignore_ascii_case(value))
        .map(|name| name.to_string())
        .ok_or_else(|| {
            format!(
                "unknown winner '{}', expected one of: {}, {}",
                value,
                PLAYERS.join(", "),
                DRAW
            )
        })
}
