//! Win statistics records

use serde::Serialize;
use std::collections::BTreeMap;

/// The two players this play log tracks
pub const PLAYERS: [&str; 2] = ["Andrew", "Trish"];

/// Winner value recorded when nobody won
pub const DRAW: &str = "Draw";

/// Per-game win counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WinnerStat {
    pub game_id: Option<u64>,
    pub game_name: String,
    pub total_games: u64,
    pub wins_by_player: BTreeMap<String, u64>,
    pub draws: u64,
}

impl WinnerStat {
    pub fn wins(&self, player: &str) -> u64 {
        self.wins_by_player.get(player).copied().unwrap_or(0)
    }

    /// Whether `total_games == wins + draws`. Expected, never enforced.
    pub fn is_consistent(&self) -> bool {
        is_consistent(self.total_games, &self.wins_by_player, self.draws)
    }
}

/// Totals across all games. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_games: u64,
    pub wins_by_player: BTreeMap<String, u64>,
    pub draws: u64,
}

impl Totals {
    pub fn wins(&self, player: &str) -> u64 {
        self.wins_by_player.get(player).copied().unwrap_or(0)
    }

    pub fn is_consistent(&self) -> bool {
        is_consistent(self.total_games, &self.wins_by_player, self.draws)
    }
}

fn is_consistent(total: u64, wins: &BTreeMap<String, u64>, draws: u64) -> bool {
    let decided = wins.values().fold(0u64, |acc, w| acc.saturating_add(*w));
    decided.saturating_add(draws) == total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(total: u64, andrew: u64, trish: u64, draws: u64) -> WinnerStat {
        WinnerStat {
            game_id: Some(1),
            game_name: "Agricola".into(),
            total_games: total,
            wins_by_player: BTreeMap::from([("Andrew".into(), andrew), ("Trish".into(), trish)]),
            draws,
        }
    }

    #[test]
    fn test_wins_lookup() {
        let s = stat(4, 3, 1, 0);
        assert_eq!(s.wins("Andrew"), 3);
        assert_eq!(s.wins("Nobody"), 0);
    }

    #[test]
    fn test_consistency_is_reported_not_enforced() {
        assert!(stat(10, 6, 3, 1).is_consistent());
        let odd = stat(10, 6, 3, 0);
        assert!(!odd.is_consistent());
        assert_eq!(odd.total_games, 10);
    }

    #[test]
    fn test_default_totals_consistent() {
        assert!(Totals::default().is_consistent());
    }
}
