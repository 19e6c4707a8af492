use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::TierScoreError;

/// A role a member can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Jungle,
    Mid,
    Bottom,
    Support,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Jungle => "jungle",
            Position::Mid => "mid",
            Position::Bottom => "bottom",
            Position::Support => "support",
        }
    }
}

impl FromStr for Position {
    type Err = TierScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Position::Top),
            "jungle" | "jg" => Ok(Position::Jungle),
            "mid" | "middle" => Ok(Position::Mid),
            "bottom" | "bot" | "adc" => Ok(Position::Bottom),
            "support" | "sup" => Ok(Position::Support),
            _ => Err(TierScoreError::InvalidPosition(s.to_string())),
        }
    }
}

/// Aggregated match counters for one member.
///
/// Counters are signed so malformed upstream data (negative values, wins
/// above games) can be carried through and clamped by the scorer instead of
/// being rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceStats {
    pub total_wins: i64,
    pub total_losses: i64,
    pub main_games: i64,
    pub main_wins: i64,
    pub sub_games: i64,
    pub sub_wins: i64,
    /// Distinct secondary positions the member declared.
    pub sub_position_count: u32,
}

impl PerformanceStats {
    pub fn total_games(&self) -> i64 {
        self.total_wins.saturating_add(self.total_losses)
    }

    /// True when every counter satisfies wins <= games and nothing is negative.
    pub fn is_well_formed(&self) -> bool {
        let non_negative = [
            self.total_wins,
            self.total_losses,
            self.main_games,
            self.main_wins,
            self.sub_games,
            self.sub_wins,
        ]
        .iter()
        .all(|c| *c >= 0);

        non_negative && self.main_wins <= self.main_games && self.sub_wins <= self.sub_games
    }
}
