use serde::{Deserialize, Serialize};

use super::{PerformanceStats, Position, Rank};

/// A roster member as the store hands it to the recomputation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub name: String,
    pub rank: Rank,
    /// Last persisted tier score. Missing scores count as 0.
    #[serde(default)]
    pub tier_score: Option<i64>,
    #[serde(default)]
    pub main_position: Option<Position>,
    #[serde(default)]
    pub sub_positions: Vec<Position>,
    #[serde(default)]
    pub total_wins: i64,
    #[serde(default)]
    pub total_losses: i64,
    #[serde(default)]
    pub main_games: i64,
    #[serde(default)]
    pub main_wins: i64,
    #[serde(default)]
    pub sub_games: i64,
    #[serde(default)]
    pub sub_wins: i64,
}

impl MemberRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rank: Rank) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank,
            tier_score: None,
            main_position: None,
            sub_positions: Vec::new(),
            total_wins: 0,
            total_losses: 0,
            main_games: 0,
            main_wins: 0,
            sub_games: 0,
            sub_wins: 0,
        }
    }

    pub fn stored_score(&self) -> i64 {
        self.tier_score.unwrap_or(0)
    }

    /// Secondary positions with duplicates and the main position removed.
    pub fn distinct_sub_positions(&self) -> Vec<Position> {
        let mut distinct: Vec<Position> = Vec::new();
        for position in &self.sub_positions {
            if Some(*position) != self.main_position && !distinct.contains(position) {
                distinct.push(*position);
            }
        }
        distinct
    }

    pub fn stats(&self) -> PerformanceStats {
        PerformanceStats {
            total_wins: self.total_wins,
            total_losses: self.total_losses,
            main_games: self.main_games,
            main_wins: self.main_wins,
            sub_games: self.sub_games,
            sub_wins: self.sub_wins,
            sub_position_count: self.distinct_sub_positions().len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_sub_positions_ignores_main_and_duplicates() {
        let mut member = MemberRecord::new("m1", "Ahri", Rank::GoldIII);
        member.main_position = Some(Position::Mid);
        member.sub_positions = vec![Position::Mid, Position::Top, Position::Top, Position::Support];

        assert_eq!(member.distinct_sub_positions(), vec![Position::Top, Position::Support]);
        assert_eq!(member.stats().sub_position_count, 2);
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let member = MemberRecord::new("m1", "Ahri", Rank::GoldIII);
        assert_eq!(member.stored_score(), 0);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let member: MemberRecord = serde_json::from_str(
            r#"{"id": "42", "name": "Garen", "rank": "Silver II", "sub_positions": ["top", "jungle"]}"#,
        )
        .unwrap();
        assert_eq!(member.rank, Rank::SilverII);
        assert_eq!(member.tier_score, None);
        assert_eq!(member.stats().sub_position_count, 2);
    }
}
