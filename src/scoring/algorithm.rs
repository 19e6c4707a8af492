use serde::Serialize;

use crate::models::{PerformanceStats, Rank};
use super::{RankLadder, ScoringConfig};

/// Intermediate values behind a tier score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub rank: Rank,
    pub base_value: i64,
    pub overall_win_rate: f64,
    pub main_win_rate: f64,
    pub sub_win_rate: f64,
    pub sub_weight: f64,
    pub performance_adjustment: f64,
    pub tier_score: i64,
}

/// Pure `(rank, stats) -> score` function. Holds no mutable state and can be
/// shared across tasks freely.
#[derive(Debug, Clone)]
pub struct TierScoreCalculator {
    ladder: RankLadder,
    config: ScoringConfig,
}

impl TierScoreCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            ladder: RankLadder::new(&config),
            config,
        }
    }

    pub fn ladder(&self) -> &RankLadder {
        &self.ladder
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn calculate_tier_score(&self, rank: Rank, stats: &PerformanceStats) -> i64 {
        self.breakdown(rank, stats).tier_score
    }

    pub fn breakdown(&self, rank: Rank, stats: &PerformanceStats) -> ScoreBreakdown {
        let base_value = self.ladder.base_value(rank);

        let overall_win_rate = self.win_rate(stats.total_wins, stats.total_games());
        let main_win_rate = self.win_rate(stats.main_wins, stats.main_games);
        let sub_win_rate = self.win_rate(stats.sub_wins, stats.sub_games);
        let sub_weight = self.config.sub_weight(stats.sub_position_count);

        let performance_adjustment = self.performance_adjustment(main_win_rate, sub_win_rate, sub_weight);
        let tier_score = (base_value as f64 + performance_adjustment).round() as i64;

        ScoreBreakdown {
            rank,
            base_value,
            overall_win_rate,
            main_win_rate,
            sub_win_rate,
            sub_weight,
            performance_adjustment,
            tier_score,
        }
    }

    /// Neutral when there are no games, otherwise `wins / games` kept in [0, 1].
    fn win_rate(&self, wins: i64, games: i64) -> f64 {
        if games <= 0 {
            return self.config.neutral_win_rate;
        }
        let wins = wins.clamp(0, games);
        wins as f64 / games as f64
    }

    fn performance_adjustment(&self, main_win_rate: f64, sub_win_rate: f64, sub_weight: f64) -> f64 {
        let neutral = self.config.neutral_win_rate;
        let main_term = (main_win_rate - neutral) * self.config.main_weight;
        let sub_term = (sub_win_rate - neutral) * sub_weight;

        self.config.adjustment_scale * (main_term + sub_term)
    }
}

impl Default for TierScoreCalculator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(main: (i64, i64), sub: (i64, i64), sub_positions: u32) -> PerformanceStats {
        PerformanceStats {
            total_wins: main.0 + sub.0,
            total_losses: (main.1 - main.0) + (sub.1 - sub.0),
            main_wins: main.0,
            main_games: main.1,
            sub_wins: sub.0,
            sub_games: sub.1,
            sub_position_count: sub_positions,
        }
    }

    #[test]
    fn test_zero_games_is_neutral() {
        let calc = TierScoreCalculator::default();
        for rank in Rank::ALL {
            let score = calc.calculate_tier_score(rank, &PerformanceStats::default());
            assert_eq!(score, calc.ladder().base_value(rank));
        }
    }

    #[test]
    fn test_gold_iii_scenario() {
        let calc = TierScoreCalculator::default();
        let stats = PerformanceStats {
            total_wins: 50,
            total_losses: 50,
            main_games: 30,
            main_wins: 15,
            sub_games: 20,
            sub_wins: 8,
            sub_position_count: 1,
        };
        let b = calc.breakdown(Rank::GoldIII, &stats);

        assert!((b.overall_win_rate - 0.5).abs() < 1e-9);
        assert!((b.main_win_rate - 0.5).abs() < 1e-9);
        assert!((b.sub_win_rate - 0.4).abs() < 1e-9);
        assert!((b.sub_weight - 0.8).abs() < 1e-9);
        assert!((b.performance_adjustment - 50.0 * -0.08).abs() < 1e-9);
        assert_eq!(b.base_value, 1300);
        assert_eq!(b.tier_score, 1296);
    }

    #[test]
    fn test_zero_sub_games_drops_sub_term() {
        let calc = TierScoreCalculator::default();
        for sub_positions in 0..5 {
            let b = calc.breakdown(Rank::SilverII, &stats((7, 10), (0, 0), sub_positions));
            assert!((b.performance_adjustment - 50.0 * 0.2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_perfect_and_winless_records_hit_the_bounds() {
        let calc = TierScoreCalculator::default();
        let base = calc.ladder().base_value(Rank::PlatinumI);

        let perfect = calc.calculate_tier_score(Rank::PlatinumI, &stats((40, 40), (20, 20), 1));
        let winless = calc.calculate_tier_score(Rank::PlatinumI, &stats((0, 40), (0, 20), 1));

        assert_eq!(perfect, base + 45);
        assert_eq!(winless, base - 45);
        assert!(perfect < calc.ladder().base_value(Rank::EmeraldIV) - 45);
        assert!(winless > calc.ladder().base_value(Rank::PlatinumII) + 45);
    }

    #[test]
    fn test_more_sub_positions_weigh_less() {
        let calc = TierScoreCalculator::default();
        let one = calc.calculate_tier_score(Rank::GoldI, &stats((5, 10), (10, 10), 1));
        let four = calc.calculate_tier_score(Rank::GoldI, &stats((5, 10), (10, 10), 4));
        assert_eq!(one, 1500 + 20);
        assert_eq!(four, 1500 + 13);
    }

    #[test]
    fn test_challenger_without_games() {
        let calc = TierScoreCalculator::default();
        assert_eq!(calc.calculate_tier_score(Rank::Challenger, &PerformanceStats::default()), 4200);
    }

    #[test]
    fn test_diamond_i_spread_stays_below_master() {
        let calc = TierScoreCalculator::default();
        let strong = stats((45, 50), (18, 20), 1);
        let weak = stats((5, 50), (2, 20), 1);
        assert!((strong.total_wins as f64 / strong.total_games() as f64 - 0.9).abs() < 1e-9);
        assert!((weak.total_wins as f64 / weak.total_games() as f64 - 0.1).abs() < 1e-9);

        let high = calc.calculate_tier_score(Rank::DiamondI, &strong);
        let low = calc.calculate_tier_score(Rank::DiamondI, &weak);

        assert!(high > low);
        assert!((high - low) as f64 <= 2.0 * calc.config().adjustment_scale);
        assert!(high < calc.ladder().base_value(Rank::Master));
    }

    #[test]
    fn test_malformed_counters_are_clamped() {
        let calc = TierScoreCalculator::default();
        let base = calc.ladder().base_value(Rank::BronzeII);

        // wins above games behaves like a perfect record
        let inflated = PerformanceStats {
            total_wins: 30,
            total_losses: -10,
            main_games: 10,
            main_wins: 25,
            sub_games: 5,
            sub_wins: 9,
            sub_position_count: 1,
        };
        assert_eq!(calc.calculate_tier_score(Rank::BronzeII, &inflated), base + 45);

        // negative games count as no games
        let negative = PerformanceStats {
            total_wins: -3,
            total_losses: -3,
            main_games: -10,
            main_wins: -1,
            sub_games: -2,
            sub_wins: 4,
            sub_position_count: 3,
        };
        assert_eq!(calc.calculate_tier_score(Rank::BronzeII, &negative), base);

        // negative wins with real games count as zero wins
        let negative_wins = PerformanceStats {
            main_games: 10,
            main_wins: -5,
            ..PerformanceStats::default()
        };
        assert_eq!(calc.calculate_tier_score(Rank::BronzeII, &negative_wins), base - 25);
    }

    #[test]
    fn test_extreme_counters_do_not_overflow() {
        let calc = TierScoreCalculator::default();
        let stats = PerformanceStats {
            total_wins: i64::MAX,
            total_losses: i64::MAX,
            main_games: i64::MAX,
            main_wins: i64::MAX,
            sub_games: i64::MAX,
            sub_wins: i64::MIN,
            sub_position_count: u32::MAX,
        };
        let score = calc.calculate_tier_score(Rank::Master, &stats);
        assert!((score - 3200).abs() < 100);
    }
}
