use serde::{Deserialize, Serialize};

use crate::models::{DIVISIONED_RANK_COUNT, RANK_COUNT};

/// Constants shared by the rank ladder and the tier score function.
///
/// Both components take this struct at construction time so the
/// rank-dominates-performance bound can be checked once, in [`validate`].
///
/// [`validate`]: ScoringConfig::validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base value step between adjacent divisioned ranks.
    pub division_step: i64,
    /// Extra distance from the top divisioned rank to master.
    pub apex_gap: i64,
    /// Base value step between apex ranks.
    pub apex_step: i64,
    /// Multiplier applied to the weighted win-rate deviation.
    pub adjustment_scale: f64,
    /// Win rate assumed when a denominator is zero.
    pub neutral_win_rate: f64,
    pub main_weight: f64,
    pub sub_weight_max: f64,
    pub sub_weight_min: f64,
    /// Weight lost for each secondary position declared beyond the first.
    pub sub_weight_decay: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            division_step: 100,
            apex_gap: 500,
            apex_step: 500,
            adjustment_scale: 50.0,
            neutral_win_rate: 0.5,
            main_weight: 1.0,
            sub_weight_max: 0.8,
            sub_weight_min: 0.5,
            sub_weight_decay: 0.1,
        }
    }
}

impl ScoringConfig {
    /// Weight of secondary-position performance for `sub_positions` declared
    /// secondary positions: `max_weight - decay * (n - 1)`, kept within
    /// `[sub_weight_min, sub_weight_max]`.
    pub fn sub_weight(&self, sub_positions: u32) -> f64 {
        let extra = f64::from(sub_positions) - 1.0;
        // max/min rather than clamp: an unvalidated config with inverted
        // bounds must not panic here.
        (self.sub_weight_max - self.sub_weight_decay * extra)
            .min(self.sub_weight_max)
            .max(self.sub_weight_min)
    }

    /// Largest possible |weighted deviation| before scaling. Each win rate
    /// sits in [0, 1], so its deviation from neutral is bounded by the
    /// farther end of that interval.
    pub fn max_adjustment_magnitude(&self) -> f64 {
        let deviation = self.neutral_win_rate.max(1.0 - self.neutral_win_rate);
        deviation * (self.main_weight + self.sub_weight_max)
    }

    /// Largest possible |performance adjustment| in score points.
    pub fn max_adjustment(&self) -> f64 {
        self.adjustment_scale * self.max_adjustment_magnitude()
    }

    /// Smallest distance between the base values of two adjacent ranks.
    pub fn min_rank_step(&self) -> i64 {
        self.division_step.min(self.apex_gap).min(self.apex_step)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.division_step <= 0 || self.apex_gap <= 0 || self.apex_step <= 0 {
            return Err("Ladder steps must be positive".to_string());
        }

        if self.top_base_value().is_none() {
            return Err(format!(
                "Ladder steps overflow the score range: division {}, apex gap {}, apex step {}",
                self.division_step, self.apex_gap, self.apex_step
            ));
        }

        let fields = [
            ("adjustment_scale", self.adjustment_scale),
            ("neutral_win_rate", self.neutral_win_rate),
            ("main_weight", self.main_weight),
            ("sub_weight_max", self.sub_weight_max),
            ("sub_weight_min", self.sub_weight_min),
            ("sub_weight_decay", self.sub_weight_decay),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{} must be a finite number, got {}", name, value));
        }

        if !(0.0..=1.0).contains(&self.neutral_win_rate) {
            return Err(format!("Neutral win rate must be within [0, 1], got {}", self.neutral_win_rate));
        }

        if self.adjustment_scale < 0.0 || self.main_weight < 0.0 || self.sub_weight_decay < 0.0 {
            return Err("Adjustment scale, main weight and decay must be non-negative".to_string());
        }

        if self.sub_weight_min < 0.0 || self.sub_weight_min > self.sub_weight_max {
            return Err(format!(
                "Secondary weight bounds are inverted: min {} > max {}",
                self.sub_weight_min, self.sub_weight_max
            ));
        }

        // The best record one rank down must stay below the worst record one
        // rank up, so twice the largest adjustment has to fit in every step.
        let max_adjustment = self.max_adjustment();
        if !(2.0 * max_adjustment < self.min_rank_step() as f64) {
            return Err(format!(
                "Adjustment range ±{:.2} does not fit inside the smallest rank step {}",
                max_adjustment,
                self.min_rank_step()
            ));
        }

        Ok(())
    }

    /// Base value of the highest apex rank, or `None` if the steps do not
    /// fit in an `i64` with room left for the adjustment.
    fn top_base_value(&self) -> Option<i64> {
        let divisioned = (DIVISIONED_RANK_COUNT as i64 - 1).checked_mul(self.division_step)?;
        let apex = ((RANK_COUNT - DIVISIONED_RANK_COUNT) as i64 - 1).checked_mul(self.apex_step)?;
        let top = divisioned.checked_add(self.apex_gap)?.checked_add(apex)?;
        // Scores are rounded from f64 and written back as i64.
        (top < MAX_BASE_VALUE).then_some(top)
    }
}

/// Largest base value the ladder may produce. Well inside the range where
/// f64 still represents every integer exactly.
const MAX_BASE_VALUE: i64 = 1 << 52;
