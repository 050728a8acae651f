//! Game configuration types.
//!
//! A game is configured once, up front, by an immutable `GameConfig`:
//! - Period structure: count, length, overtime rules
//! - `LineupSlot`s: how many players of each position are on the floor
//! - `FatigueConfig`: energy drain/recovery and substitution cadence
//! - `OutcomeThresholds`: every probability constant used to resolve plays
//!
//! The engine never reads process-wide settings; everything it needs is
//! passed in here. `GameConfig::default()` is a standard 48-minute game.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::roster::Position;

/// Floor requirement for one position.
///
/// `count` players of `position` are on the floor when available. A team
/// that cannot start `min_count` of them is a configuration error. During
/// the game the unit may play short-handed; once it would drop below
/// `min_count`, a bench player from another position fills in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupSlot {
    pub position: Position,
    pub count: usize,
    pub min_count: usize,
}

impl LineupSlot {
    /// Create a new slot.
    #[must_use]
    pub const fn new(position: Position, count: usize, min_count: usize) -> Self {
        Self {
            position,
            count,
            min_count,
        }
    }
}

/// Energy and substitution tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FatigueConfig {
    /// Energy lost per minute on the floor, scaled by `1 - endurance`.
    pub drain_per_minute: f64,

    /// Energy regained per minute on the bench.
    pub recovery_per_minute: f64,

    /// Added to energy before it scales a rating: `min(1, energy + bonus)`.
    pub fatigue_bonus: f64,

    /// Minutes a position unit plays before it is re-evaluated.
    pub sub_interval: f64,

    /// A bench player must beat the active player's value by this factor
    /// (at least 1).
    pub sub_margin: f64,
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            drain_per_minute: 0.06,
            recovery_per_minute: 0.1,
            fatigue_bonus: 0.05,
            sub_interval: 2.0,
            sub_margin: 1.0,
        }
    }
}

impl FatigueConfig {
    /// Fatigue multiplier for an energy level.
    ///
    /// ```
    /// use courtsim::core::FatigueConfig;
    ///
    /// let fatigue = FatigueConfig::default();
    /// assert_eq!(fatigue.factor(1.0), 1.0);
    /// assert!((fatigue.factor(0.5) - 0.55).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn factor(&self, energy: f64) -> f64 {
        (energy + self.fatigue_bonus).min(1.0)
    }
}

/// Probability constants used when resolving a possession.
///
/// All values are named so a caller can retune them; none of them are
/// baked into the play logic as literals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeThresholds {
    /// Turnover chance for an average offense against an average defense.
    pub turnover_base: f64,
    pub turnover_min: f64,
    pub turnover_max: f64,

    /// Share of turnovers that are credited as steals (average defense).
    pub steal_share: f64,

    /// Chance of a non-shooting foul on a possession.
    pub foul_base: f64,

    /// Chance a shot attempt draws a shooting foul (before shot-type scaling).
    pub shooting_foul_base: f64,

    /// Base shot selection mix.
    pub mix_at_rim: f64,
    pub mix_low_post: f64,
    pub mix_mid_range: f64,
    pub mix_three: f64,

    /// Make probability for an average shooter against an average defense.
    pub make_at_rim: f64,
    pub make_low_post: f64,
    pub make_mid_range: f64,
    pub make_three: f64,

    /// How much shooter skill moves the make probability.
    pub make_rating_spread: f64,

    /// How much defender skill moves the make probability.
    pub make_defense_spread: f64,

    /// Make probability multiplier when the shooter is fouled.
    pub fouled_make_factor: f64,

    /// Block chance at the rim (other shot types are scaled down).
    pub block_base: f64,

    /// Block chance multiplier per shot type.
    pub block_scale_at_rim: f64,
    pub block_scale_low_post: f64,
    pub block_scale_mid_range: f64,
    pub block_scale_three: f64,

    /// Weight of the defense's blocking rating on block chance.
    pub block_rating_weight: f64,

    /// Shooting foul chance multiplier per shot type.
    pub shooting_foul_scale_at_rim: f64,
    pub shooting_foul_scale_low_post: f64,
    pub shooting_foul_scale_mid_range: f64,
    pub shooting_foul_scale_three: f64,

    /// Chance a made field goal is assisted.
    pub assist_base: f64,

    /// Offensive rebound chance when both teams rebound equally well.
    pub offensive_rebound_base: f64,

    /// How strongly the rebounding edge moves the offensive rebound chance.
    pub offensive_rebound_weight: f64,

    /// Free throw make chance is `ft_base + ft_rating_spread * rating`.
    pub ft_base: f64,
    pub ft_rating_spread: f64,

    /// Weight of lineup synergy on make and turnover probabilities.
    pub synergy_factor: f64,

    /// Power applied when picking a shooter by usage.
    pub usage_power: f64,

    /// Minimum selection weight as a share of the total weight.
    pub selection_floor: f64,
}

impl Default for OutcomeThresholds {
    fn default() -> Self {
        Self {
            turnover_base: 0.13,
            turnover_min: 0.02,
            turnover_max: 0.35,
            steal_share: 0.55,
            foul_base: 0.07,
            shooting_foul_base: 0.1,
            mix_at_rim: 0.3,
            mix_low_post: 0.12,
            mix_mid_range: 0.22,
            mix_three: 0.36,
            make_at_rim: 0.62,
            make_low_post: 0.46,
            make_mid_range: 0.4,
            make_three: 0.35,
            make_rating_spread: 0.35,
            make_defense_spread: 0.2,
            fouled_make_factor: 0.35,
            block_base: 0.07,
            block_scale_at_rim: 1.0,
            block_scale_low_post: 0.7,
            block_scale_mid_range: 0.35,
            block_scale_three: 0.15,
            block_rating_weight: 2.0,
            shooting_foul_scale_at_rim: 1.2,
            shooting_foul_scale_low_post: 1.0,
            shooting_foul_scale_mid_range: 0.6,
            shooting_foul_scale_three: 0.3,
            assist_base: 0.58,
            offensive_rebound_base: 0.26,
            offensive_rebound_weight: 2.0,
            ft_base: 0.45,
            ft_rating_spread: 0.45,
            synergy_factor: 0.04,
            usage_power: 1.25,
            selection_floor: 0.05,
        }
    }
}

/// Complete configuration for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of regulation periods.
    pub num_periods: u8,

    /// Length of a regulation period in minutes.
    pub period_length: f64,

    /// Overtime length as a fraction of `period_length`.
    pub overtime_fraction: f64,

    /// Minimum overtime length in minutes.
    pub overtime_floor: f64,

    /// Allow a tied final: one overtime is played and the game may end tied.
    pub allow_ties: bool,

    /// Cap on the number of overtimes (`None` = play until decided).
    pub max_overtimes: Option<u32>,

    /// Players on the floor per position.
    pub lineup: Vec<LineupSlot>,

    /// Personal fouls before a player is disqualified (`None` = never).
    pub foul_limit: Option<u8>,

    /// Team fouls in a period after which non-shooting fouls award free throws.
    pub bonus_threshold: u8,

    /// Whether players can get hurt during the game.
    pub injuries: bool,

    /// Injury chance per on-floor player per possession.
    pub injury_rate: f64,

    /// Average possession length in minutes at neutral pace.
    pub possession_length: f64,

    /// Relative random spread of possession length.
    pub possession_spread: f64,

    /// A game-winning play inside this many minutes of the final period
    /// (or any overtime) is flagged as clutch.
    pub clutch_window: f64,

    pub fatigue: FatigueConfig,
    pub thresholds: OutcomeThresholds,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_periods: 4,
            period_length: 12.0,
            overtime_fraction: 5.0 / 12.0,
            overtime_floor: 1.0,
            allow_ties: false,
            max_overtimes: None,
            lineup: vec![
                LineupSlot::new(Position::Guard, 2, 1),
                LineupSlot::new(Position::Forward, 2, 1),
                LineupSlot::new(Position::Center, 1, 1),
            ],
            foul_limit: Some(6),
            bonus_threshold: 5,
            injuries: true,
            injury_rate: 0.25 / 1000.0,
            possession_length: 0.24,
            possession_spread: 0.3,
            clutch_window: 1.0,
            fatigue: FatigueConfig::default(),
            thresholds: OutcomeThresholds::default(),
        }
    }
}

impl GameConfig {
    /// Set the number of regulation periods.
    #[must_use]
    pub fn with_num_periods(mut self, periods: u8) -> Self {
        self.num_periods = periods;
        self
    }

    /// Set the regulation period length in minutes.
    #[must_use]
    pub fn with_period_length(mut self, minutes: f64) -> Self {
        self.period_length = minutes;
        self
    }

    /// Allow the game to end tied after a single overtime.
    #[must_use]
    pub fn with_ties_allowed(mut self, allow: bool) -> Self {
        self.allow_ties = allow;
        self
    }

    /// Cap the number of overtimes.
    #[must_use]
    pub fn with_max_overtimes(mut self, max: Option<u32>) -> Self {
        self.max_overtimes = max;
        self
    }

    /// Enable or disable in-game injuries.
    #[must_use]
    pub fn with_injuries(mut self, enabled: bool) -> Self {
        self.injuries = enabled;
        self
    }

    /// Set the injury chance per on-floor player per possession.
    #[must_use]
    pub fn with_injury_rate(mut self, rate: f64) -> Self {
        self.injury_rate = rate;
        self
    }

    /// Set the personal foul limit.
    #[must_use]
    pub fn with_foul_limit(mut self, limit: Option<u8>) -> Self {
        self.foul_limit = limit;
        self
    }

    /// Replace the lineup slots.
    #[must_use]
    pub fn with_lineup(mut self, lineup: Vec<LineupSlot>) -> Self {
        self.lineup = lineup;
        self
    }

    /// Replace the fatigue tunables.
    #[must_use]
    pub fn with_fatigue(mut self, fatigue: FatigueConfig) -> Self {
        self.fatigue = fatigue;
        self
    }

    /// Replace the outcome thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: OutcomeThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Overtime length in minutes.
    #[must_use]
    pub fn overtime_length(&self) -> f64 {
        (self.period_length * self.overtime_fraction).max(self.overtime_floor)
    }

    /// Players on the floor per team when nobody is missing.
    #[must_use]
    pub fn players_on_floor(&self) -> usize {
        self.lineup.iter().map(|slot| slot.count).sum()
    }

    /// Check that the configuration can drive a game.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must be positive, got {value}")))
            }
        }

        fn probability(name: &str, value: f64) -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must be in [0, 1], got {value}")))
            }
        }

        if self.num_periods == 0 {
            return Err(SimError::InvalidConfig("num_periods must be at least 1".into()));
        }
        positive("period_length", self.period_length)?;
        positive("overtime_length", self.overtime_length())?;
        positive("possession_length", self.possession_length)?;
        probability("possession_spread", self.possession_spread)?;
        probability("injury_rate", self.injury_rate)?;
        positive("fatigue.sub_interval", self.fatigue.sub_interval)?;
        if !(self.fatigue.sub_margin >= 1.0 && self.fatigue.sub_margin.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "fatigue.sub_margin must be at least 1, got {}",
                self.fatigue.sub_margin
            )));
        }
        probability("thresholds.selection_floor", self.thresholds.selection_floor)?;
        probability("thresholds.turnover_min", self.thresholds.turnover_min)?;
        probability("thresholds.turnover_max", self.thresholds.turnover_max)?;
        if self.thresholds.turnover_min > self.thresholds.turnover_max {
            return Err(SimError::InvalidConfig(
                "thresholds.turnover_min is above thresholds.turnover_max".into(),
            ));
        }

        let t = &self.thresholds;
        let mix = [t.mix_at_rim, t.mix_low_post, t.mix_mid_range, t.mix_three];
        if mix.iter().any(|w| !(w.is_finite() && *w >= 0.0)) || mix.iter().sum::<f64>() <= 0.0 {
            return Err(SimError::InvalidConfig(
                "thresholds.mix_* must be non-negative with at least one above zero".into(),
            ));
        }

        if self.lineup.is_empty() {
            return Err(SimError::InvalidConfig("lineup has no slots".into()));
        }
        for (i, slot) in self.lineup.iter().enumerate() {
            if slot.count == 0 || slot.min_count > slot.count {
                return Err(SimError::InvalidConfig(format!(
                    "lineup slot {:?} needs 0 < min_count <= count",
                    slot.position
                )));
            }
            if self.lineup[..i].iter().any(|s| s.position == slot.position) {
                return Err(SimError::InvalidConfig(format!(
                    "position {:?} appears twice in lineup",
                    slot.position
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.num_periods, 4);
        assert_eq!(config.period_length, 12.0);
        assert_eq!(config.players_on_floor(), 5);
        assert!((config.overtime_length() - 5.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overtime_floor() {
        let config = GameConfig::default().with_period_length(1.2);
        assert_eq!(config.overtime_length(), 1.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default()
            .with_num_periods(2)
            .with_period_length(20.0)
            .with_ties_allowed(true)
            .with_max_overtimes(Some(3))
            .with_injuries(false);

        assert_eq!(config.num_periods, 2);
        assert_eq!(config.period_length, 20.0);
        assert!(config.allow_ties);
        assert_eq!(config.max_overtimes, Some(3));
        assert!(!config.injuries);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GameConfig::default().with_num_periods(0).validate().is_err());
        assert!(GameConfig::default().with_period_length(0.0).validate().is_err());
        assert!(GameConfig::default().with_period_length(f64::NAN).validate().is_err());
        assert!(GameConfig::default().with_injury_rate(2.0).validate().is_err());
        assert!(GameConfig::default().with_lineup(vec![]).validate().is_err());
        assert!(GameConfig::default()
            .with_lineup(vec![LineupSlot::new(Position::Guard, 1, 2)])
            .validate()
            .is_err());
        assert!(GameConfig::default()
            .with_lineup(vec![
                LineupSlot::new(Position::Guard, 2, 1),
                LineupSlot::new(Position::Guard, 1, 1),
            ])
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_empty_shot_mix() {
        let thresholds = OutcomeThresholds {
            mix_at_rim: 0.0,
            mix_low_post: 0.0,
            mix_mid_range: 0.0,
            mix_three: 0.0,
            ..OutcomeThresholds::default()
        };
        let config = GameConfig::default().with_thresholds(thresholds);
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let negative = OutcomeThresholds {
            mix_three: -0.1,
            ..OutcomeThresholds::default()
        };
        assert!(GameConfig::default().with_thresholds(negative).validate().is_err());

        let threes_only = OutcomeThresholds {
            mix_at_rim: 0.0,
            mix_low_post: 0.0,
            mix_mid_range: 0.0,
            ..OutcomeThresholds::default()
        };
        assert!(GameConfig::default().with_thresholds(threes_only).validate().is_ok());
    }

    #[test]
    fn test_fatigue_factor_caps_at_one() {
        let fatigue = FatigueConfig::default();
        assert_eq!(fatigue.factor(0.99), 1.0);
        assert!((fatigue.factor(0.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_max_overtimes(Some(2));
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
