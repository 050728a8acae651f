//! Per-game player state.
//!
//! `PlayerGameSim` is a player as the engine sees them for one game:
//! identity, composite ratings, skill tags, and the mutable per-game state
//! (energy, injury, fouls, box score). It is owned by its team for the
//! duration of the game and dropped when the result is returned.

use serde::{Deserialize, Serialize};

use super::ratings::{CompositeRating, CompositeRatings, RatingView, Skill, SkillSet};
use crate::core::FatigueConfig;
use crate::error::{Result, SimError};
use crate::stats::StatLine;

/// Stable player identifier, unique within a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for PlayerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

/// Floor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Guard,
    Forward,
    Center,
}

impl Position {
    /// Every position.
    pub const ALL: [Position; 3] = [Position::Guard, Position::Forward, Position::Center];

    /// One-letter label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Position::Guard => "G",
            Position::Forward => "F",
            Position::Center => "C",
        }
    }
}

/// A player's state for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameSim {
    /// Stable identity.
    pub id: PlayerId,
    pub name: String,
    pub position: Position,

    /// Overall rating; ranks players for substitutions.
    pub ovr: f64,

    /// Composite ratings in `[0, 1]`.
    pub ratings: CompositeRatings,

    /// Skill tags.
    pub skills: SkillSet,

    /// Playing-time modifier (1.0 = normal, 0.0 = only when required).
    pub pt_modifier: f64,

    energy: f64,
    injured: bool,
    fouled_out: bool,
    stats: StatLine,
}

impl PlayerGameSim {
    /// Create a fully rested, healthy player with average ratings.
    pub fn new(id: PlayerId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            ovr: 50.0,
            ratings: CompositeRatings::uniform(0.5),
            skills: SkillSet::new(),
            pt_modifier: 1.0,
            energy: 1.0,
            injured: false,
            fouled_out: false,
            stats: StatLine::new(),
        }
    }

    /// Set the overall rating (builder pattern).
    #[must_use]
    pub fn with_ovr(mut self, ovr: f64) -> Self {
        self.ovr = ovr;
        self
    }

    /// Set the composite ratings (builder pattern).
    #[must_use]
    pub fn with_ratings(mut self, ratings: CompositeRatings) -> Self {
        self.ratings = ratings;
        self
    }

    /// Set the skill tags (builder pattern).
    #[must_use]
    pub fn with_skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }

    /// Set the playing-time modifier (builder pattern).
    #[must_use]
    pub fn with_pt_modifier(mut self, modifier: f64) -> Self {
        self.pt_modifier = modifier.max(0.0);
        self
    }

    /// Mark the player as injured before the game (builder pattern).
    #[must_use]
    pub fn with_injury(mut self) -> Self {
        self.injured = true;
        self
    }

    // === Condition ===

    /// Change energy by `delta`, clamping to `[0, 1]`.
    ///
    /// A non-finite result cannot be clamped and is reported.
    pub fn adjust_energy(&mut self, delta: f64) -> Result<()> {
        let next = self.energy + delta;
        if !next.is_finite() {
            return Err(SimError::Invariant(format!(
                "energy of {} became {next}",
                self.id
            )));
        }
        self.energy = next.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_injured(&mut self, injured: bool) {
        self.injured = injured;
    }

    #[must_use]
    pub fn is_fouled_out(&self) -> bool {
        self.fouled_out
    }

    pub(crate) fn set_fouled_out(&mut self) {
        self.fouled_out = true;
    }

    /// Healthy and not disqualified.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.injured && !self.fouled_out
    }

    /// Value used to rank players for a spot on the floor.
    #[must_use]
    pub fn substitution_value(&self, fatigue: &FatigueConfig) -> f64 {
        self.ovr * self.pt_modifier * fatigue.factor(self.energy)
    }

    // === Stats ===

    #[must_use]
    pub fn stats(&self) -> &StatLine {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut StatLine {
        &mut self.stats
    }
}

impl RatingView for PlayerGameSim {
    fn rating(&self, rating: CompositeRating) -> f64 {
        self.ratings[rating]
    }

    fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(skill)
    }

    fn energy(&self) -> f64 {
        self.energy
    }

    fn is_injured(&self) -> bool {
        self.injured
    }
}
