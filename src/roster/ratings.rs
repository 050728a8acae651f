//! Composite ratings and skill tags.
//!
//! Composite ratings are derived by the caller from raw player attributes
//! and arrive here already computed, normalized to `[0, 1]`. They bias every
//! random outcome in a game. Skill tags are the coarse labels ("three point
//! shooter", "rim protector", ...) that feed lineup synergy.
//!
//! Both are keyed by closed enums, so an unknown rating name is a compile
//! error rather than a lookup that silently returns zero.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A composite rating name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeRating {
    Pace,
    Usage,
    Dribbling,
    Passing,
    Turnovers,
    ShootingAtRim,
    ShootingLowPost,
    ShootingMidRange,
    ShootingThreePointer,
    ShootingFt,
    Rebounding,
    Stealing,
    Blocking,
    Fouling,
    DrawingFouls,
    Defense,
    DefenseInterior,
    DefensePerimeter,
    Endurance,
    Athleticism,
    JumpBall,
}

impl CompositeRating {
    /// Number of composite ratings.
    pub const COUNT: usize = 21;

    /// Every composite rating, in declaration order.
    pub const ALL: [CompositeRating; Self::COUNT] = [
        CompositeRating::Pace,
        CompositeRating::Usage,
        CompositeRating::Dribbling,
        CompositeRating::Passing,
        CompositeRating::Turnovers,
        CompositeRating::ShootingAtRim,
        CompositeRating::ShootingLowPost,
        CompositeRating::ShootingMidRange,
        CompositeRating::ShootingThreePointer,
        CompositeRating::ShootingFt,
        CompositeRating::Rebounding,
        CompositeRating::Stealing,
        CompositeRating::Blocking,
        CompositeRating::Fouling,
        CompositeRating::DrawingFouls,
        CompositeRating::Defense,
        CompositeRating::DefenseInterior,
        CompositeRating::DefensePerimeter,
        CompositeRating::Endurance,
        CompositeRating::Athleticism,
        CompositeRating::JumpBall,
    ];

    /// Position of this rating in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A full set of composite ratings, one value per `CompositeRating`.
///
/// ```
/// use courtsim::roster::{CompositeRating, CompositeRatings};
///
/// let mut ratings = CompositeRatings::uniform(0.5);
/// ratings[CompositeRating::Passing] = 0.8;
///
/// assert_eq!(ratings[CompositeRating::Passing], 0.8);
/// assert_eq!(ratings[CompositeRating::Blocking], 0.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeRatings {
    values: [f64; CompositeRating::COUNT],
}

impl Default for CompositeRatings {
    fn default() -> Self {
        Self::uniform(0.0)
    }
}

impl CompositeRatings {
    /// All ratings set to the same value (clamped to `[0, 1]`).
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            values: [clamp_unit(value); CompositeRating::COUNT],
        }
    }

    /// Build from a function of the rating name (values clamped to `[0, 1]`).
    pub fn from_fn(mut f: impl FnMut(CompositeRating) -> f64) -> Self {
        let mut ratings = Self::default();
        for rating in CompositeRating::ALL {
            ratings.values[rating.index()] = clamp_unit(f(rating));
        }
        ratings
    }

    /// Get a rating value.
    #[must_use]
    pub fn get(&self, rating: CompositeRating) -> f64 {
        self.values[rating.index()]
    }

    /// Set a rating value (clamped to `[0, 1]`).
    pub fn set(&mut self, rating: CompositeRating, value: f64) {
        self.values[rating.index()] = clamp_unit(value);
    }

    /// Multiply every rating by `factor`, clamping the result to `[0, 1]`.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.values {
            *value = clamp_unit(*value * factor);
        }
    }

    /// Iterate over (rating, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CompositeRating, f64)> + '_ {
        CompositeRating::ALL
            .into_iter()
            .map(move |rating| (rating, self.values[rating.index()]))
    }
}

impl Index<CompositeRating> for CompositeRatings {
    type Output = f64;

    fn index(&self, rating: CompositeRating) -> &Self::Output {
        &self.values[rating.index()]
    }
}

impl IndexMut<CompositeRating> for CompositeRatings {
    fn index_mut(&mut self, rating: CompositeRating) -> &mut Self::Output {
        &mut self.values[rating.index()]
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A skill tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    ThreePoint,
    Athlete,
    BallHandler,
    Passer,
    PostScorer,
    PerimeterDefender,
    InteriorDefender,
    Rebounder,
}

impl Skill {
    /// Number of skill tags.
    pub const COUNT: usize = 8;

    /// Every skill tag, in declaration order.
    pub const ALL: [Skill; Self::COUNT] = [
        Skill::ThreePoint,
        Skill::Athlete,
        Skill::BallHandler,
        Skill::Passer,
        Skill::PostScorer,
        Skill::PerimeterDefender,
        Skill::InteriorDefender,
        Skill::Rebounder,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Short label used in rosters and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Skill::ThreePoint => "3",
            Skill::Athlete => "A",
            Skill::BallHandler => "B",
            Skill::Passer => "Ps",
            Skill::PostScorer => "Po",
            Skill::PerimeterDefender => "Dp",
            Skill::InteriorDefender => "Di",
            Skill::Rebounder => "R",
        }
    }
}

/// Presence set of skill tags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillSet(u16);

impl SkillSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a skill (builder pattern).
    #[must_use]
    pub fn with(mut self, skill: Skill) -> Self {
        self.insert(skill);
        self
    }

    /// Add a skill.
    pub fn insert(&mut self, skill: Skill) {
        self.0 |= skill.bit();
    }

    /// Check whether a skill is present.
    #[must_use]
    pub const fn contains(self, skill: Skill) -> bool {
        self.0 & skill.bit() != 0
    }

    /// Iterate over present skills.
    pub fn iter(self) -> impl Iterator<Item = Skill> {
        Skill::ALL.into_iter().filter(move |s| self.contains(*s))
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Skill> for SkillSet {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

/// Read-only view of a player's ratings and condition.
///
/// Everything that picks players by rating works against this trait rather
/// than a concrete player type.
pub trait RatingView {
    /// A composite rating in `[0, 1]`.
    fn rating(&self, rating: CompositeRating) -> f64;

    /// Whether the player carries a skill tag.
    fn has_skill(&self, skill: Skill) -> bool;

    /// Current energy in `[0, 1]` (1 = fully rested).
    fn energy(&self) -> f64;

    /// Whether the player is hurt.
    fn is_injured(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_indices_match_all() {
        for (i, rating) in CompositeRating::ALL.iter().enumerate() {
            assert_eq!(rating.index(), i);
        }
    }

    #[test]
    fn test_ratings_are_clamped() {
        let mut ratings = CompositeRatings::uniform(1.7);
        assert_eq!(ratings[CompositeRating::Pace], 1.0);

        ratings.set(CompositeRating::Pace, -0.2);
        assert_eq!(ratings.get(CompositeRating::Pace), 0.0);

        ratings.set(CompositeRating::Usage, f64::NAN);
        assert_eq!(ratings.get(CompositeRating::Usage), 0.0);
    }

    #[test]
    fn test_scale() {
        let mut ratings = CompositeRatings::uniform(0.5);
        ratings.scale(1.1);
        assert!((ratings[CompositeRating::Defense] - 0.55).abs() < 1e-12);

        ratings.scale(10.0);
        assert_eq!(ratings[CompositeRating::Defense], 1.0);
    }

    #[test]
    fn test_from_fn() {
        let ratings = CompositeRatings::from_fn(|r| r.index() as f64 / 100.0);
        assert_eq!(ratings[CompositeRating::Pace], 0.0);
        assert!((ratings[CompositeRating::JumpBall] - 0.2).abs() < 1e-12);
        assert_eq!(ratings.iter().count(), CompositeRating::COUNT);
    }

    #[test]
    fn test_skill_set() {
        let skills = SkillSet::new().with(Skill::ThreePoint).with(Skill::Rebounder);

        assert!(skills.contains(Skill::ThreePoint));
        assert!(skills.contains(Skill::Rebounder));
        assert!(!skills.contains(Skill::Athlete));
        assert_eq!(skills.iter().count(), 2);
        assert!(SkillSet::new().is_empty());

        let collected: SkillSet = [Skill::Passer, Skill::Passer].into_iter().collect();
        assert_eq!(collected.iter().collect::<Vec<_>>(), vec![Skill::Passer]);
    }

    #[test]
    fn test_serialization() {
        let ratings = CompositeRatings::uniform(0.25);
        let json = serde_json::to_string(&ratings).unwrap();
        let deserialized: CompositeRatings = serde_json::from_str(&json).unwrap();
        assert_eq!(ratings, deserialized);
    }
}
