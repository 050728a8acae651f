//! Lineup synergy from skill tags.
//!
//! Five players who complement each other play better than their ratings
//! alone suggest. Synergy counts the skill tags on the floor and turns them
//! into three scores in `[0, 1]`: offense, defense and rebounding.

use serde::{Deserialize, Serialize};

use super::ratings::{RatingView, Skill};

/// Synergy scores for the players currently on the floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Synergy {
    pub off: f64,
    pub def: f64,
    pub reb: f64,
}

impl Synergy {
    /// Compute synergy for a lineup.
    pub fn from_lineup<'a, R, I>(players: I) -> Self
    where
        R: RatingView + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut counts = [0usize; Skill::COUNT];
        for player in players {
            for skill in Skill::ALL {
                if player.has_skill(skill) {
                    counts[skill as usize] += 1;
                }
            }
        }
        let n = |skill: Skill| counts[skill as usize] as f64;

        let off = 0.15 * n(Skill::ThreePoint).min(3.0)
            + 0.2 * n(Skill::BallHandler).min(1.0)
            + 0.1 * n(Skill::Passer).min(2.0)
            + 0.05 * n(Skill::Athlete).min(2.0)
            + 0.1 * n(Skill::PostScorer).min(1.0);

        let def = 0.2 * n(Skill::PerimeterDefender).min(2.0)
            + 0.4 * n(Skill::InteriorDefender).min(1.0)
            + 0.1 * n(Skill::Athlete).min(2.0);

        let reb = 0.3 * n(Skill::Rebounder).min(3.0);

        Self {
            off: off.min(1.0),
            def: def.min(1.0),
            reb: reb.min(1.0),
        }
    }
}
