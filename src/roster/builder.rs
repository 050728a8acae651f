//! Synthetic roster generation.
//!
//! Rating generation belongs to the caller in a real league. For tests,
//! benchmarks and exhibition games this builder produces a plausible
//! roster from a seed: starters first, a depth chart that follows roster
//! order, and composite ratings biased by position.

use super::player::{PlayerGameSim, PlayerId, Position};
use super::ratings::{CompositeRating, CompositeRatings, Skill, SkillSet};
use super::team::TeamGameSim;
use crate::core::GameRng;
use crate::error::{Result, SimError};

/// Default roster layout: a starting five followed by the bench.
const DEFAULT_LAYOUT: [Position; 12] = [
    Position::Guard,
    Position::Guard,
    Position::Forward,
    Position::Forward,
    Position::Center,
    Position::Guard,
    Position::Guard,
    Position::Forward,
    Position::Forward,
    Position::Forward,
    Position::Center,
    Position::Center,
];

const FIRST_NAMES: [&str; 16] = [
    "Alex", "Ben", "Carl", "Dan", "Eli", "Felix", "Gus", "Hank", "Ivan", "Jack", "Kyle", "Leo",
    "Marc", "Nate", "Omar", "Pete",
];

const LAST_NAMES: [&str; 16] = [
    "Adams", "Brown", "Clark", "Davis", "Evans", "Foster", "Green", "Hayes", "Irving", "Jones",
    "King", "Lewis", "Moore", "Nash", "Owens", "Price",
];

/// Player ids are `team id * ID_STRIDE + roster index`.
const ID_STRIDE: u32 = 100;

/// Rating at which a player earns the matching skill tag.
const SKILL_THRESHOLD: f64 = 0.66;

/// Builder for a generated team.
///
/// ```
/// use courtsim::roster::{Position, TeamBuilder};
///
/// let team = TeamBuilder::new(1, "Hawks").strength(0.6).build(7).unwrap();
///
/// assert_eq!(team.players().len(), 12);
/// assert_eq!(team.depth_chart().get(Position::Center).map(|c| c.len()), Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct TeamBuilder {
    id: u32,
    name: String,
    strength: f64,
    layout: Vec<Position>,
}

impl TeamBuilder {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            strength: 0.5,
            layout: DEFAULT_LAYOUT.to_vec(),
        }
    }

    /// Mean rating level of the roster, in `[0, 1]`.
    #[must_use]
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength.clamp(0.0, 1.0);
        self
    }

    /// Replace the roster layout (positions in roster order, starters first).
    #[must_use]
    pub fn layout(mut self, layout: Vec<Position>) -> Self {
        self.layout = layout;
        self
    }

    /// Generate the team.
    ///
    /// The same builder and seed always produce the same roster.
    pub fn build(self, seed: u64) -> Result<TeamGameSim> {
        let mut rng = GameRng::new(seed).for_context(&format!("roster-{}", self.id));

        if self.layout.len() > ID_STRIDE as usize {
            return Err(SimError::InvalidConfig(format!(
                "roster of {} players is over the {ID_STRIDE} a team can hold",
                self.layout.len()
            )));
        }

        let mut players = Vec::with_capacity(self.layout.len());
        for (i, &position) in self.layout.iter().enumerate() {
            let id = self
                .id
                .checked_mul(ID_STRIDE)
                .and_then(|base| base.checked_add(i as u32))
                .ok_or_else(|| {
                    SimError::InvalidConfig(format!("team id {} is too large for player ids", self.id))
                })?;
            players.push(self.generate_player(PlayerId(id), i, position, &mut rng));
        }

        TeamGameSim::with_roster_depth(self.id, self.name, players)
    }

    fn generate_player(
        &self,
        id: PlayerId,
        index: usize,
        position: Position,
        rng: &mut GameRng,
    ) -> PlayerGameSim {
        // Earlier roster spots are better players, so roster order doubles as depth order.
        let quality = self.strength + 0.12 - 0.02 * index as f64 + rng.uniform_range(-0.05, 0.05);

        let ratings = CompositeRatings::from_fn(|rating| {
            quality + position_bias(position, rating) + rng.uniform_range(-0.1, 0.1)
        });
        let skills = derive_skills(&ratings);
        let ovr = 100.0 * ratings.iter().map(|(_, v)| v).sum::<f64>() / CompositeRating::COUNT as f64;

        let first = FIRST_NAMES[rng.gen_range_usize(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range_usize(0..LAST_NAMES.len())];

        PlayerGameSim::new(id, format!("{first} {last}"), position)
            .with_ovr(ovr)
            .with_ratings(ratings)
            .with_skills(skills)
    }
}

fn position_bias(position: Position, rating: CompositeRating) -> f64 {
    use CompositeRating as R;

    match (position, rating) {
        (Position::Guard, R::Dribbling | R::Passing) => 0.15,
        (Position::Guard, R::ShootingThreePointer | R::DefensePerimeter) => 0.1,
        (Position::Guard, R::Pace | R::Stealing | R::ShootingFt) => 0.05,
        (Position::Guard, R::Rebounding | R::DefenseInterior | R::ShootingLowPost) => -0.15,
        (Position::Guard, R::Blocking | R::JumpBall) => -0.2,

        (Position::Forward, R::Athleticism | R::ShootingMidRange | R::Rebounding) => 0.05,

        (Position::Center, R::Rebounding | R::Blocking | R::DefenseInterior | R::JumpBall) => 0.2,
        (Position::Center, R::ShootingLowPost) => 0.15,
        (Position::Center, R::ShootingAtRim | R::Fouling) => 0.1,
        (Position::Center, R::Passing | R::ShootingFt | R::DefensePerimeter) => -0.1,
        (Position::Center, R::Dribbling) => -0.15,
        (Position::Center, R::ShootingThreePointer) => -0.2,

        _ => 0.0,
    }
}

/// Skill tags earned from composite ratings.
pub fn derive_skills(ratings: &CompositeRatings) -> SkillSet {
    let source = |skill: Skill| match skill {
        Skill::ThreePoint => CompositeRating::ShootingThreePointer,
        Skill::Athlete => CompositeRating::Athleticism,
        Skill::BallHandler => CompositeRating::Dribbling,
        Skill::Passer => CompositeRating::Passing,
        Skill::PostScorer => CompositeRating::ShootingLowPost,
        Skill::PerimeterDefender => CompositeRating::DefensePerimeter,
        Skill::InteriorDefender => CompositeRating::DefenseInterior,
        Skill::Rebounder => CompositeRating::Rebounding,
    };

    Skill::ALL
        .into_iter()
        .filter(|&skill| ratings[source(skill)] >= SKILL_THRESHOLD)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RatingView;

    #[test]
    fn test_build_is_deterministic() {
        let a = TeamBuilder::new(1, "A").build(42).unwrap();
        let b = TeamBuilder::new(1, "A").build(42).unwrap();

        for (pa, pb) in a.players().iter().zip(b.players()) {
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = TeamBuilder::new(1, "A").build(1).unwrap();
        let b = TeamBuilder::new(1, "A").build(2).unwrap();

        assert_ne!(a.players()[0].ratings, b.players()[0].ratings);
    }

    #[test]
    fn test_default_layout() {
        let team = TeamBuilder::new(3, "C").build(0).unwrap();
        let depth = team.depth_chart();

        assert_eq!(depth.get(Position::Guard).map(<[_]>::len), Some(4));
        assert_eq!(depth.get(Position::Forward).map(<[_]>::len), Some(5));
        assert_eq!(depth.get(Position::Center).map(<[_]>::len), Some(3));
        assert_eq!(depth.get(Position::Center).and_then(|c| c.first()), Some(&PlayerId(304)));
    }

    #[test]
    fn test_centers_rebound_better_than_guards() {
        let team = TeamBuilder::new(1, "A").build(9).unwrap();
        let mean = |pos: Position| {
            let players: Vec<_> = team.players().iter().filter(|p| p.position == pos).collect();
            players
                .iter()
                .map(|p| p.rating(CompositeRating::Rebounding))
                .sum::<f64>()
                / players.len() as f64
        };

        assert!(mean(Position::Center) > mean(Position::Guard));
    }

    #[test]
    fn test_player_ids_checked() {
        let team = TeamBuilder::new(42_949_672, "Edge").build(1).unwrap();
        assert_eq!(team.players()[11].id, PlayerId(4_294_967_211));

        assert!(matches!(
            TeamBuilder::new(42_949_673, "Overflow").build(1),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            TeamBuilder::new(1, "Crowded").layout(vec![Position::Guard; 101]).build(1),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(TeamBuilder::new(1, "Full").layout(vec![Position::Guard; 100]).build(1).is_ok());
    }

    #[test]
    fn test_derive_skills() {
        let mut ratings = CompositeRatings::uniform(0.5);
        ratings[CompositeRating::ShootingThreePointer] = 0.8;
        ratings[CompositeRating::DefenseInterior] = 0.7;

        let skills = derive_skills(&ratings);
        assert_eq!(
            skills.iter().collect::<Vec<_>>(),
            vec![Skill::ThreePoint, Skill::InteriorDefender]
        );
    }
}
