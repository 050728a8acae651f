//! Players, teams and their ratings.
//!
//! The roster is the only arena of players in a game. Depth charts, active
//! lineups and events all refer to players by `PlayerId`.

pub mod builder;
pub mod player;
pub mod ratings;
pub mod synergy;
pub mod team;

pub use builder::{derive_skills, TeamBuilder};
pub use player::{PlayerGameSim, PlayerId, Position};
pub use ratings::{CompositeRating, CompositeRatings, RatingView, Skill, SkillSet};
pub use synergy::Synergy;
pub use team::{DepthChart, TeamGameSim};
