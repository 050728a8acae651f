//! Finished game output.
//!
//! Everything here is plain data: ratings, energy and other in-game
//! bookkeeping are stripped, and all of it serializes with serde.

use serde::{Deserialize, Serialize};

use crate::core::{Side, SideMap};
use crate::pbp::{PlayByPlayEntry, ScoringPlay};
use crate::roster::{PlayerGameSim, PlayerId, Position, RatingView, TeamGameSim};
use crate::sim::GameWinner;
use crate::stats::StatLine;

/// One player's final line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerBoxScore {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub stats: StatLine,
    /// Hurt before or during the game.
    pub injured: bool,
    pub fouled_out: bool,
}

impl From<PlayerGameSim> for PlayerBoxScore {
    fn from(player: PlayerGameSim) -> Self {
        Self {
            injured: player.is_injured(),
            fouled_out: player.is_fouled_out(),
            stats: player.stats().clone(),
            id: player.id,
            name: player.name,
            position: player.position,
        }
    }
}

/// One team's final box score. Players are in roster order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamBoxScore {
    pub id: u32,
    pub name: String,
    pub stats: StatLine,
    pub pts_by_period: Vec<u32>,
    pub players: Vec<PlayerBoxScore>,
}

impl TeamBoxScore {
    /// Final score.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.stats.points()
    }
}

impl From<TeamGameSim> for TeamBoxScore {
    fn from(team: TeamGameSim) -> Self {
        let (id, name, players, stats, pts_by_period) = team.into_parts();
        Self {
            id,
            name,
            stats,
            pts_by_period,
            players: players.into_iter().map(PlayerBoxScore::from).collect(),
        }
    }
}

/// Everything a finished game produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub overtimes: u32,
    pub teams: SideMap<TeamBoxScore>,
    /// `None` when play-by-play was not requested.
    pub play_by_play: Option<Vec<PlayByPlayEntry>>,
    pub scoring_summary: Vec<ScoringPlay>,
    pub game_winner: Option<GameWinner>,
}

impl GameResult {
    /// Final score per side.
    #[must_use]
    pub fn score(&self) -> SideMap<u32> {
        SideMap::new(|side| self.teams[side].points())
    }

    /// Winning side, or `None` for a tie.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        let score = self.score();
        match score[Side::Home].cmp(&score[Side::Away]) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}
