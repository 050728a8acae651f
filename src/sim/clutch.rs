//! Game-winner detection.
//!
//! The scoring summary is grouped into scoring sequences (a basket and its
//! and-one free throw, or the free throws of one trip, count as one play)
//! and scanned backwards from the final score. The winning team's last
//! sequence whose removal leaves it no longer ahead is the game-winner.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GameConfig, Side, SideMap};
use crate::pbp::ScoringPlay;
use crate::roster::PlayerId;

/// The play that put the winning team ahead for good.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameWinner {
    pub side: Side,
    pub player: PlayerId,
    pub period: u8,
    /// Minutes left in the period.
    pub clock: f64,
    /// Points in the scoring sequence.
    pub points: u32,
    /// Scored in the last regulation period or overtime, inside the clutch window.
    pub clutch: bool,
}

/// A run of scoring plays by one player at one moment.
#[derive(Debug)]
struct Sequence<'a> {
    first: &'a ScoringPlay,
    points: u32,
}

fn same_moment(a: &ScoringPlay, b: &ScoringPlay) -> bool {
    a.side == b.side && a.player == b.player && a.period == b.period && a.clock == b.clock
}

fn sequences(scoring: &[ScoringPlay]) -> Vec<Sequence<'_>> {
    let mut out: Vec<Sequence<'_>> = Vec::new();
    for play in scoring {
        if let Some(seq) = out.last_mut().filter(|seq| same_moment(seq.first, play)) {
            seq.points += play.points;
            continue;
        }
        out.push(Sequence {
            first: play,
            points: play.points,
        });
    }
    out
}

/// Find the game-winning play. A tie has none.
pub fn find_game_winner(
    scoring: &[ScoringPlay],
    final_score: &SideMap<u32>,
    config: &GameConfig,
) -> Option<GameWinner> {
    let winner = match final_score[Side::Home].cmp(&final_score[Side::Away]) {
        std::cmp::Ordering::Greater => Side::Home,
        std::cmp::Ordering::Less => Side::Away,
        std::cmp::Ordering::Equal => return None,
    };
    let loser = winner.other();

    let mut score = final_score.clone();
    for seq in sequences(scoring).iter().rev() {
        let side = seq.first.side;
        score[side] = score[side].saturating_sub(seq.points);

        if side == winner && score[winner] <= score[loser] {
            let clutch = seq.first.period >= config.num_periods
                && seq.first.clock <= config.clutch_window;
            debug!(
                %winner,
                player = %seq.first.player,
                period = seq.first.period,
                clock = seq.first.clock,
                clutch,
                "game-winner found"
            );
            return Some(GameWinner {
                side: winner,
                player: seq.first.player,
                period: seq.first.period,
                clock: seq.first.clock,
                points: seq.points,
                clutch,
            });
        }
    }

    None
}
