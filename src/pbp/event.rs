//! Game events.
//!
//! Every discrete thing that happens in a game is one `Event` variant,
//! carrying only the fields that kind of event needs. Players are referred
//! to by ID; names are resolved through a `NameTable` only when text is
//! rendered.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Side, SideMap};
use crate::roster::{PlayerId, Position, TeamGameSim};
use crate::stats::Stat;

/// Field goal type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotType {
    AtRim,
    LowPost,
    MidRange,
    ThreePointer,
}

impl ShotType {
    pub const ALL: [ShotType; 4] = [
        ShotType::AtRim,
        ShotType::LowPost,
        ShotType::MidRange,
        ShotType::ThreePointer,
    ];

    /// Points for a make.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            ShotType::ThreePointer => 3,
            _ => 2,
        }
    }

    /// Per-type attempt counter (recorded alongside `Fga`).
    #[must_use]
    pub const fn attempt_stat(self) -> Stat {
        match self {
            ShotType::AtRim => Stat::FgaAtRim,
            ShotType::LowPost => Stat::FgaLowPost,
            ShotType::MidRange => Stat::FgaMidRange,
            ShotType::ThreePointer => Stat::Tpa,
        }
    }

    /// Per-type make counter (recorded alongside `Fg`).
    #[must_use]
    pub const fn make_stat(self) -> Stat {
        match self {
            ShotType::AtRim => Stat::FgAtRim,
            ShotType::LowPost => Stat::FgLowPost,
            ShotType::MidRange => Stat::FgMidRange,
            ShotType::ThreePointer => Stat::Tp,
        }
    }

    const fn phrase(self) -> &'static str {
        match self {
            ShotType::AtRim => "at the rim",
            ShotType::LowPost => "in the post",
            ShotType::MidRange => "from mid-range",
            ShotType::ThreePointer => "from three",
        }
    }
}

/// A game event.
///
/// `side` fields name the team the acting player belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    JumpBall {
        home: PlayerId,
        away: PlayerId,
        winner: Side,
    },
    PeriodStart {
        period: u8,
        overtime: bool,
    },
    PeriodEnd {
        period: u8,
    },
    Substitution {
        side: Side,
        player_in: PlayerId,
        player_out: PlayerId,
    },
    /// No eligible replacement: the unit plays with fewer players.
    ShortHanded {
        side: Side,
        position: Position,
        on_floor: usize,
    },
    Injury {
        side: Side,
        player: PlayerId,
    },
    FoulOut {
        side: Side,
        player: PlayerId,
    },
    Turnover {
        side: Side,
        player: PlayerId,
        stolen_by: Option<PlayerId>,
    },
    PersonalFoul {
        side: Side,
        player: PlayerId,
        shooting: bool,
    },
    ShotMade {
        side: Side,
        player: PlayerId,
        shot: ShotType,
        assist: Option<PlayerId>,
        and_one: bool,
    },
    ShotMissed {
        side: Side,
        player: PlayerId,
        shot: ShotType,
        blocked_by: Option<PlayerId>,
    },
    FreeThrowMade {
        side: Side,
        player: PlayerId,
        attempt: u8,
        of: u8,
    },
    FreeThrowMissed {
        side: Side,
        player: PlayerId,
        attempt: u8,
        of: u8,
    },
    Rebound {
        side: Side,
        player: PlayerId,
        offensive: bool,
    },
    GameOver {
        home_score: u32,
        away_score: u32,
    },
}

impl Event {
    /// Team the event belongs to, if any.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        match *self {
            Event::JumpBall { winner, .. } => Some(winner),
            Event::Substitution { side, .. }
            | Event::ShortHanded { side, .. }
            | Event::Injury { side, .. }
            | Event::FoulOut { side, .. }
            | Event::Turnover { side, .. }
            | Event::PersonalFoul { side, .. }
            | Event::ShotMade { side, .. }
            | Event::ShotMissed { side, .. }
            | Event::FreeThrowMade { side, .. }
            | Event::FreeThrowMissed { side, .. }
            | Event::Rebound { side, .. } => Some(side),
            Event::PeriodStart { .. } | Event::PeriodEnd { .. } | Event::GameOver { .. } => None,
        }
    }

    /// Primary player of the event, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match *self {
            Event::Substitution { player_in, .. } => Some(player_in),
            Event::Injury { player, .. }
            | Event::FoulOut { player, .. }
            | Event::Turnover { player, .. }
            | Event::PersonalFoul { player, .. }
            | Event::ShotMade { player, .. }
            | Event::ShotMissed { player, .. }
            | Event::FreeThrowMade { player, .. }
            | Event::FreeThrowMissed { player, .. }
            | Event::Rebound { player, .. } => Some(player),
            _ => None,
        }
    }

    /// Points the event puts on the board.
    #[must_use]
    pub fn points(&self) -> u32 {
        match self {
            Event::ShotMade { shot, .. } => shot.points(),
            Event::FreeThrowMade { .. } => 1,
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_scoring(&self) -> bool {
        self.points() > 0
    }

    /// Render the event as one line of play-by-play.
    pub fn describe(&self, names: &NameTable) -> String {
        match self {
            Event::JumpBall { home, away, winner } => format!(
                "Jump ball between {} and {}; {} gains possession",
                names.player(Side::Home, *home),
                names.player(Side::Away, *away),
                names.team(*winner),
            ),
            Event::PeriodStart { period, overtime } => {
                if *overtime {
                    format!("Start of overtime (period {period})")
                } else {
                    format!("Start of period {period}")
                }
            }
            Event::PeriodEnd { period } => format!("End of period {period}"),
            Event::Substitution {
                side,
                player_in,
                player_out,
            } => format!(
                "Substitution: {} enters for {}",
                names.player(*side, *player_in),
                names.player(*side, *player_out),
            ),
            Event::ShortHanded {
                side,
                position,
                on_floor,
            } => format!(
                "{} has no available {:?} and plays with {} on the floor at that spot",
                names.team(*side),
                position,
                on_floor
            ),
            Event::Injury { side, player } => {
                format!("{} was injured!", names.player(*side, *player))
            }
            Event::FoulOut { side, player } => {
                format!("{} fouled out", names.player(*side, *player))
            }
            Event::Turnover {
                side,
                player,
                stolen_by,
            } => match stolen_by {
                Some(thief) => format!(
                    "{} stole the ball from {}",
                    names.player(side.other(), *thief),
                    names.player(*side, *player),
                ),
                None => format!("{} turned the ball over", names.player(*side, *player)),
            },
            Event::PersonalFoul {
                side,
                player,
                shooting,
            } => {
                let kind = if *shooting { "Shooting foul" } else { "Foul" };
                format!("{kind} on {}", names.player(*side, *player))
            }
            Event::ShotMade {
                side,
                player,
                shot,
                assist,
                and_one,
            } => {
                let mut text = format!("{} made a shot {}", names.player(*side, *player), shot.phrase());
                if let Some(passer) = assist {
                    text.push_str(&format!(" (assist: {})", names.player(*side, *passer)));
                }
                if *and_one {
                    text.push_str(", and one!");
                }
                text
            }
            Event::ShotMissed {
                side,
                player,
                shot,
                blocked_by,
            } => match blocked_by {
                Some(blocker) => format!(
                    "{} blocked a shot {} by {}",
                    names.player(side.other(), *blocker),
                    shot.phrase(),
                    names.player(*side, *player),
                ),
                None => format!("{} missed a shot {}", names.player(*side, *player), shot.phrase()),
            },
            Event::FreeThrowMade {
                side,
                player,
                attempt,
                of,
            } => format!(
                "{} made free throw {attempt} of {of}",
                names.player(*side, *player)
            ),
            Event::FreeThrowMissed {
                side,
                player,
                attempt,
                of,
            } => format!(
                "{} missed free throw {attempt} of {of}",
                names.player(*side, *player)
            ),
            Event::Rebound {
                side,
                player,
                offensive,
            } => {
                let kind = if *offensive { "offensive" } else { "defensive" };
                format!("{} grabbed the {kind} rebound", names.player(*side, *player))
            }
            Event::GameOver {
                home_score,
                away_score,
            } => format!(
                "Final: {} {home_score}, {} {away_score}",
                names.team(Side::Home),
                names.team(Side::Away),
            ),
        }
    }
}

/// Team and player names for rendering text.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    teams: SideMap<String>,
    players: SideMap<FxHashMap<PlayerId, String>>,
}

impl NameTable {
    /// Collect names from both rosters.
    pub fn from_teams(teams: &SideMap<TeamGameSim>) -> Self {
        Self {
            teams: SideMap::new(|side| teams[side].name.clone()),
            players: SideMap::new(|side| {
                teams[side]
                    .players()
                    .iter()
                    .map(|p| (p.id, p.name.clone()))
                    .collect()
            }),
        }
    }

    #[must_use]
    pub fn team(&self, side: Side) -> &str {
        &self.teams[side]
    }

    #[must_use]
    pub fn player(&self, side: Side, id: PlayerId) -> &str {
        self.players[side].get(&id).map_or("unknown player", String::as_str)
    }
}
