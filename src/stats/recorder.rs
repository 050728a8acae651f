//! Applying events to box scores.
//!
//! `StatRecorder` is the single place stat counters change. Every change
//! goes to the player line (when a player is involved) and the team line,
//! scoring stats also move points and the period breakdown, and the change
//! is forwarded to the play-by-play logger so the two never disagree.

use super::line::Stat;
use crate::core::{Side, SideMap};
use crate::error::{Result, SimError};
use crate::pbp::{Event, PlayByPlayLogger};
use crate::roster::{PlayerId, TeamGameSim};

/// Borrowed view over both teams' stat lines for one period.
pub struct StatRecorder<'a> {
    teams: &'a mut SideMap<TeamGameSim>,
    logger: &'a mut PlayByPlayLogger,
    period: u8,
}

impl<'a> StatRecorder<'a> {
    pub fn new(
        teams: &'a mut SideMap<TeamGameSim>,
        logger: &'a mut PlayByPlayLogger,
        period: u8,
    ) -> Self {
        Self {
            teams,
            logger,
            period,
        }
    }

    /// Add `amount` to a stat for a team and, if given, one of its players.
    pub fn record(
        &mut self,
        side: Side,
        player: Option<PlayerId>,
        stat: Stat,
        amount: f64,
    ) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(SimError::Invariant(format!(
                "stat {stat} cannot change by {amount}"
            )));
        }
        if stat.is_derived() {
            return Err(SimError::Invariant(format!("stat {stat} is derived")));
        }
        if stat.is_team_only() && player.is_some() {
            return Err(SimError::Invariant(format!("stat {stat} is team only")));
        }

        let points = stat
            .points_value()
            .map(|value| (f64::from(value) * amount).round());
        let team = &mut self.teams[side];

        if let Some(id) = player {
            let line = team.try_player_mut(id)?.stats_mut();
            line.add(stat, amount);
            if let Some(points) = points {
                line.add(Stat::Pts, points);
            }
        }

        let line = team.stats_mut();
        line.add(stat, amount);
        if let Some(points) = points {
            line.add(Stat::Pts, points);
            team.add_period_points(self.period, points as u32);
        }

        if stat.is_logged() {
            self.logger.log_stat(self.period, side, player, stat, amount);
        }
        Ok(())
    }

    fn count(&mut self, side: Side, player: PlayerId, stat: Stat) -> Result<()> {
        self.record(side, Some(player), stat, 1.0)
    }

    /// Record every stat an event implies.
    pub fn apply_event(&mut self, event: &Event) -> Result<()> {
        match *event {
            Event::Turnover {
                side,
                player,
                stolen_by,
            } => {
                self.count(side, player, Stat::Tov)?;
                if let Some(thief) = stolen_by {
                    self.count(side.other(), thief, Stat::Stl)?;
                }
            }
            Event::PersonalFoul { side, player, .. } => self.count(side, player, Stat::Pf)?,
            Event::ShotMade {
                side,
                player,
                shot,
                assist,
                ..
            } => {
                self.count(side, player, Stat::Fga)?;
                self.count(side, player, shot.attempt_stat())?;
                self.count(side, player, Stat::Fg)?;
                self.count(side, player, shot.make_stat())?;
                if let Some(passer) = assist {
                    self.count(side, passer, Stat::Ast)?;
                }
            }
            Event::ShotMissed {
                side,
                player,
                shot,
                blocked_by,
            } => {
                self.count(side, player, Stat::Fga)?;
                self.count(side, player, shot.attempt_stat())?;
                if let Some(blocker) = blocked_by {
                    self.count(side, player, Stat::Ba)?;
                    self.count(side.other(), blocker, Stat::Blk)?;
                }
            }
            Event::FreeThrowMade { side, player, .. } => {
                self.count(side, player, Stat::Fta)?;
                self.count(side, player, Stat::Ft)?;
            }
            Event::FreeThrowMissed { side, player, .. } => self.count(side, player, Stat::Fta)?,
            Event::Rebound {
                side,
                player,
                offensive,
            } => {
                let stat = if offensive { Stat::Orb } else { Stat::Drb };
                self.count(side, player, stat)?;
            }
            Event::JumpBall { .. }
            | Event::PeriodStart { .. }
            | Event::PeriodEnd { .. }
            | Event::Substitution { .. }
            | Event::ShortHanded { .. }
            | Event::Injury { .. }
            | Event::FoulOut { .. }
            | Event::GameOver { .. } => {}
        }
        Ok(())
    }
}
