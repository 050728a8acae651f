//! Play-by-play and scoring summary capture.

use serde::{Deserialize, Serialize};

use super::event::{Event, NameTable};
use crate::core::{Side, SideMap};
use crate::roster::{PlayerId, TeamGameSim};
use crate::stats::Stat;

/// One line of play-by-play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayByPlayEntry {
    /// A game event and its rendered text.
    Play {
        period: u8,
        clock: f64,
        event: Event,
        text: String,
    },
    /// A stat change, as forwarded by the stat recorder.
    Stat {
        period: u8,
        side: Side,
        player: Option<PlayerId>,
        stat: Stat,
        amount: f64,
    },
}

/// A scoring event with the score after it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringPlay {
    pub period: u8,
    /// Minutes left in the period.
    pub clock: f64,
    pub side: Side,
    pub player: PlayerId,
    pub points: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub event: Event,
}

impl ScoringPlay {
    /// Score after the play.
    #[must_use]
    pub fn score(&self) -> SideMap<u32> {
        SideMap::from_pair(self.home_score, self.away_score)
    }
}

/// Collects play-by-play (when enabled) and the scoring summary (always).
///
/// When disabled no names are collected and no text is rendered; only the
/// scoring summary is kept.
#[derive(Debug)]
pub struct PlayByPlayLogger {
    names: Option<NameTable>,
    entries: Vec<PlayByPlayEntry>,
    scoring: Vec<ScoringPlay>,
    score: SideMap<u32>,
    period: u8,
    clock: f64,
}

impl PlayByPlayLogger {
    pub fn new(enabled: bool, teams: &SideMap<TeamGameSim>) -> Self {
        Self {
            names: enabled.then(|| NameTable::from_teams(teams)),
            entries: Vec::new(),
            scoring: Vec::new(),
            score: SideMap::with_value(0),
            period: 0,
            clock: 0.0,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.names.is_some()
    }

    /// Set the game time stamped on subsequent events.
    pub fn set_time(&mut self, period: u8, clock: f64) {
        self.period = period;
        self.clock = clock;
    }

    pub fn log_event(&mut self, event: &Event) {
        let points = event.points();
        if points > 0 {
            if let (Some(side), Some(player)) = (event.side(), event.player()) {
                self.score[side] += points;
                self.scoring.push(ScoringPlay {
                    period: self.period,
                    clock: self.clock,
                    side,
                    player,
                    points,
                    home_score: self.score[Side::Home],
                    away_score: self.score[Side::Away],
                    event: event.clone(),
                });
            }
        }

        if let Some(names) = &self.names {
            let text = event.describe(names);
            self.entries.push(PlayByPlayEntry::Play {
                period: self.period,
                clock: self.clock,
                event: event.clone(),
                text,
            });
        }
    }

    pub fn log_stat(
        &mut self,
        period: u8,
        side: Side,
        player: Option<PlayerId>,
        stat: Stat,
        amount: f64,
    ) {
        if self.is_enabled() {
            self.entries.push(PlayByPlayEntry::Stat {
                period,
                side,
                player,
                stat,
                amount,
            });
        }
    }

    /// Scoring plays logged so far.
    #[must_use]
    pub fn scoring_summary(&self) -> &[ScoringPlay] {
        &self.scoring
    }

    /// Consume the logger: play-by-play (`None` when disabled) and the
    /// scoring summary.
    pub fn into_parts(self) -> (Option<Vec<PlayByPlayEntry>>, Vec<ScoringPlay>) {
        let entries = self.names.map(|_| self.entries);
        (entries, self.scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbp::ShotType;
    use crate::roster::{PlayerGameSim, Position};

    fn teams() -> SideMap<TeamGameSim> {
        SideMap::new(|side| {
            TeamGameSim::with_roster_depth(
                side.index() as u32,
                side.to_string(),
                vec![PlayerGameSim::new(PlayerId(1), "Pat", Position::Guard)],
            )
            .unwrap()
        })
    }

    fn three(side: Side) -> Event {
        Event::ShotMade {
            side,
            player: PlayerId(1),
            shot: ShotType::ThreePointer,
            assist: None,
            and_one: false,
        }
    }

    #[test]
    fn test_disabled_logger_keeps_scoring_summary() {
        let mut logger = PlayByPlayLogger::new(false, &teams());
        logger.set_time(1, 10.5);
        logger.log_event(&three(Side::Home));
        logger.log_stat(1, Side::Home, Some(PlayerId(1)), Stat::Fg, 1.0);
        logger.log_event(&Event::PeriodEnd { period: 1 });

        let (pbp, scoring) = logger.into_parts();
        assert!(pbp.is_none());
        assert_eq!(scoring.len(), 1);
        assert_eq!(scoring[0].points, 3);
        assert_eq!(scoring[0].clock, 10.5);
    }

    #[test]
    fn test_enabled_logger_renders_text() {
        let mut logger = PlayByPlayLogger::new(true, &teams());
        logger.set_time(2, 3.0);
        logger.log_event(&three(Side::Away));
        logger.log_stat(2, Side::Away, None, Stat::Poss, 1.0);

        let (pbp, _) = logger.into_parts();
        let pbp = pbp.unwrap();
        assert_eq!(pbp.len(), 2);
        match &pbp[0] {
            PlayByPlayEntry::Play { period, text, .. } => {
                assert_eq!(*period, 2);
                assert_eq!(text, "Pat made a shot from three");
            }
            other => panic!("expected play, got {other:?}"),
        }
        assert!(matches!(pbp[1], PlayByPlayEntry::Stat { stat: Stat::Poss, .. }));
    }

    #[test]
    fn test_running_score() {
        let mut logger = PlayByPlayLogger::new(false, &teams());
        logger.log_event(&three(Side::Home));
        logger.log_event(&Event::FreeThrowMade {
            side: Side::Away,
            player: PlayerId(1),
            attempt: 1,
            of: 1,
        });
        logger.log_event(&three(Side::Home));

        let last = logger.scoring_summary().last().unwrap();
        assert_eq!((last.home_score, last.away_score), (6, 1));
        assert_eq!(last.score()[Side::Away], 1);
    }
}
