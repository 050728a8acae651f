//! The game loop.
//!
//! `GameSim` owns both teams for the length of one game and drives the
//! possession loop: substitutions, composite ratings, clock, possession
//! resolution, stat recording, foul-outs and injuries. Regulation periods
//! are followed by overtimes until the game is decided, then the result is
//! assembled.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::ClockScheduler;
use super::clutch::find_game_winner;
use super::lineup::{LineupManager, OnFloor};
use super::selector::{EventSelector, PossessionContext};
use crate::core::{GameConfig, GameRng, Side, SideMap};
use crate::error::{Result, SimError};
use crate::pbp::{Event, PlayByPlayLogger};
use crate::result::{GameResult, TeamBoxScore};
use crate::roster::{CompositeRating, PlayerId, RatingView, TeamGameSim};
use crate::stats::{Stat, StatRecorder};

/// Per-game options chosen by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Capture the full play-by-play.
    pub play_by_play: bool,

    /// Home ratings are multiplied by this, away ratings divided (1.0 = neutral).
    pub home_court_advantage: f64,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            play_by_play: false,
            home_court_advantage: 1.0,
        }
    }
}

impl GameOptions {
    #[must_use]
    pub fn with_play_by_play(mut self, enabled: bool) -> Self {
        self.play_by_play = enabled;
        self
    }

    #[must_use]
    pub fn with_home_court_advantage(mut self, factor: f64) -> Self {
        self.home_court_advantage = factor;
        self
    }
}

/// One game in progress.
pub struct GameSim<'c> {
    config: &'c GameConfig,
    teams: SideMap<TeamGameSim>,
    lineup: LineupManager,
    clock: ClockScheduler,
    logger: PlayByPlayLogger,
    rng: GameRng,
    offense: Side,
    team_fouls: SideMap<u8>,
    jump_ball_winner: Option<Side>,
    overtimes: u32,
    #[cfg(test)]
    samples: Vec<tests::Sample>,
}

impl<'c> GameSim<'c> {
    /// Set up a game. Fails on an invalid config or a team that cannot
    /// field its starters.
    pub fn new(
        config: &'c GameConfig,
        home: TeamGameSim,
        away: TeamGameSim,
        options: GameOptions,
        rng: GameRng,
    ) -> Result<Self> {
        config.validate()?;
        let factor = options.home_court_advantage;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "home_court_advantage must be positive, got {factor}"
            )));
        }

        let mut teams = SideMap::from_pair(home, away);
        if factor != 1.0 {
            teams[Side::Home].scale_ratings(factor);
            teams[Side::Away].scale_ratings(1.0 / factor);
        }

        let lineup = LineupManager::new(config, &teams)?;
        let logger = PlayByPlayLogger::new(options.play_by_play, &teams);

        Ok(Self {
            config,
            teams,
            lineup,
            clock: ClockScheduler::new(),
            logger,
            rng,
            offense: Side::Home,
            team_fouls: SideMap::with_value(0),
            jump_ball_winner: None,
            overtimes: 0,
            #[cfg(test)]
            samples: Vec::new(),
        })
    }

    /// Play the game to the end.
    pub fn run(mut self) -> Result<GameResult> {
        for _ in 0..self.config.num_periods {
            self.play_period(false)?;
        }

        while self.needs_overtime() {
            self.overtimes += 1;
            self.play_period(true)?;
        }

        self.finalize()
    }

    fn score(&self) -> SideMap<u32> {
        SideMap::new(|side| self.teams[side].points())
    }

    fn needs_overtime(&self) -> bool {
        let score = self.score();
        if score[Side::Home] != score[Side::Away] {
            return false;
        }
        if self.config.allow_ties && self.overtimes >= 1 {
            return false;
        }
        self.config
            .max_overtimes
            .map_or(true, |max| self.overtimes < max)
    }

    // === Periods ===

    fn play_period(&mut self, overtime: bool) -> Result<()> {
        let length = if overtime {
            self.config.overtime_length()
        } else {
            self.config.period_length
        };
        if overtime {
            self.clock.start_overtime(length)?;
        } else {
            self.clock.start_period(length)?;
        }
        let period = self.clock.period();

        for team in self.teams.iter_mut().map(|(_, team)| team) {
            team.start_period();
        }
        self.team_fouls = SideMap::with_value(0);
        self.logger.set_time(period, length);
        self.emit(Event::PeriodStart { period, overtime })?;
        debug!(period, overtime, length, "period start");

        if period == 1 {
            self.open_game()?;
        } else {
            self.lineup.mark_all_due();
        }

        self.offense = if period == 1 || overtime {
            self.jump_ball()?
        } else {
            self.alternating_possession(period)?
        };

        loop {
            self.substitutions()?;
            let on_floor = SideMap::new(|side| self.lineup.on_floor(side));
            for side in Side::BOTH {
                self.teams[side].update_composite(&on_floor[side], &self.config.fatigue);
            }

            let dt = self.possession_length();
            let tick = self.clock.advance(dt)?;
            self.logger.set_time(period, tick.remaining);
            self.play_time(&on_floor, tick.elapsed)?;
            #[cfg(test)]
            self.samples.push(tests::Sample::take(period, tick.remaining, &self.teams));

            let ctx = PossessionContext {
                offense: self.offense,
                teams: &self.teams,
                on_floor: &on_floor,
                defense_fouls: self.team_fouls[self.offense.other()],
            };
            let possession = EventSelector::new(self.config).next_possession(&ctx, &mut self.rng)?;

            let offense = self.offense;
            self.recorder().record(offense, None, Stat::Poss, 1.0)?;
            for event in &possession.events {
                self.emit(event.clone())?;
            }
            self.check_foul_outs(&possession.events)?;
            self.roll_injuries()?;
            self.offense = possession.next_offense;

            if tick.period_ended {
                break;
            }
        }

        self.emit(Event::PeriodEnd { period })?;
        let score = self.score();
        debug!(
            period,
            home = score[Side::Home],
            away = score[Side::Away],
            "period end"
        );
        Ok(())
    }

    /// Starters get credit for the start; short rosters are announced.
    fn open_game(&mut self) -> Result<()> {
        for side in Side::BOTH {
            for id in self.lineup.on_floor(side) {
                self.recorder().record(side, Some(id), Stat::Gs, 1.0)?;
            }
        }
        for event in self.lineup.opening_events() {
            self.emit(event)?;
        }
        Ok(())
    }

    fn jump_ball(&mut self) -> Result<Side> {
        let on_floor = SideMap::new(|side| self.lineup.on_floor(side));
        let (event, winner) =
            EventSelector::new(self.config).jump_ball(&self.teams, &on_floor, &mut self.rng)?;
        self.emit(event)?;
        if self.jump_ball_winner.is_none() {
            self.jump_ball_winner = Some(winner);
        }
        Ok(winner)
    }

    /// Even periods go to the team that lost the opening tip, odd periods to the winner.
    fn alternating_possession(&self, period: u8) -> Result<Side> {
        let winner = self
            .jump_ball_winner
            .ok_or_else(|| SimError::Invariant(format!("period {period} started before the opening tip")))?;
        Ok(if period % 2 == 0 { winner.other() } else { winner })
    }

    // === Possessions ===

    fn recorder(&mut self) -> StatRecorder<'_> {
        StatRecorder::new(&mut self.teams, &mut self.logger, self.clock.period())
    }

    /// Apply an event's stats, count team fouls, and log it.
    fn emit(&mut self, event: Event) -> Result<()> {
        self.recorder().apply_event(&event)?;
        if let Event::PersonalFoul { side, .. } = event {
            self.team_fouls[side] = self.team_fouls[side].saturating_add(1);
        }
        self.logger.log_event(&event);
        Ok(())
    }

    fn emit_all(&mut self, events: Vec<Event>) -> Result<()> {
        for event in events {
            self.emit(event)?;
        }
        Ok(())
    }

    fn substitutions(&mut self) -> Result<()> {
        for side in Side::BOTH {
            let events = self.lineup.substitute_if_needed(side, &self.teams[side]);
            self.emit_all(events)?;
        }
        Ok(())
    }

    /// Minutes per possession, from both lineups' pace and a random spread.
    fn possession_length(&mut self) -> f64 {
        let pace = (self.teams[Side::Home].composite()[CompositeRating::Pace]
            + self.teams[Side::Away].composite()[CompositeRating::Pace])
            / 2.0;
        let spread = self.config.possession_spread;
        let base = self.config.possession_length;
        let length = base * (1.5 - pace) * self.rng.uniform_range(1.0 - spread, 1.0 + spread);
        length.max(base * 0.1)
    }

    /// Credit minutes and move energy: drain on the floor, recover on the bench.
    fn play_time(&mut self, on_floor: &SideMap<OnFloor>, minutes: f64) -> Result<()> {
        let config: &'c GameConfig = self.config;
        let fatigue = &config.fatigue;
        for side in Side::BOTH {
            for player in self.teams[side].players_mut() {
                let delta = if on_floor[side].contains(&player.id) {
                    -minutes * fatigue.drain_per_minute * (1.0 - player.rating(CompositeRating::Endurance))
                } else {
                    minutes * fatigue.recovery_per_minute
                };
                player.adjust_energy(delta)?;
            }
            for &id in &on_floor[side] {
                self.recorder().record(side, Some(id), Stat::Min, minutes)?;
            }
        }
        self.lineup.elapse(minutes);
        Ok(())
    }

    fn check_foul_outs(&mut self, events: &[Event]) -> Result<()> {
        let Some(limit) = self.config.foul_limit else {
            return Ok(());
        };

        let mut fouled: Vec<(Side, PlayerId)> = Vec::new();
        for event in events {
            if let Event::PersonalFoul { side, player, .. } = *event {
                if !fouled.contains(&(side, player)) {
                    fouled.push((side, player));
                }
            }
        }

        for (side, id) in fouled {
            let player = self.teams[side].try_player_mut(id)?;
            if player.is_fouled_out() || player.stats()[Stat::Pf] < f64::from(limit) {
                continue;
            }
            player.set_fouled_out();
            self.emit(Event::FoulOut { side, player: id })?;
            let events = self.lineup.force_sub_out(side, &self.teams[side], id);
            self.emit_all(events)?;
        }
        Ok(())
    }

    fn roll_injuries(&mut self) -> Result<()> {
        if !self.config.injuries {
            return Ok(());
        }

        for side in Side::BOTH {
            for id in self.lineup.on_floor(side) {
                // A hurt player left on the floor with no bench is not hurt again.
                if self.teams[side].try_player(id)?.is_injured() {
                    continue;
                }
                if !self.rng.gen_bool(self.config.injury_rate) {
                    continue;
                }
                self.teams[side].try_player_mut(id)?.set_injured(true);
                self.emit(Event::Injury { side, player: id })?;
                let events = self.lineup.force_sub_out(side, &self.teams[side], id);
                self.emit_all(events)?;
            }
        }
        Ok(())
    }

    // === Finish ===

    fn finalize(mut self) -> Result<GameResult> {
        let score = self.score();
        self.emit(Event::GameOver {
            home_score: score[Side::Home],
            away_score: score[Side::Away],
        })?;

        for (side, team) in self.teams.iter() {
            let by_period: u32 = team.pts_by_period().iter().sum();
            if by_period != team.points() {
                return Err(SimError::Invariant(format!(
                    "{side} scored {} but periods add to {by_period}",
                    team.points()
                )));
            }
        }

        let (play_by_play, scoring_summary) = self.logger.into_parts();
        let game_winner = find_game_winner(&scoring_summary, &score, self.config);
        debug!(
            home = score[Side::Home],
            away = score[Side::Away],
            overtimes = self.overtimes,
            "game over"
        );

        Ok(GameResult {
            overtimes: self.overtimes,
            teams: self.teams.map(|_, team| TeamBoxScore::from(team)),
            play_by_play,
            scoring_summary,
            game_winner,
        })
    }
}

/// Simulate one game from copies of the two rosters.
///
/// ```
/// use courtsim::core::GameConfig;
/// use courtsim::roster::TeamBuilder;
/// use courtsim::sim::{simulate_game, GameOptions};
///
/// let home = TeamBuilder::new(1, "Hawks").build(1).unwrap();
/// let away = TeamBuilder::new(2, "Owls").build(2).unwrap();
///
/// let result = simulate_game(&GameConfig::default(), &home, &away, GameOptions::default(), 42).unwrap();
/// assert!(result.play_by_play.is_none());
/// assert!(result.winner().is_some());
/// ```
pub fn simulate_game(
    config: &GameConfig,
    home: &TeamGameSim,
    away: &TeamGameSim,
    options: GameOptions,
    seed: u64,
) -> Result<GameResult> {
    GameSim::new(config, home.clone(), away.clone(), options, GameRng::new(seed))?.run()
}
