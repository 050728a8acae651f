//! Possession resolution.
//!
//! Every "who does it" decision goes through [`pick_player`]; every "what
//! happens" decision is a probability built from team composites and the
//! named constants in [`OutcomeThresholds`].

use crate::core::{FatigueConfig, GameConfig, GameRng, OutcomeThresholds, Side, SideMap};
use crate::error::{Result, SimError};
use crate::pbp::{Event, ShotType};
use crate::roster::{CompositeRating, PlayerGameSim, PlayerId, RatingView, Synergy, TeamGameSim};

use super::lineup::OnFloor;

use CompositeRating as R;

/// Pick one candidate, weighted by a rating.
///
/// Each weight is `(rating * fatigue(energy)) ^ power`. Any weight below
/// `floor_share` of the total is raised to that floor, so nobody on the
/// floor is ever impossible to pick. One uniform draw selects the index.
/// If every weight is zero the pick is uniform. Returns `None` only when
/// there are no candidates.
///
/// ```
/// use courtsim::core::{FatigueConfig, GameRng};
/// use courtsim::roster::{CompositeRating, PlayerGameSim, PlayerId, Position};
/// use courtsim::sim::pick_player;
///
/// let a = PlayerGameSim::new(PlayerId(1), "A", Position::Guard);
/// let b = PlayerGameSim::new(PlayerId(2), "B", Position::Guard);
/// let mut rng = GameRng::new(1);
///
/// let picked = pick_player(
///     &[&a, &b],
///     CompositeRating::Usage,
///     1.0,
///     0.05,
///     &FatigueConfig::default(),
///     &mut rng,
/// );
/// assert!(matches!(picked, Some(0) | Some(1)));
/// ```
pub fn pick_player<P: RatingView>(
    candidates: &[&P],
    rating: CompositeRating,
    power: f64,
    floor_share: f64,
    fatigue: &FatigueConfig,
    rng: &mut GameRng,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let mut weights: Vec<f64> = candidates
        .iter()
        .map(|p| (p.rating(rating) * fatigue.factor(p.energy())).max(0.0).powf(power))
        .collect();
    let total: f64 = weights.iter().sum();

    if !(total > 0.0 && total.is_finite()) {
        return Some(rng.gen_range_usize(0..candidates.len()));
    }

    let floor = floor_share * total;
    for weight in &mut weights {
        *weight = weight.max(floor);
    }

    rng.choose_weighted(&weights)
}

/// What the selector needs to know about the game before a possession.
#[derive(Clone, Copy, Debug)]
pub struct PossessionContext<'a> {
    pub offense: Side,
    pub teams: &'a SideMap<TeamGameSim>,
    pub on_floor: &'a SideMap<OnFloor>,
    /// Fouls the defense has committed this period.
    pub defense_fouls: u8,
}

/// The events of one possession and who has the ball next.
#[derive(Clone, Debug, PartialEq)]
pub struct PossessionResult {
    pub events: Vec<Event>,
    pub next_offense: Side,
}

/// Players on the floor for one side of a possession.
struct Lineup<'t> {
    side: Side,
    players: Vec<&'t PlayerGameSim>,
    team: &'t TeamGameSim,
}

impl<'t> Lineup<'t> {
    fn new(side: Side, ctx: &PossessionContext<'t>) -> Result<Self> {
        let teams: &'t SideMap<TeamGameSim> = ctx.teams;
        let on_floor: &'t SideMap<OnFloor> = ctx.on_floor;
        let team = &teams[side];
        let players = on_floor[side]
            .iter()
            .map(|&id| team.try_player(id))
            .collect::<Result<Vec<_>>>()?;
        if players.is_empty() {
            return Err(SimError::Invariant(format!("{side} has nobody on the floor")));
        }
        Ok(Self {
            side,
            players,
            team,
        })
    }

    fn rating(&self, rating: CompositeRating) -> f64 {
        self.team.composite()[rating]
    }

    fn synergy(&self) -> Synergy {
        self.team.synergy()
    }
}

/// Resolves possessions into events.
#[derive(Clone, Copy, Debug)]
pub struct EventSelector<'c> {
    config: &'c GameConfig,
}

impl<'c> EventSelector<'c> {
    #[must_use]
    pub fn new(config: &'c GameConfig) -> Self {
        Self { config }
    }

    fn thresholds(&self) -> &'c OutcomeThresholds {
        &self.config.thresholds
    }

    fn pick<'t>(
        &self,
        players: &[&'t PlayerGameSim],
        rating: CompositeRating,
        power: f64,
        rng: &mut GameRng,
    ) -> Result<&'t PlayerGameSim> {
        pick_player(
            players,
            rating,
            power,
            self.thresholds().selection_floor,
            &self.config.fatigue,
            rng,
        )
        .and_then(|i| players.get(i).copied())
        .ok_or_else(|| SimError::Invariant(format!("no candidate to pick by {rating:?}")))
    }

    /// Jump ball between each side's best leaper on the floor.
    ///
    /// Each side wins with probability proportional to its jumper's rating.
    pub fn jump_ball(
        &self,
        teams: &SideMap<TeamGameSim>,
        on_floor: &SideMap<OnFloor>,
        rng: &mut GameRng,
    ) -> Result<(Event, Side)> {
        let mut jumpers = SideMap::with_value((PlayerId(0), 0.0));
        for side in Side::BOTH {
            let team = &teams[side];
            let mut best: Option<(PlayerId, f64)> = None;
            for &id in &on_floor[side] {
                let rating = team.try_player(id)?.rating(R::JumpBall);
                if best.map_or(true, |(_, r)| rating > r) {
                    best = Some((id, rating));
                }
            }
            jumpers[side] = best
                .ok_or_else(|| SimError::Invariant(format!("{side} has nobody to jump")))?;
        }

        let (home, home_rating) = jumpers[Side::Home];
        let (away, away_rating) = jumpers[Side::Away];
        let total = home_rating + away_rating;
        let p_home = if total > 0.0 { home_rating / total } else { 0.5 };
        let winner = if rng.gen_bool(p_home) { Side::Home } else { Side::Away };

        Ok((Event::JumpBall { home, away, winner }, winner))
    }

    /// Resolve one possession.
    pub fn next_possession(
        &self,
        ctx: &PossessionContext<'_>,
        rng: &mut GameRng,
    ) -> Result<PossessionResult> {
        let offense = Lineup::new(ctx.offense, ctx)?;
        let defense = Lineup::new(ctx.offense.other(), ctx)?;
        let mut events = Vec::new();

        if rng.gen_bool(self.turnover_probability(&offense, &defense)) {
            let next_offense = self.turnover(&offense, &defense, rng, &mut events)?;
            return Ok(PossessionResult {
                events,
                next_offense,
            });
        }

        let next_offense = if rng.gen_bool(self.foul_probability(&offense, &defense)) {
            self.non_shooting_foul(&offense, &defense, ctx.defense_fouls, rng, &mut events)?
        } else {
            self.shot(&offense, &defense, rng, &mut events)?
        };

        Ok(PossessionResult {
            events,
            next_offense,
        })
    }

    // === Probabilities ===

    fn turnover_probability(&self, offense: &Lineup<'_>, defense: &Lineup<'_>) -> f64 {
        let t = self.thresholds();
        let handling = (offense.rating(R::Dribbling) + offense.rating(R::Passing)) / 2.0;
        let p = t.turnover_base
            * (0.5 + offense.rating(R::Turnovers))
            * (1.5 - handling)
            * (0.5 + defense.rating(R::Stealing))
            - t.synergy_factor * (offense.synergy().off - defense.synergy().def);
        p.max(t.turnover_min).min(t.turnover_max)
    }

    fn foul_probability(&self, offense: &Lineup<'_>, defense: &Lineup<'_>) -> f64 {
        let t = self.thresholds();
        (t.foul_base * (0.5 + defense.rating(R::Fouling)) * (0.5 + offense.rating(R::DrawingFouls)))
            .clamp(0.0, 1.0)
    }

    fn make_probability(
        &self,
        shooter: &PlayerGameSim,
        shot: ShotType,
        offense: &Lineup<'_>,
        defense: &Lineup<'_>,
    ) -> f64 {
        let t = self.thresholds();
        let (base, skill, guard) = match shot {
            ShotType::AtRim => (t.make_at_rim, R::ShootingAtRim, R::DefenseInterior),
            ShotType::LowPost => (t.make_low_post, R::ShootingLowPost, R::DefenseInterior),
            ShotType::MidRange => (t.make_mid_range, R::ShootingMidRange, R::DefensePerimeter),
            ShotType::ThreePointer => (t.make_three, R::ShootingThreePointer, R::DefensePerimeter),
        };
        let shooting = shooter.rating(skill) * self.config.fatigue.factor(shooter.energy());

        let p = base + t.make_rating_spread * (shooting - 0.5)
            - t.make_defense_spread * (defense.rating(guard) - 0.5)
            + t.synergy_factor * (offense.synergy().off - defense.synergy().def);
        p.clamp(0.0, 1.0)
    }

    fn free_throw_probability(&self, shooter: &PlayerGameSim) -> f64 {
        let t = self.thresholds();
        let rating = shooter.rating(R::ShootingFt) * self.config.fatigue.factor(shooter.energy());
        (t.ft_base + t.ft_rating_spread * rating).clamp(0.0, 1.0)
    }

    // === Outcomes ===

    fn turnover(
        &self,
        offense: &Lineup<'_>,
        defense: &Lineup<'_>,
        rng: &mut GameRng,
        events: &mut Vec<Event>,
    ) -> Result<Side> {
        let t = self.thresholds();
        let player = self.pick(&offense.players, R::Turnovers, 1.0, rng)?;

        let p_steal = (t.steal_share * (0.5 + defense.rating(R::Stealing))).clamp(0.0, 1.0);
        let stolen_by = if rng.gen_bool(p_steal) {
            Some(self.pick(&defense.players, R::Stealing, 1.0, rng)?.id)
        } else {
            None
        };

        events.push(Event::Turnover {
            side: offense.side,
            player: player.id,
            stolen_by,
        });
        Ok(defense.side)
    }

    fn non_shooting_foul(
        &self,
        offense: &Lineup<'_>,
        defense: &Lineup<'_>,
        defense_fouls: u8,
        rng: &mut GameRng,
        events: &mut Vec<Event>,
    ) -> Result<Side> {
        let fouler = self.pick(&defense.players, R::Fouling, 1.0, rng)?;
        events.push(Event::PersonalFoul {
            side: defense.side,
            player: fouler.id,
            shooting: false,
        });

        if defense_fouls.saturating_add(1) >= self.config.bonus_threshold {
            let shooter = self.pick(&offense.players, R::DrawingFouls, 1.0, rng)?;
            self.free_throws(shooter, 2, offense, defense, rng, events)
        } else {
            // Side out: the offense inbounds and starts a new possession.
            Ok(offense.side)
        }
    }

    fn shot(
        &self,
        offense: &Lineup<'_>,
        defense: &Lineup<'_>,
        rng: &mut GameRng,
        events: &mut Vec<Event>,
    ) -> Result<Side> {
        let t = self.thresholds();
        let shooter = self.pick(&offense.players, R::Usage, t.usage_power, rng)?;
        let shot = self.shot_type(shooter, rng)?;
        let p_make = self.make_probability(shooter, shot, offense, defense);

        let (block_scale, foul_scale) = match shot {
            ShotType::AtRim => (t.block_scale_at_rim, t.shooting_foul_scale_at_rim),
            ShotType::LowPost => (t.block_scale_low_post, t.shooting_foul_scale_low_post),
            ShotType::MidRange => (t.block_scale_mid_range, t.shooting_foul_scale_mid_range),
            ShotType::ThreePointer => (t.block_scale_three, t.shooting_foul_scale_three),
        };
        let p_block = (t.block_base * block_scale * t.block_rating_weight * defense.rating(R::Blocking))
            .clamp(0.0, 1.0);
        if rng.gen_bool(p_block) {
            let blocker = self.pick(&defense.players, R::Blocking, 1.0, rng)?;
            events.push(Event::ShotMissed {
                side: offense.side,
                player: shooter.id,
                shot,
                blocked_by: Some(blocker.id),
            });
            return self.rebound(offense, defense, rng, events);
        }

        let p_shooting_foul = (t.shooting_foul_base
            * foul_scale
            * (0.5 + shooter.rating(R::DrawingFouls))
            * (0.5 + defense.rating(R::Fouling)))
        .clamp(0.0, 1.0);

        if rng.gen_bool(p_shooting_foul) {
            let fouler = self.pick(&defense.players, R::Fouling, 1.0, rng)?;
            events.push(Event::PersonalFoul {
                side: defense.side,
                player: fouler.id,
                shooting: true,
            });

            if rng.gen_bool(p_make * t.fouled_make_factor) {
                let assist = self.assist(shooter, offense, rng)?;
                events.push(Event::ShotMade {
                    side: offense.side,
                    player: shooter.id,
                    shot,
                    assist,
                    and_one: true,
                });
                return self.free_throws(shooter, 1, offense, defense, rng, events);
            }

            // Missed while fouled: no field goal attempt, free throws only.
            let attempts = shot.points() as u8;
            return self.free_throws(shooter, attempts, offense, defense, rng, events);
        }

        if rng.gen_bool(p_make) {
            let assist = self.assist(shooter, offense, rng)?;
            events.push(Event::ShotMade {
                side: offense.side,
                player: shooter.id,
                shot,
                assist,
                and_one: false,
            });
            Ok(defense.side)
        } else {
            events.push(Event::ShotMissed {
                side: offense.side,
                player: shooter.id,
                shot,
                blocked_by: None,
            });
            self.rebound(offense, defense, rng, events)
        }
    }

    fn shot_type(&self, shooter: &PlayerGameSim, rng: &mut GameRng) -> Result<ShotType> {
        let t = self.thresholds();
        let weights = [
            t.mix_at_rim * (0.5 + shooter.rating(R::ShootingAtRim)),
            t.mix_low_post * (0.5 + shooter.rating(R::ShootingLowPost)),
            t.mix_mid_range * (0.5 + shooter.rating(R::ShootingMidRange)),
            t.mix_three * (0.5 + shooter.rating(R::ShootingThreePointer)),
        ];
        rng.choose_weighted(&weights)
            .and_then(|i| ShotType::ALL.get(i).copied())
            .ok_or_else(|| SimError::Invariant(format!("shot mix for {} has no weight", shooter.id)))
    }

    fn assist(
        &self,
        shooter: &PlayerGameSim,
        offense: &Lineup<'_>,
        rng: &mut GameRng,
    ) -> Result<Option<PlayerId>> {
        let t = self.thresholds();
        let teammates: Vec<&PlayerGameSim> = offense
            .players
            .iter()
            .copied()
            .filter(|p| p.id != shooter.id)
            .collect();
        if teammates.is_empty() {
            return Ok(None);
        }

        let p_assist = (t.assist_base * (0.5 + offense.rating(R::Passing))).clamp(0.0, 1.0);
        if rng.gen_bool(p_assist) {
            Ok(Some(self.pick(&teammates, R::Passing, 1.0, rng)?.id))
        } else {
            Ok(None)
        }
    }

    fn free_throws(
        &self,
        shooter: &PlayerGameSim,
        attempts: u8,
        offense: &Lineup<'_>,
        defense: &Lineup<'_>,
        rng: &mut GameRng,
        events: &mut Vec<Event>,
    ) -> Result<Side> {
        let p = self.free_throw_probability(shooter);
        let mut last_made = true;

        for attempt in 1..=attempts {
            last_made = rng.gen_bool(p);
            let (side, player, of) = (offense.side, shooter.id, attempts);
            events.push(if last_made {
                Event::FreeThrowMade {
                    side,
                    player,
                    attempt,
                    of,
                }
            } else {
                Event::FreeThrowMissed {
                    side,
                    player,
                    attempt,
                    of,
                }
            });
        }

        if last_made {
            Ok(defense.side)
        } else {
            self.rebound(offense, defense, rng, events)
        }
    }

    fn rebound(
        &self,
        offense: &Lineup<'_>,
        defense: &Lineup<'_>,
        rng: &mut GameRng,
        events: &mut Vec<Event>,
    ) -> Result<Side> {
        let t = self.thresholds();
        let strength = |lineup: &Lineup<'_>| {
            lineup.rating(R::Rebounding) + t.synergy_factor * lineup.synergy().reb
        };
        let (off, def) = (strength(offense), strength(defense));
        let p_orb = if off + def > 0.0 {
            t.offensive_rebound_base * t.offensive_rebound_weight * off / (off + def)
        } else {
            t.offensive_rebound_base
        };

        let winner = if rng.gen_bool(p_orb.clamp(0.0, 1.0)) { offense } else { defense };
        let rebounder = self.pick(&winner.players, R::Rebounding, 1.0, rng)?;
        events.push(Event::Rebound {
            side: winner.side,
            player: rebounder.id,
            offensive: winner.side == offense.side,
        });
        Ok(winner.side)
    }
}
