//! Who is on the floor.
//!
//! Each team has one `Unit` per lineup slot (guards, forwards, center).
//! A unit holds the IDs of its active players; the roster stays the only
//! owner of player data. Units are re-evaluated on a fixed interval, and a
//! player who gets hurt or fouls out is replaced right away.
//!
//! Once the game is under way a lineup never fails: a unit with nobody left
//! at its position plays short-handed, a unit about to drop below its
//! minimum borrows a bench player from another position, and a team's last
//! player on the floor stays there.

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{FatigueConfig, GameConfig, Side, SideMap};
use crate::error::{Result, SimError};
use crate::pbp::Event;
use crate::roster::{PlayerGameSim, PlayerId, Position, TeamGameSim};

/// Active player IDs on one team.
pub type OnFloor = SmallVec<[PlayerId; 5]>;

#[derive(Clone, Debug)]
struct Unit {
    position: Position,
    count: usize,
    min_count: usize,
    active: SmallVec<[PlayerId; 2]>,
    since_change: f64,
    due: bool,
}

/// Tracks active players per team and position and makes substitutions.
#[derive(Clone, Debug)]
pub struct LineupManager {
    units: SideMap<Vec<Unit>>,
    fatigue: FatigueConfig,
}

impl LineupManager {
    /// Put each team's starters on the floor.
    ///
    /// Starters are the first available players in each position's depth
    /// chart. A position that cannot supply its minimum is an error.
    pub fn new(config: &GameConfig, teams: &SideMap<TeamGameSim>) -> Result<Self> {
        let mut units = SideMap::with_value(Vec::with_capacity(config.lineup.len()));

        for (side, team) in teams.iter() {
            for slot in &config.lineup {
                let active: SmallVec<[PlayerId; 2]> = depth_of(team, slot.position)
                    .iter()
                    .copied()
                    .filter(|&id| team.player(id).is_some_and(PlayerGameSim::is_available))
                    .take(slot.count)
                    .collect();

                if active.len() < slot.min_count {
                    return Err(SimError::MissingPosition {
                        team: team.name.clone(),
                        position: slot.position,
                    });
                }

                units[side].push(Unit {
                    position: slot.position,
                    count: slot.count,
                    min_count: slot.min_count,
                    active,
                    since_change: 0.0,
                    due: false,
                });
            }
        }

        Ok(Self {
            units,
            fatigue: config.fatigue.clone(),
        })
    }

    /// `ShortHanded` events for units that start the game below full strength.
    #[must_use]
    pub fn opening_events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        for (side, units) in self.units.iter() {
            for unit in units.iter().filter(|u| u.active.len() < u.count) {
                events.push(Event::ShortHanded {
                    side,
                    position: unit.position,
                    on_floor: unit.active.len(),
                });
            }
        }
        events
    }

    /// Active players at one position.
    #[must_use]
    pub fn active_players(&self, side: Side, position: Position) -> &[PlayerId] {
        self.units[side]
            .iter()
            .find(|u| u.position == position)
            .map(|u| u.active.as_slice())
            .unwrap_or(&[])
    }

    /// Every active player on a team, in lineup-slot order.
    #[must_use]
    pub fn on_floor(&self, side: Side) -> OnFloor {
        floor_of(&self.units[side])
    }

    #[must_use]
    pub fn is_on_floor(&self, side: Side, player: PlayerId) -> bool {
        self.units[side].iter().any(|u| u.active.contains(&player))
    }

    /// Add playing time to every unit.
    pub fn elapse(&mut self, minutes: f64) {
        for (_, units) in self.units.iter_mut() {
            for unit in units {
                unit.since_change += minutes;
            }
        }
    }

    /// Force every unit to be re-evaluated on its next check (period breaks).
    pub fn mark_all_due(&mut self) {
        for (_, units) in self.units.iter_mut() {
            for unit in units {
                unit.due = true;
            }
        }
    }

    /// Re-evaluate every unit whose interval has elapsed.
    ///
    /// Within a unit, the least valuable active player is swapped for the
    /// most valuable bench player as long as the bench player's value beats
    /// the active one by the configured margin. Ties keep depth-chart order.
    pub fn substitute_if_needed(&mut self, side: Side, team: &TeamGameSim) -> Vec<Event> {
        let mut events = Vec::new();
        let fatigue = &self.fatigue;
        let units = &mut self.units[side];

        for i in 0..units.len() {
            let mut floor = floor_of(units);
            let unit = &mut units[i];
            if !unit.due && unit.since_change < fatigue.sub_interval {
                continue;
            }
            unit.due = false;
            unit.since_change = 0.0;

            let depth = depth_of(team, unit.position);
            let value = |id: PlayerId| team.player(id).map_or(0.0, |p| p.substitution_value(fatigue));

            loop {
                let Some((slot, out_value)) = unit
                    .active
                    .iter()
                    .enumerate()
                    .map(|(slot, &id)| (slot, value(id), depth_rank(depth, id)))
                    .min_by(|a, b| a.1.total_cmp(&b.1).then(b.2.cmp(&a.2)))
                    .map(|(slot, v, _)| (slot, v))
                else {
                    break;
                };

                let Some((incoming, in_value)) = best_bench(team, depth, &floor, &value) else {
                    break;
                };

                if in_value <= out_value * fatigue.sub_margin {
                    break;
                }

                let outgoing = unit.active[slot];
                unit.active[slot] = incoming;
                floor.retain(|id| *id != outgoing);
                floor.push(incoming);
                trace!(%side, %incoming, %outgoing, "substitution");
                events.push(Event::Substitution {
                    side,
                    player_in: incoming,
                    player_out: outgoing,
                });
            }
        }

        events
    }

    /// Take a player off the floor immediately (injury or foul-out).
    ///
    /// The best available bench player at the same position comes in. With
    /// nobody left there, the unit plays short-handed while it stays at or
    /// above its minimum; otherwise the best available bench player at any
    /// position fills the spot. When the whole bench is used up the player
    /// leaves anyway, unless they are the team's last one on the floor. A
    /// player who is not on the floor is ignored.
    pub fn force_sub_out(&mut self, side: Side, team: &TeamGameSim, player: PlayerId) -> Vec<Event> {
        let floor = self.on_floor(side);
        let fatigue = &self.fatigue;
        let Some(unit) = self.units[side].iter_mut().find(|u| u.active.contains(&player)) else {
            return Vec::new();
        };
        let Some(slot) = unit.active.iter().position(|&id| id == player) else {
            return Vec::new();
        };

        let value = |id: PlayerId| team.player(id).map_or(0.0, |p| p.substitution_value(fatigue));
        let mut replacement = best_bench(team, depth_of(team, unit.position), &floor, &value);
        if replacement.is_none() && unit.active.len() <= unit.min_count {
            let roster: Vec<PlayerId> = team.players().iter().map(|p| p.id).collect();
            replacement = best_bench(team, &roster, &floor, &value);
            if let Some((incoming, _)) = replacement {
                debug!(%side, %incoming, position = ?unit.position, "playing out of position");
            }
        }

        if let Some((incoming, _)) = replacement {
            unit.active[slot] = incoming;
            unit.since_change = 0.0;
            trace!(%side, %incoming, outgoing = %player, "forced substitution");
            return vec![Event::Substitution {
                side,
                player_in: incoming,
                player_out: player,
            }];
        }

        if floor.len() <= 1 {
            warn!(team = %team.name, %player, "bench exhausted, last player stays on the floor");
            return Vec::new();
        }

        unit.active.remove(slot);
        warn!(
            team = %team.name,
            position = ?unit.position,
            on_floor = unit.active.len(),
            "no replacement available, playing short-handed"
        );
        vec![Event::ShortHanded {
            side,
            position: unit.position,
            on_floor: unit.active.len(),
        }]
    }
}

fn floor_of(units: &[Unit]) -> OnFloor {
    units.iter().flat_map(|u| u.active.iter().copied()).collect()
}

fn depth_of(team: &TeamGameSim, position: Position) -> &[PlayerId] {
    team.depth_chart().get(position).unwrap_or(&[])
}

fn depth_rank(depth: &[PlayerId], player: PlayerId) -> usize {
    depth.iter().position(|&id| id == player).unwrap_or(usize::MAX)
}

/// Most valuable available player in `candidates` who is not on the floor;
/// ties go to the earlier spot.
fn best_bench(
    team: &TeamGameSim,
    candidates: &[PlayerId],
    on_floor: &[PlayerId],
    value: &impl Fn(PlayerId) -> f64,
) -> Option<(PlayerId, f64)> {
    candidates
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, id)| !on_floor.contains(id))
        .filter(|(_, id)| team.player(*id).is_some_and(PlayerGameSim::is_available))
        .map(|(rank, id)| (rank, id, value(id)))
        .max_by(|a, b| a.2.total_cmp(&b.2).then(b.0.cmp(&a.0)))
        .map(|(_, id, v)| (id, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, layout: &[(u32, Position)]) -> TeamGameSim {
        let players = layout
            .iter()
            .map(|&(id, pos)| PlayerGameSim::new(PlayerId(id), format!("P{id}"), pos))
            .collect();
        TeamGameSim::with_roster_depth(1, name, players).unwrap()
    }

    fn deep_team() -> TeamGameSim {
        team(
            "Deep",
            &[
                (1, Position::Guard),
                (2, Position::Guard),
                (3, Position::Guard),
                (4, Position::Forward),
                (5, Position::Forward),
                (6, Position::Forward),
                (7, Position::Center),
                (8, Position::Center),
            ],
        )
    }

    fn thin_team() -> TeamGameSim {
        team(
            "Thin",
            &[
                (1, Position::Guard),
                (2, Position::Guard),
                (4, Position::Forward),
                (5, Position::Forward),
                (7, Position::Center),
            ],
        )
    }

    #[test]
    fn test_starters_skip_injured() {
        let mut home = deep_team();
        home.player_mut(PlayerId(1)).unwrap().set_injured(true);
        let teams = SideMap::from_pair(home, deep_team());

        let lineup = LineupManager::new(&GameConfig::default(), &teams).unwrap();

        assert_eq!(lineup.active_players(Side::Home, Position::Guard), &[PlayerId(2), PlayerId(3)]);
        assert_eq!(lineup.active_players(Side::Away, Position::Guard), &[PlayerId(1), PlayerId(2)]);
        assert_eq!(lineup.on_floor(Side::Home).len(), 5);
        assert!(lineup.opening_events().is_empty());
    }

    #[test]
    fn test_missing_position_is_an_error() {
        let mut home = thin_team();
        home.player_mut(PlayerId(7)).unwrap().set_injured(true);
        let teams = SideMap::from_pair(home, thin_team());

        assert!(matches!(
            LineupManager::new(&GameConfig::default(), &teams),
            Err(SimError::MissingPosition {
                position: Position::Center,
                ..
            })
        ));
    }

    #[test]
    fn test_tired_player_is_replaced_when_due() {
        let mut home = deep_team();
        let teams_init = SideMap::from_pair(home.clone(), deep_team());
        let mut lineup = LineupManager::new(&GameConfig::default(), &teams_init).unwrap();

        home.player_mut(PlayerId(7)).unwrap().adjust_energy(-0.8).unwrap();

        // Not due yet.
        lineup.elapse(1.0);
        assert!(lineup.substitute_if_needed(Side::Home, &home).is_empty());

        lineup.elapse(1.0);
        let events = lineup.substitute_if_needed(Side::Home, &home);
        assert_eq!(
            events,
            vec![Event::Substitution {
                side: Side::Home,
                player_in: PlayerId(8),
                player_out: PlayerId(7),
            }]
        );
        assert_eq!(lineup.active_players(Side::Home, Position::Center), &[PlayerId(8)]);
    }

    #[test]
    fn test_equal_values_keep_lineup() {
        let teams = SideMap::from_pair(deep_team(), deep_team());
        let mut lineup = LineupManager::new(&GameConfig::default(), &teams).unwrap();

        lineup.mark_all_due();
        assert!(lineup.substitute_if_needed(Side::Home, &teams[Side::Home]).is_empty());
    }

    #[test]
    fn test_later_depth_player_goes_out_on_tie() {
        let mut home = deep_team();
        home.player_mut(PlayerId(3)).unwrap().ovr = 80.0;
        let teams = SideMap::from_pair(home, deep_team());
        let mut lineup = LineupManager::new(&GameConfig::default(), &teams).unwrap();

        lineup.mark_all_due();
        let events = lineup.substitute_if_needed(Side::Home, &teams[Side::Home]);

        assert_eq!(events.len(), 1);
        assert_eq!(lineup.active_players(Side::Home, Position::Guard), &[PlayerId(1), PlayerId(3)]);
    }

    #[test]
    fn test_force_sub_out() {
        let mut home = deep_team();
        let teams = SideMap::from_pair(home.clone(), deep_team());
        let mut lineup = LineupManager::new(&GameConfig::default(), &teams).unwrap();

        home.player_mut(PlayerId(4)).unwrap().set_injured(true);
        let events = lineup.force_sub_out(Side::Home, &home, PlayerId(4));

        assert_eq!(events.len(), 1);
        assert!(!lineup.is_on_floor(Side::Home, PlayerId(4)));
        assert!(lineup.is_on_floor(Side::Home, PlayerId(6)));

        // Bench players are ignored.
        assert!(lineup.force_sub_out(Side::Home, &home, PlayerId(8)).is_empty());
    }

    #[test]
    fn test_short_handed_down_to_last_player() {
        let mut home = thin_team();
        let teams = SideMap::from_pair(home.clone(), thin_team());
        let mut lineup = LineupManager::new(&GameConfig::default(), &teams).unwrap();

        home.player_mut(PlayerId(1)).unwrap().set_injured(true);
        let events = lineup.force_sub_out(Side::Home, &home, PlayerId(1));
        assert!(matches!(
            events.as_slice(),
            [Event::ShortHanded {
                position: Position::Guard,
                on_floor: 1,
                ..
            }]
        ));
        assert_eq!(lineup.on_floor(Side::Home).len(), 4);

        // Below the guard minimum with nobody on the bench: still no error.
        home.player_mut(PlayerId(2)).unwrap().set_injured(true);
        let events = lineup.force_sub_out(Side::Home, &home, PlayerId(2));
        assert!(matches!(
            events.as_slice(),
            [Event::ShortHanded {
                position: Position::Guard,
                on_floor: 0,
                ..
            }]
        ));

        for id in [4, 5] {
            home.player_mut(PlayerId(id)).unwrap().set_injured(true);
            assert_eq!(lineup.force_sub_out(Side::Home, &home, PlayerId(id)).len(), 1);
        }
        assert_eq!(lineup.on_floor(Side::Home).as_slice(), &[PlayerId(7)]);

        home.player_mut(PlayerId(7)).unwrap().set_injured(true);
        assert!(lineup.force_sub_out(Side::Home, &home, PlayerId(7)).is_empty());
        assert_eq!(lineup.on_floor(Side::Home).as_slice(), &[PlayerId(7)]);
    }

    #[test]
    fn test_bench_fills_in_out_of_position() {
        let mut home = team(
            "Forwards",
            &[
                (1, Position::Guard),
                (2, Position::Guard),
                (4, Position::Forward),
                (5, Position::Forward),
                (7, Position::Center),
                (6, Position::Forward),
            ],
        );
        let teams = SideMap::from_pair(home.clone(), deep_team());
        let mut lineup = LineupManager::new(&GameConfig::default(), &teams).unwrap();

        home.player_mut(PlayerId(7)).unwrap().set_injured(true);
        let events = lineup.force_sub_out(Side::Home, &home, PlayerId(7));

        assert_eq!(
            events,
            vec![Event::Substitution {
                side: Side::Home,
                player_in: PlayerId(6),
                player_out: PlayerId(7),
            }]
        );
        assert_eq!(lineup.active_players(Side::Home, Position::Center), &[PlayerId(6)]);
        assert_eq!(lineup.on_floor(Side::Home).len(), 5);
    }

    #[test]
    fn test_bench_never_doubles_up_on_floor() {
        let mut home = team(
            "Forwards",
            &[
                (1, Position::Guard),
                (2, Position::Guard),
                (4, Position::Forward),
                (5, Position::Forward),
                (7, Position::Center),
                (6, Position::Forward),
            ],
        );
        let teams = SideMap::from_pair(home.clone(), deep_team());
        let mut lineup = LineupManager::new(&GameConfig::default(), &teams).unwrap();

        home.player_mut(PlayerId(7)).unwrap().set_injured(true);
        lineup.force_sub_out(Side::Home, &home, PlayerId(7));

        // Player 6 now plays center; a tired forward must not pull them over.
        home.player_mut(PlayerId(4)).unwrap().adjust_energy(-1.0).unwrap();
        lineup.mark_all_due();
        lineup.substitute_if_needed(Side::Home, &home);

        let floor = lineup.on_floor(Side::Home);
        assert_eq!(floor.len(), 5);
        assert_eq!(floor.iter().filter(|&&id| id == PlayerId(6)).count(), 1);
    }
}
