//! Per-game team state and depth charts.
//!
//! `TeamGameSim` owns its roster for the length of a game. The roster is
//! the single arena of players; everything else (depth chart, active
//! lineup, events) refers to players by their stable `PlayerId`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::player::{PlayerGameSim, PlayerId, Position};
use super::ratings::{CompositeRating, CompositeRatings, RatingView};
use super::synergy::Synergy;
use crate::core::FatigueConfig;
use crate::error::{Result, SimError};
use crate::stats::StatLine;

/// Substitution priority per position.
///
/// Each position maps to an ordered list of player IDs; earlier entries
/// start and win ties when substitutes are ranked.
///
/// ```
/// use courtsim::roster::{DepthChart, PlayerId, Position};
///
/// let depth = DepthChart::new()
///     .with(Position::Center, vec![PlayerId(5), PlayerId(12)]);
///
/// assert_eq!(depth.get(Position::Center), Some(&[PlayerId(5), PlayerId(12)][..]));
/// assert_eq!(depth.get(Position::Guard), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChart {
    entries: FxHashMap<Position, Vec<PlayerId>>,
}

impl DepthChart {
    /// Create an empty depth chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth chart listing every player at their roster position, in roster order.
    #[must_use]
    pub fn from_roster(players: &[PlayerGameSim]) -> Self {
        let mut depth = Self::new();
        for player in players {
            depth.entries.entry(player.position).or_default().push(player.id);
        }
        depth
    }

    /// Set the order for a position (builder pattern).
    #[must_use]
    pub fn with(mut self, position: Position, players: Vec<PlayerId>) -> Self {
        self.set(position, players);
        self
    }

    /// Set the order for a position.
    pub fn set(&mut self, position: Position, players: Vec<PlayerId>) {
        self.entries.insert(position, players);
    }

    /// Get the order for a position, if the chart has one.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&[PlayerId]> {
        self.entries.get(&position).map(Vec::as_slice)
    }

    /// Rank of a player at a position (0 = first choice).
    #[must_use]
    pub fn rank(&self, position: Position, player: PlayerId) -> Option<usize> {
        self.get(position)?.iter().position(|&p| p == player)
    }

    /// Iterate over every listed player ID (positions in `Position::ALL` order).
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        Position::ALL
            .into_iter()
            .filter_map(move |pos| self.get(pos))
            .flat_map(|ids| ids.iter().copied())
    }
}

/// A team's state for one game.
#[derive(Clone, Debug)]
pub struct TeamGameSim {
    pub id: u32,
    pub name: String,
    players: Vec<PlayerGameSim>,
    depth: DepthChart,
    index: FxHashMap<PlayerId, usize>,
    composite: CompositeRatings,
    synergy: Synergy,
    stats: StatLine,
    pts_by_period: Vec<u32>,
}

impl TeamGameSim {
    /// Create a team from a roster and depth chart.
    ///
    /// Fails if the roster is empty, has duplicate IDs, or the depth chart
    /// names a player who is not on the roster.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        players: Vec<PlayerGameSim>,
        depth: DepthChart,
    ) -> Result<Self> {
        let name = name.into();
        if players.is_empty() {
            return Err(SimError::EmptyRoster { team: name });
        }

        let mut index = FxHashMap::default();
        for (i, player) in players.iter().enumerate() {
            if index.insert(player.id, i).is_some() {
                return Err(SimError::InvalidConfig(format!(
                    "team {name} lists {} twice",
                    player.id
                )));
            }
        }

        let team = Self {
            id,
            name,
            players,
            depth,
            index,
            composite: CompositeRatings::default(),
            synergy: Synergy::default(),
            stats: StatLine::new(),
            pts_by_period: Vec::new(),
        };
        team.check_depth_chart(&team.depth)?;
        Ok(team)
    }

    /// Create a team whose depth chart follows roster order per position.
    pub fn with_roster_depth(
        id: u32,
        name: impl Into<String>,
        players: Vec<PlayerGameSim>,
    ) -> Result<Self> {
        let depth = DepthChart::from_roster(&players);
        Self::new(id, name, players, depth)
    }

    fn check_depth_chart(&self, depth: &DepthChart) -> Result<()> {
        match depth.player_ids().find(|id| !self.index.contains_key(id)) {
            Some(player) => Err(SimError::UnknownPlayer {
                team: self.name.clone(),
                player,
            }),
            None => Ok(()),
        }
    }

    // === Roster ===

    /// Players in roster order.
    #[must_use]
    pub fn players(&self) -> &[PlayerGameSim] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerGameSim> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerGameSim> {
        self.index.get(&id).map(|&i| &mut self.players[i])
    }

    /// Look up a player, reporting an unknown ID as an error.
    pub fn try_player(&self, id: PlayerId) -> Result<&PlayerGameSim> {
        self.player(id).ok_or_else(|| SimError::UnknownPlayer {
            team: self.name.clone(),
            player: id,
        })
    }

    /// Mutable variant of [`TeamGameSim::try_player`].
    pub fn try_player_mut(&mut self, id: PlayerId) -> Result<&mut PlayerGameSim> {
        let name = &self.name;
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.players[i]),
            None => Err(SimError::UnknownPlayer {
                team: name.clone(),
                player: id,
            }),
        }
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut PlayerGameSim> {
        self.players.iter_mut()
    }

    // === Depth chart ===

    #[must_use]
    pub fn depth_chart(&self) -> &DepthChart {
        &self.depth
    }

    /// Replace one position's depth order.
    pub fn set_depth(&mut self, position: Position, players: Vec<PlayerId>) -> Result<()> {
        let mut depth = self.depth.clone();
        depth.set(position, players);
        self.check_depth_chart(&depth)?;
        self.depth = depth;
        Ok(())
    }

    // === Ratings ===

    /// Team composite ratings for the current lineup.
    #[must_use]
    pub fn composite(&self) -> &CompositeRatings {
        &self.composite
    }

    /// Synergy of the current lineup.
    #[must_use]
    pub fn synergy(&self) -> Synergy {
        self.synergy
    }

    /// Recompute team composites and synergy from the players on the floor.
    ///
    /// Each team rating is the mean of the on-floor players' ratings, each
    /// scaled by that player's fatigue.
    pub(crate) fn update_composite(&mut self, on_floor: &[PlayerId], fatigue: &FatigueConfig) {
        let lineup: Vec<&PlayerGameSim> = on_floor.iter().filter_map(|&id| self.player(id)).collect();
        if lineup.is_empty() {
            self.composite = CompositeRatings::default();
            self.synergy = Synergy::default();
            return;
        }

        let n = lineup.len() as f64;
        let composite = CompositeRatings::from_fn(|rating: CompositeRating| {
            lineup
                .iter()
                .map(|p| p.rating(rating) * fatigue.factor(p.energy()))
                .sum::<f64>()
                / n
        });
        let synergy = Synergy::from_lineup(lineup.iter().copied());

        self.composite = composite;
        self.synergy = synergy;
    }

    /// Scale every player's composite ratings (home-court advantage).
    pub(crate) fn scale_ratings(&mut self, factor: f64) {
        for player in &mut self.players {
            player.ratings.scale(factor);
        }
    }

    // === Stats ===

    #[must_use]
    pub fn stats(&self) -> &StatLine {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut StatLine {
        &mut self.stats
    }

    /// Current score.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.stats.points()
    }

    /// Points scored in each period played so far.
    #[must_use]
    pub fn pts_by_period(&self) -> &[u32] {
        &self.pts_by_period
    }

    /// Open a new (zero) entry in the points-by-period list.
    pub(crate) fn start_period(&mut self) {
        self.pts_by_period.push(0);
    }

    /// Credit points to a 1-based period.
    pub(crate) fn add_period_points(&mut self, period: u8, points: u32) {
        let idx = usize::from(period.max(1)) - 1;
        if self.pts_by_period.len() <= idx {
            self.pts_by_period.resize(idx + 1, 0);
        }
        self.pts_by_period[idx] += points;
    }

    pub(crate) fn into_parts(self) -> (u32, String, Vec<PlayerGameSim>, StatLine, Vec<u32>) {
        (self.id, self.name, self.players, self.stats, self.pts_by_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PlayerGameSim> {
        vec![
            PlayerGameSim::new(PlayerId(1), "G1", Position::Guard),
            PlayerGameSim::new(PlayerId(2), "F1", Position::Forward),
            PlayerGameSim::new(PlayerId(3), "C1", Position::Center),
            PlayerGameSim::new(PlayerId(4), "G2", Position::Guard),
        ]
    }

    #[test]
    fn test_depth_from_roster() {
        let depth = DepthChart::from_roster(&roster());

        assert_eq!(depth.get(Position::Guard), Some(&[PlayerId(1), PlayerId(4)][..]));
        assert_eq!(depth.get(Position::Center), Some(&[PlayerId(3)][..]));
        assert_eq!(depth.rank(Position::Guard, PlayerId(4)), Some(1));
        assert_eq!(depth.rank(Position::Guard, PlayerId(3)), None);
        assert_eq!(depth.player_ids().count(), 4);
    }

    #[test]
    fn test_team_lookup() {
        let team = TeamGameSim::with_roster_depth(1, "Test", roster()).unwrap();

        assert_eq!(team.player(PlayerId(3)).map(|p| p.name.as_str()), Some("C1"));
        assert!(team.player(PlayerId(99)).is_none());
        assert!(matches!(
            team.try_player(PlayerId(99)),
            Err(SimError::UnknownPlayer { .. })
        ));
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(matches!(
            TeamGameSim::with_roster_depth(1, "Empty", vec![]),
            Err(SimError::EmptyRoster { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut players = roster();
        players.push(PlayerGameSim::new(PlayerId(1), "Dup", Position::Forward));
        assert!(matches!(
            TeamGameSim::with_roster_depth(1, "Dup", players),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_depth_player_rejected() {
        let depth = DepthChart::new().with(Position::Center, vec![PlayerId(42)]);
        assert!(matches!(
            TeamGameSim::new(1, "Bad", roster(), depth),
            Err(SimError::UnknownPlayer { player: PlayerId(42), .. })
        ));

        let mut team = TeamGameSim::with_roster_depth(1, "Ok", roster()).unwrap();
        assert!(team.set_depth(Position::Center, vec![PlayerId(42)]).is_err());
        assert_eq!(team.depth_chart().get(Position::Center), Some(&[PlayerId(3)][..]));
    }

    #[test]
    fn test_update_composite_averages_with_fatigue() {
        let mut players = roster();
        players[0].ratings = CompositeRatings::uniform(0.8);
        players[1].ratings = CompositeRatings::uniform(0.4);
        players[1].adjust_energy(-0.45).unwrap();
        let mut team = TeamGameSim::with_roster_depth(1, "Test", players).unwrap();

        team.update_composite(&[PlayerId(1), PlayerId(2)], &FatigueConfig::default());

        // (0.8 * 1.0 + 0.4 * 0.6) / 2
        let expected = (0.8 + 0.4 * 0.6) / 2.0;
        assert!((team.composite()[CompositeRating::Passing] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_period_points() {
        let mut team = TeamGameSim::with_roster_depth(1, "Test", roster()).unwrap();
        team.start_period();
        team.add_period_points(1, 5);
        team.add_period_points(3, 2);

        assert_eq!(team.pts_by_period(), &[5, 0, 2]);
    }
}
