//! Box score stat keys and stat lines.
//!
//! `Stat` is the closed set of counters a game produces. `StatLine` holds
//! one value per key for a player or a team. Team lines carry the same
//! keys as player lines, plus team-only keys such as possessions.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A box score counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// Minutes played.
    Min,
    /// Games started.
    Gs,
    Fg,
    Fga,
    Tp,
    Tpa,
    Ft,
    Fta,
    FgAtRim,
    FgaAtRim,
    FgLowPost,
    FgaLowPost,
    FgMidRange,
    FgaMidRange,
    Orb,
    Drb,
    Ast,
    Tov,
    Stl,
    Blk,
    /// Shot attempts that were blocked.
    Ba,
    Pf,
    Pts,
    /// Possessions (team only).
    Poss,
}

impl Stat {
    /// Number of stat keys.
    pub const COUNT: usize = 24;

    /// Every stat key, in declaration order.
    pub const ALL: [Stat; Self::COUNT] = [
        Stat::Min,
        Stat::Gs,
        Stat::Fg,
        Stat::Fga,
        Stat::Tp,
        Stat::Tpa,
        Stat::Ft,
        Stat::Fta,
        Stat::FgAtRim,
        Stat::FgaAtRim,
        Stat::FgLowPost,
        Stat::FgaLowPost,
        Stat::FgMidRange,
        Stat::FgaMidRange,
        Stat::Orb,
        Stat::Drb,
        Stat::Ast,
        Stat::Tov,
        Stat::Stl,
        Stat::Blk,
        Stat::Ba,
        Stat::Pf,
        Stat::Pts,
        Stat::Poss,
    ];

    /// Position of this key in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Stat::Min => "min",
            Stat::Gs => "gs",
            Stat::Fg => "fg",
            Stat::Fga => "fga",
            Stat::Tp => "tp",
            Stat::Tpa => "tpa",
            Stat::Ft => "ft",
            Stat::Fta => "fta",
            Stat::FgAtRim => "fgAtRim",
            Stat::FgaAtRim => "fgaAtRim",
            Stat::FgLowPost => "fgLowPost",
            Stat::FgaLowPost => "fgaLowPost",
            Stat::FgMidRange => "fgMidRange",
            Stat::FgaMidRange => "fgaMidRange",
            Stat::Orb => "orb",
            Stat::Drb => "drb",
            Stat::Ast => "ast",
            Stat::Tov => "tov",
            Stat::Stl => "stl",
            Stat::Blk => "blk",
            Stat::Ba => "ba",
            Stat::Pf => "pf",
            Stat::Pts => "pts",
            Stat::Poss => "poss",
        }
    }

    /// Kept on the team line only; never attributed to a player.
    #[must_use]
    pub const fn is_team_only(self) -> bool {
        matches!(self, Stat::Poss)
    }

    /// Points credited per unit of this stat, if it scores.
    ///
    /// A made three is recorded as `Fg` (2) plus `Tp` (1).
    #[must_use]
    pub const fn points_value(self) -> Option<u32> {
        match self {
            Stat::Fg => Some(2),
            Stat::Tp | Stat::Ft => Some(1),
            _ => None,
        }
    }

    /// Maintained from scoring stats; cannot be recorded directly.
    #[must_use]
    pub const fn is_derived(self) -> bool {
        matches!(self, Stat::Pts)
    }

    /// Whether changes are forwarded to the play-by-play stat stream.
    ///
    /// Minutes tick every possession and are left out.
    #[must_use]
    pub const fn is_logged(self) -> bool {
        !matches!(self, Stat::Min)
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per `Stat`.
///
/// Values only ever grow during a game; the only mutator is crate-private.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    values: [f64; Stat::COUNT],
}

impl Default for StatLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatLine {
    /// A line with every counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0.0; Stat::COUNT],
        }
    }

    /// Get a counter value.
    #[must_use]
    pub fn get(&self, stat: Stat) -> f64 {
        self.values[stat.index()]
    }

    /// Points as an integer.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.get(Stat::Pts).round() as u32
    }

    /// Iterate over (stat, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::ALL
            .into_iter()
            .map(move |stat| (stat, self.values[stat.index()]))
    }

    pub(crate) fn add(&mut self, stat: Stat, amount: f64) {
        self.values[stat.index()] += amount;
    }
}

impl Index<Stat> for StatLine {
    type Output = f64;

    fn index(&self, stat: Stat) -> &Self::Output {
        &self.values[stat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_indices_match_all() {
        for (i, stat) in Stat::ALL.iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
    }

    #[test]
    fn test_scoring_values() {
        assert_eq!(Stat::Fg.points_value(), Some(2));
        assert_eq!(Stat::Tp.points_value(), Some(1));
        assert_eq!(Stat::Ft.points_value(), Some(1));
        assert_eq!(Stat::Fga.points_value(), None);
        assert_eq!(Stat::Pts.points_value(), None);
    }

    #[test]
    fn test_flags() {
        assert!(Stat::Poss.is_team_only());
        assert!(!Stat::Ast.is_team_only());
        assert!(Stat::Pts.is_derived());
        assert!(!Stat::Min.is_logged());
        assert!(Stat::Orb.is_logged());
    }

    #[test]
    fn test_stat_line_add() {
        let mut line = StatLine::new();
        line.add(Stat::Pts, 2.0);
        line.add(Stat::Pts, 3.0);
        line.add(Stat::Min, 0.25);

        assert_eq!(line[Stat::Pts], 5.0);
        assert_eq!(line.points(), 5);
        assert_eq!(line.get(Stat::Min), 0.25);
        assert_eq!(line.get(Stat::Ast), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Stat::FgaAtRim.to_string(), "fgaAtRim");
    }

    #[test]
    fn test_serialization() {
        let mut line = StatLine::new();
        line.add(Stat::Drb, 7.0);
        let json = serde_json::to_string(&line).unwrap();
        let deserialized: StatLine = serde_json::from_str(&json).unwrap();
        assert_eq!(line, deserialized);
    }
}
