//! Team sides and per-side data storage.
//!
//! ## Side
//!
//! Every game has exactly two sides: `Home` and `Away`. The home side is
//! the one that receives the home-court multiplier.
//!
//! ## SideMap
//!
//! Per-side storage backed by a two-element array for O(1) access.
//! Supports iteration and indexing by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two teams in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// Both sides, home first.
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    /// Get the array index for this side (home = 0, away = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    /// Get the opposing side.
    ///
    /// ```
    /// use courtsim::core::Side;
    ///
    /// assert_eq!(Side::Home.other(), Side::Away);
    /// assert_eq!(Side::Away.other(), Side::Home);
    /// ```
    #[must_use]
    pub const fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "Home"),
            Side::Away => write!(f, "Away"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use courtsim::core::{Side, SideMap};
///
/// let mut fouls: SideMap<u8> = SideMap::with_value(0);
/// fouls[Side::Away] += 1;
///
/// assert_eq!(fouls[Side::Home], 0);
/// assert_eq!(fouls[Side::Away], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Home), factory(Side::Away)],
        }
    }

    /// Create a SideMap from explicit home and away values.
    pub fn from_pair(home: T, away: T) -> Self {
        Self { data: [home, away] }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SideMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Borrow both sides mutably at once, in `(first, second)` order.
    pub fn pair_mut(&mut self, first: Side) -> (&mut T, &mut T) {
        let [home, away] = &mut self.data;
        match first {
            Side::Home => (home, away),
            Side::Away => (away, home),
        }
    }

    /// Iterate over (Side, &T) pairs, home first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs, home first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::BOTH.into_iter().zip(self.data.iter_mut())
    }

    /// Transform each entry, keeping the side association.
    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> SideMap<U> {
        let [home, away] = self.data;
        SideMap {
            data: [f(Side::Home, home), f(Side::Away, away)],
        }
    }

    /// Consume the map, returning `[home, away]`.
    pub fn into_inner(self) -> [T; 2] {
        self.data
    }
}

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
