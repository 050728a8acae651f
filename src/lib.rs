//! # courtsim
//!
//! A deterministic single-game basketball simulation engine.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Every random draw comes from one seeded `GameRng`.
//!    The same config, rosters and seed always produce the same result,
//!    with or without play-by-play.
//!
//! 2. **Configuration Over Convention**: Period structure, lineup slots,
//!    fatigue and every outcome probability live in `GameConfig`.
//!
//! 3. **Typed Events**: Plays are a closed `Event` enum carrying player
//!    ids. Text is only rendered when play-by-play is requested.
//!
//! ## Modules
//!
//! - `core`: Sides, RNG, configuration
//! - `roster`: Players, ratings, depth charts, teams
//! - `stats`: Stat lines and the stat recorder
//! - `pbp`: Events and the play-by-play log
//! - `sim`: Clock, lineups, play resolution, the game loop
//! - `result`: Box scores and the finished game
//!
//! ## Example
//!
//! ```
//! use courtsim::{simulate_game, GameConfig, GameOptions, TeamBuilder};
//!
//! let home = TeamBuilder::new(1, "Hawks").build(7).unwrap();
//! let away = TeamBuilder::new(2, "Owls").build(8).unwrap();
//! let options = GameOptions::default().with_play_by_play(true);
//!
//! let result = simulate_game(&GameConfig::default(), &home, &away, options, 42).unwrap();
//! assert!(result.play_by_play.is_some());
//! ```

pub mod core;
pub mod error;
pub mod pbp;
pub mod result;
pub mod roster;
pub mod sim;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    FatigueConfig, GameConfig, GameRng, GameRngState, LineupSlot, OutcomeThresholds, Side,
    SideMap,
};

pub use crate::error::{Result, SimError};

pub use crate::roster::{
    CompositeRating, CompositeRatings, DepthChart, PlayerGameSim, PlayerId, Position,
    RatingView, Skill, SkillSet, TeamBuilder, TeamGameSim,
};

pub use crate::stats::{Stat, StatLine};

pub use crate::pbp::{Event, PlayByPlayEntry, ScoringPlay, ShotType};

pub use crate::sim::{simulate_game, GameOptions, GameSim, GameWinner};

pub use crate::result::{GameResult, PlayerBoxScore, TeamBoxScore};
