//! Core engine types: sides, RNG, configuration.
//!
//! Nothing in here knows about plays or players' stats. The rest of the
//! engine is configured through `GameConfig` rather than constants.

pub mod config;
pub mod rng;
pub mod side;

pub use config::{FatigueConfig, GameConfig, LineupSlot, OutcomeThresholds};
pub use rng::{GameRng, GameRngState};
pub use side::{Side, SideMap};
