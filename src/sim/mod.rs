//! The simulation: clock, lineups, play resolution and the game loop.
//!
//! - `ClockScheduler`: period clock and overtime
//! - `LineupManager`: who is on the floor and when they rotate
//! - `EventSelector`: resolves a possession into events
//! - `GameSim`: drives a whole game and builds the `GameResult`

pub mod clock;
pub mod clutch;
pub mod game;
pub mod lineup;
pub mod selector;

pub use clock::{ClockScheduler, ClockTick};
pub use clutch::{find_game_winner, GameWinner};
pub use game::{simulate_game, GameOptions, GameSim};
pub use lineup::{LineupManager, OnFloor};
pub use selector::{pick_player, EventSelector, PossessionContext, PossessionResult};
