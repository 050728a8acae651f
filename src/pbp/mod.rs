//! Events, play-by-play text and the scoring summary.

pub mod event;
pub mod logger;

pub use event::{Event, NameTable, ShotType};
pub use logger::{PlayByPlayEntry, PlayByPlayLogger, ScoringPlay};
