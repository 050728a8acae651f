//! Box score counters and the recorder that updates them.

pub mod line;
pub mod recorder;

pub use line::{Stat, StatLine};
pub use recorder::StatRecorder;
