//! Simulation errors.
//!
//! The engine assumes well-formed input and is strict about it: a roster
//! that cannot field a required position, or a depth chart that names a
//! player the roster does not have, aborts the game instead of being
//! patched over. A game either completes or returns one of these.

use thiserror::Error;

use crate::roster::{PlayerId, Position};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("team {team} cannot field {position:?}: depth chart has too few available players")]
    MissingPosition { team: String, position: Position },

    #[error("team {team} references unknown player {player}")]
    UnknownPlayer { team: String, player: PlayerId },

    #[error("team {team} has an empty roster")]
    EmptyRoster { team: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl SimError {
    /// Whether the error comes from the caller's input rather than the engine.
    pub fn is_configuration(&self) -> bool {
        match self {
            SimError::MissingPosition { .. }
            | SimError::UnknownPlayer { .. }
            | SimError::EmptyRoster { .. }
            | SimError::InvalidConfig(_) => true,
            SimError::Invariant(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SimError::MissingPosition {
            team: "Bulls".into(),
            position: Position::Center,
        };
        assert_eq!(
            err.to_string(),
            "team Bulls cannot field Center: depth chart has too few available players"
        );
        assert!(err.is_configuration());
        assert!(!SimError::Invariant("clock".into()).is_configuration());
    }
}
