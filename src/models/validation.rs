//! Input validation failures.

use thiserror::Error;

use super::{FantasyTeamId, MatchId, PlayerId};

/// A record rejected at a component boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be non-negative, got {value}")]
    NegativeCount { field: &'static str, value: i64 },

    #[error("Field {field} is too large: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("Team {team_id} has more than one captain")]
    MultipleCaptains { team_id: FantasyTeamId },

    #[error("Team {team_id} has more than one vice-captain")]
    MultipleViceCaptains { team_id: FantasyTeamId },

    #[error("Player {player_id} cannot be both captain and vice-captain of team {team_id}")]
    CaptainIsViceCaptain {
        team_id: FantasyTeamId,
        player_id: PlayerId,
    },

    #[error("Player {player_id} appears more than once in team {team_id}")]
    DuplicatePlayer {
        team_id: FantasyTeamId,
        player_id: PlayerId,
    },

    #[error("Performance for player {player_id} in match {match_id} already exists")]
    DuplicatePerformance {
        match_id: MatchId,
        player_id: PlayerId,
    },
}
