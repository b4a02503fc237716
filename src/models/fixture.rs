//! Match (fixture) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{IplTeamId, MatchId};

/// A scheduled or completed match between two franchises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team1_id: IplTeamId,
    pub team2_id: IplTeamId,
    pub date: DateTime<Utc>,
    pub venue: String,

    /// Score line, e.g. "204/5 (20)"
    #[serde(default)]
    pub team1_score: Option<String>,
    #[serde(default)]
    pub team2_score: Option<String>,

    #[serde(default)]
    pub winner_id: Option<IplTeamId>,

    #[serde(default)]
    pub is_completed: bool,

    /// Free-form label such as "High Scoring" or "Thriller"
    #[serde(default)]
    pub match_type: Option<String>,
}

impl Match {
    pub fn new(
        id: MatchId,
        team1_id: IplTeamId,
        team2_id: IplTeamId,
        date: DateTime<Utc>,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            id,
            team1_id,
            team2_id,
            date,
            venue: venue.into(),
            team1_score: None,
            team2_score: None,
            winner_id: None,
            is_completed: false,
            match_type: None,
        }
    }

    /// Builder method to record a result.
    pub fn completed(
        mut self,
        team1_score: impl Into<String>,
        team2_score: impl Into<String>,
        winner_id: Option<IplTeamId>,
    ) -> Self {
        self.team1_score = Some(team1_score.into());
        self.team2_score = Some(team2_score.into());
        self.winner_id = winner_id;
        self.is_completed = true;
        self
    }

    pub fn involves(&self, team_id: IplTeamId) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }
}
