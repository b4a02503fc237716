//! Player match performance model.

use serde::{Deserialize, Serialize};

use super::{Fingerprint, MatchId, PerformanceId, PlayerId, ValidationError};

/// One player's statistical line in one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub id: PerformanceId,
    pub match_id: MatchId,
    pub player_id: PlayerId,

    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub balls_faced: u32,
    #[serde(default)]
    pub fours: u32,
    #[serde(default)]
    pub sixes: u32,
    #[serde(default)]
    pub wickets: u32,
    #[serde(default)]
    pub balls_bowled: u32,
    #[serde(default)]
    pub catches: u32,
    #[serde(default)]
    pub stumpings: u32,
    #[serde(default)]
    pub run_outs: u32,

    /// Only present when ball-by-ball data was available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maiden_overs: Option<u32>,

    /// Stored fantasy points value
    #[serde(default)]
    pub fantasy_points: i64,

    /// Rule set `fantasy_points` was computed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_fingerprint: Option<Fingerprint>,
}

impl Performance {
    /// Create an empty stat line for a player in a match.
    pub fn new(id: PerformanceId, match_id: MatchId, player_id: PlayerId) -> Self {
        Self {
            id,
            match_id,
            player_id,
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            wickets: 0,
            balls_bowled: 0,
            catches: 0,
            stumpings: 0,
            run_outs: 0,
            maiden_overs: None,
            fantasy_points: 0,
            rules_fingerprint: None,
        }
    }

    /// Builder method to set batting figures.
    pub fn with_batting(mut self, runs: u32, balls_faced: u32, fours: u32, sixes: u32) -> Self {
        self.runs = runs;
        self.balls_faced = balls_faced;
        self.fours = fours;
        self.sixes = sixes;
        self
    }

    /// Builder method to set bowling figures.
    pub fn with_bowling(mut self, wickets: u32, balls_bowled: u32) -> Self {
        self.wickets = wickets;
        self.balls_bowled = balls_bowled;
        self
    }

    /// Builder method to set fielding figures.
    pub fn with_fielding(mut self, catches: u32, stumpings: u32, run_outs: u32) -> Self {
        self.catches = catches;
        self.stumpings = stumpings;
        self.run_outs = run_outs;
        self
    }

    /// Builder method to set the stored points value.
    pub fn with_points(mut self, fantasy_points: i64, fingerprint: Option<Fingerprint>) -> Self {
        self.fantasy_points = fantasy_points;
        self.rules_fingerprint = fingerprint;
        self
    }

    /// Dismissed without scoring after facing at least one ball.
    pub fn is_duck(&self) -> bool {
        self.runs == 0 && self.balls_faced > 0
    }
}

/// Unvalidated performance as submitted by a client.
///
/// Counts default to zero when absent; IDs are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPerformance {
    pub match_id: Option<i64>,
    pub player_id: Option<i64>,
    #[serde(default)]
    pub runs: i64,
    #[serde(default)]
    pub balls_faced: i64,
    #[serde(default)]
    pub fours: i64,
    #[serde(default)]
    pub sixes: i64,
    #[serde(default)]
    pub wickets: i64,
    #[serde(default)]
    pub balls_bowled: i64,
    #[serde(default)]
    pub catches: i64,
    #[serde(default)]
    pub stumpings: i64,
    #[serde(default)]
    pub run_outs: i64,
    #[serde(default)]
    pub maiden_overs: Option<i64>,
}

fn count(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeCount { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}

fn required(field: &'static str, value: Option<i64>) -> Result<u32, ValidationError> {
    value
        .ok_or(ValidationError::MissingField(field))
        .and_then(|v| count(field, v))
}

impl NewPerformance {
    /// Check every field and produce a stat line with ID 0, unscored.
    pub fn validate(&self) -> Result<Performance, ValidationError> {
        let match_id = required("match_id", self.match_id)?;
        let player_id = required("player_id", self.player_id)?;

        let mut perf = Performance::new(0, match_id, player_id)
            .with_batting(
                count("runs", self.runs)?,
                count("balls_faced", self.balls_faced)?,
                count("fours", self.fours)?,
                count("sixes", self.sixes)?,
            )
            .with_bowling(
                count("wickets", self.wickets)?,
                count("balls_bowled", self.balls_bowled)?,
            )
            .with_fielding(
                count("catches", self.catches)?,
                count("stumpings", self.stumpings)?,
                count("run_outs", self.run_outs)?,
            );
        perf.maiden_overs = self
            .maiden_overs
            .map(|v| count("maiden_overs", v))
            .transpose()?;

        Ok(perf)
    }
}
