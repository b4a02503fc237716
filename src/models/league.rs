//! Leagues, their points systems, and managers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LeagueId, PointsRule, PointsSystemId, UserId};

/// A fantasy team manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub email: String,
    pub team_name: String,
}

/// A competition grouping fantasy teams under one points system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_max_teams")]
    pub max_teams: u32,
    #[serde(default = "default_max_players")]
    pub max_players_per_team: u32,
}

fn default_true() -> bool {
    true
}

fn default_max_teams() -> u32 {
    10
}

fn default_max_players() -> u32 {
    15
}

impl League {
    pub fn new(id: LeagueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            start_date: None,
            end_date: None,
            is_active: true,
            max_teams: default_max_teams(),
            max_players_per_team: default_max_players(),
        }
    }
}

/// The rule set a league scores under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsSystem {
    pub id: PointsSystemId,
    pub league_id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rules_config: PointsRule,
}
