//! Player and real-world team models.

use serde::{Deserialize, Serialize};

use super::{IplTeamId, PlayerId};

/// A player's on-field role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    AllRounder,
    WicketKeeper,
}

impl PlayerRole {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerRole::Batsman => "Batsman",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::AllRounder => "All-rounder",
            PlayerRole::WicketKeeper => "Wicket-keeper",
        }
    }
}

impl std::fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A franchise in the real competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IplTeam {
    pub id: IplTeamId,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl IplTeam {
    pub fn new(id: IplTeamId, name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            short_name: short_name.into(),
            logo_url: None,
        }
    }
}

/// A player with career statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub ipl_team_id: IplTeamId,
    pub role: PlayerRole,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub batting_avg: Option<f64>,
    #[serde(default)]
    pub bowling_avg: Option<f64>,
    #[serde(default)]
    pub strike_rate: Option<f64>,
    #[serde(default)]
    pub economy: Option<f64>,
    #[serde(default)]
    pub total_runs: u32,
    #[serde(default)]
    pub total_wickets: u32,
    #[serde(default)]
    pub total_matches: u32,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        ipl_team_id: IplTeamId,
        role: PlayerRole,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ipl_team_id,
            role,
            image_url: None,
            batting_avg: None,
            bowling_avg: None,
            strike_rate: None,
            economy: None,
            total_runs: 0,
            total_wickets: 0,
            total_matches: 0,
        }
    }

    /// Case-insensitive substring match on the name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&PlayerRole::WicketKeeper).unwrap();
        assert_eq!(json, "\"wicket_keeper\"");
        let role: PlayerRole = serde_json::from_str("\"all_rounder\"").unwrap();
        assert_eq!(role, PlayerRole::AllRounder);
    }

    #[test]
    fn test_role_label() {
        assert_eq!(PlayerRole::AllRounder.to_string(), "All-rounder");
    }

    #[test]
    fn test_name_matches() {
        let player = Player::new(1, "Virat Kohli", 3, PlayerRole::Batsman);
        assert!(player.name_matches("kohli"));
        assert!(player.name_matches("VIRAT"));
        assert!(!player.name_matches("dhoni"));
    }
}
