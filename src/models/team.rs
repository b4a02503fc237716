//! Fantasy team models.

use serde::{Deserialize, Serialize};

use super::{EntryId, FantasyTeamId, LeagueId, PlayerId, UserId};

/// A manager's fantasy team and its standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FantasyTeam {
    pub id: FantasyTeamId,
    pub user_id: UserId,

    #[serde(default)]
    pub league_id: Option<LeagueId>,

    pub name: String,

    /// Season total; `None` means the aggregate was never computed
    #[serde(default)]
    pub total_points: Option<i64>,

    #[serde(default)]
    pub weekly_points: Option<i64>,

    /// Rank from the last standings refresh
    #[serde(default)]
    pub rank: Option<u32>,

    /// Rank from the refresh before that
    #[serde(default)]
    pub previous_rank: Option<u32>,
}

impl FantasyTeam {
    /// Create a team with no computed standing.
    pub fn new(id: FantasyTeamId, user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            league_id: None,
            name: name.into(),
            total_points: None,
            weekly_points: None,
            rank: None,
            previous_rank: None,
        }
    }

    /// Builder method to set the league.
    pub fn with_league(mut self, league_id: LeagueId) -> Self {
        self.league_id = Some(league_id);
        self
    }

    /// Builder method to set point totals.
    pub fn with_points(mut self, total: i64, weekly: i64) -> Self {
        self.total_points = Some(total);
        self.weekly_points = Some(weekly);
        self
    }

    /// Builder method to set stored ranks.
    pub fn with_ranks(mut self, rank: Option<u32>, previous_rank: Option<u32>) -> Self {
        self.rank = rank;
        self.previous_rank = previous_rank;
        self
    }
}

/// A player picked into a fantasy team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FantasyTeamEntry {
    pub id: EntryId,
    pub fantasy_team_id: FantasyTeamId,
    pub player_id: PlayerId,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

impl FantasyTeamEntry {
    pub fn new(id: EntryId, fantasy_team_id: FantasyTeamId, player_id: PlayerId) -> Self {
        Self {
            id,
            fantasy_team_id,
            player_id,
            is_captain: false,
            is_vice_captain: false,
        }
    }

    pub fn captain(mut self) -> Self {
        self.is_captain = true;
        self
    }

    pub fn vice_captain(mut self) -> Self {
        self.is_vice_captain = true;
        self
    }
}

/// Values written back by a standings refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub total_points: i64,
    pub weekly_points: i64,
    pub rank: u32,
    pub previous_rank: Option<u32>,
}

impl FantasyTeam {
    /// Apply a refreshed standing.
    pub fn apply_standing(&mut self, standing: TeamStanding) {
        self.total_points = Some(standing.total_points);
        self.weekly_points = Some(standing.weekly_points);
        self.rank = Some(standing.rank);
        self.previous_rank = standing.previous_rank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_builder() {
        let team = FantasyTeam::new(1, 1, "FantasyKing2025")
            .with_league(2)
            .with_points(4289, 186)
            .with_ranks(Some(1), Some(3));

        assert_eq!(team.league_id, Some(2));
        assert_eq!(team.total_points, Some(4289));
        assert_eq!(team.weekly_points, Some(186));
        assert_eq!(team.previous_rank, Some(3));
    }

    #[test]
    fn test_team_missing_points_deserializes_as_none() {
        let team: FantasyTeam =
            serde_json::from_str(r#"{"id": 4, "user_id": 4, "name": "Mumbai Mavericks"}"#)
                .unwrap();
        assert_eq!(team.total_points, None);
        assert_eq!(team.rank, None);
    }

    #[test]
    fn test_apply_standing() {
        let mut team = FantasyTeam::new(1, 1, "Team").with_ranks(Some(2), Some(5));
        team.apply_standing(TeamStanding {
            total_points: 300,
            weekly_points: 40,
            rank: 1,
            previous_rank: Some(2),
        });
        assert_eq!(team.total_points, Some(300));
        assert_eq!(team.rank, Some(1));
        assert_eq!(team.previous_rank, Some(2));
    }

    #[test]
    fn test_entry_flags() {
        let entry = FantasyTeamEntry::new(1, 1, 9).captain();
        assert!(entry.is_captain);
        assert!(!entry.is_vice_captain);
    }
}
