//! League data storage.
//!
//! One storage contract, [`LeagueStore`], with swappable backends:
//! - [`MemoryStore`]: in-process tables, for tests and ephemeral servers
//! - [`JsonlStore`]: normalized JSONL files under the data directory
//!
//! Derived queries (search, recent/upcoming matches, top performers) and
//! write-side invariants live on the trait as provided methods so every
//! backend shares them.

mod audit;
mod jsonl;
mod memory;

pub use audit::*;
pub use jsonl::*;
pub use memory::*;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::calculate::validate_entries;
use crate::models::{
    next_id, FantasyTeam, FantasyTeamEntry, FantasyTeamId, IplTeam, IplTeamId, League, LeagueId,
    Match, MatchId, Performance, Player, PlayerId, PointsSystem, TeamStanding, User, UserId,
    ValidationError,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No {entity} IDs left to assign")]
    IdsExhausted { entity: &'static str },

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Assign the next free ID for `entity`.
pub(crate) fn assign_id<I>(entity: &'static str, ids: I) -> Result<u32, StorageError>
where
    I: IntoIterator<Item = u32>,
{
    next_id(ids).ok_or(StorageError::IdsExhausted { entity })
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Every table at once, for loading and seeding backends.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub leagues: Vec<League>,
    pub points_systems: Vec<PointsSystem>,
    pub ipl_teams: Vec<IplTeam>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub performances: Vec<Performance>,
    pub fantasy_teams: Vec<FantasyTeam>,
    pub team_entries: Vec<FantasyTeamEntry>,
}

/// Storage contract shared by all backends.
#[async_trait]
pub trait LeagueStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;
    async fn list_leagues(&self) -> Result<Vec<League>, StorageError>;
    async fn list_points_systems(&self) -> Result<Vec<PointsSystem>, StorageError>;
    async fn list_ipl_teams(&self) -> Result<Vec<IplTeam>, StorageError>;
    async fn list_players(&self) -> Result<Vec<Player>, StorageError>;
    async fn list_matches(&self) -> Result<Vec<Match>, StorageError>;
    async fn list_performances(&self) -> Result<Vec<Performance>, StorageError>;
    async fn list_fantasy_teams(&self) -> Result<Vec<FantasyTeam>, StorageError>;
    async fn team_entries(
        &self,
        team_id: FantasyTeamId,
    ) -> Result<Vec<FantasyTeamEntry>, StorageError>;

    /// Persist a performance, assigning its ID.
    async fn insert_performance(
        &self,
        performance: Performance,
    ) -> Result<Performance, StorageError>;

    /// Persist an entry, assigning its ID.
    async fn insert_team_entry(
        &self,
        entry: FantasyTeamEntry,
    ) -> Result<FantasyTeamEntry, StorageError>;

    /// Write back refreshed standings as one unit.
    ///
    /// Either every listed team is updated or none is. An unknown team ID
    /// fails the whole batch with `NotFound`.
    async fn update_team_standings(
        &self,
        standings: &[(FantasyTeamId, TeamStanding)],
    ) -> Result<Vec<FantasyTeam>, StorageError>;

    /// Remove a player from a team. Returns whether an entry was removed.
    async fn remove_team_entry(
        &self,
        team_id: FantasyTeamId,
        player_id: PlayerId,
    ) -> Result<bool, StorageError>;

    /// Write back one refreshed standing.
    async fn update_team_standing(
        &self,
        team_id: FantasyTeamId,
        standing: TeamStanding,
    ) -> Result<FantasyTeam, StorageError> {
        self.update_team_standings(&[(team_id, standing)])
            .await?
            .pop()
            .ok_or(StorageError::NotFound {
                entity: "fantasy team",
                id: team_id,
            })
    }

    /// Stored rows that could not be read, per table. Backends that cannot
    /// hold malformed rows report none.
    async fn unreadable_rows(&self) -> Result<Vec<(&'static str, usize)>, StorageError> {
        Ok(Vec::new())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.list_users().await?.into_iter().find(|u| u.id == id))
    }

    async fn get_league(&self, id: LeagueId) -> Result<Option<League>, StorageError> {
        Ok(self.list_leagues().await?.into_iter().find(|l| l.id == id))
    }

    /// The league's active rule set.
    async fn points_system(
        &self,
        league_id: LeagueId,
    ) -> Result<Option<PointsSystem>, StorageError> {
        Ok(self
            .list_points_systems()
            .await?
            .into_iter()
            .find(|p| p.league_id == league_id))
    }

    async fn get_ipl_team(&self, id: IplTeamId) -> Result<Option<IplTeam>, StorageError> {
        Ok(self.list_ipl_teams().await?.into_iter().find(|t| t.id == id))
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StorageError> {
        Ok(self.list_players().await?.into_iter().find(|p| p.id == id))
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, StorageError> {
        Ok(self.list_matches().await?.into_iter().find(|m| m.id == id))
    }

    async fn get_fantasy_team(
        &self,
        id: FantasyTeamId,
    ) -> Result<Option<FantasyTeam>, StorageError> {
        Ok(self
            .list_fantasy_teams()
            .await?
            .into_iter()
            .find(|t| t.id == id))
    }

    async fn players_by_team(&self, team_id: IplTeamId) -> Result<Vec<Player>, StorageError> {
        let mut players = self.list_players().await?;
        players.retain(|p| p.ipl_team_id == team_id);
        Ok(players)
    }

    /// Case-insensitive name search. An empty query matches nothing.
    async fn search_players(&self, query: &str) -> Result<Vec<Player>, StorageError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let mut players = self.list_players().await?;
        players.retain(|p| p.name_matches(query));
        Ok(players)
    }

    /// Completed matches, newest first.
    async fn recent_matches(&self, limit: usize) -> Result<Vec<Match>, StorageError> {
        let mut matches = self.list_matches().await?;
        matches.retain(|m| m.is_completed);
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        matches.truncate(limit);
        Ok(matches)
    }

    /// Matches not yet played and not in the past, soonest first.
    async fn upcoming_matches(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Match>, StorageError> {
        let mut matches = self.list_matches().await?;
        matches.retain(|m| !m.is_completed && m.date >= now);
        matches.sort_by(|a, b| a.date.cmp(&b.date));
        matches.truncate(limit);
        Ok(matches)
    }

    /// A player's performances, newest first.
    async fn player_performances(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<Performance>, StorageError> {
        let mut performances = self.list_performances().await?;
        performances.retain(|p| p.player_id == player_id);
        performances.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(performances)
    }

    async fn match_performances(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<Performance>, StorageError> {
        let mut performances = self.list_performances().await?;
        performances.retain(|p| p.match_id == match_id);
        Ok(performances)
    }

    /// Highest stored fantasy points, joined with the player.
    /// Performances whose player is unknown are skipped.
    async fn top_performances(
        &self,
        limit: usize,
    ) -> Result<Vec<(Performance, Player)>, StorageError> {
        let mut performances = self.list_performances().await?;
        performances.sort_by(|a, b| b.fantasy_points.cmp(&a.fantasy_points));

        let players = self.list_players().await?;
        Ok(performances
            .into_iter()
            .filter_map(|perf| {
                players
                    .iter()
                    .find(|p| p.id == perf.player_id)
                    .cloned()
                    .map(|player| (perf, player))
            })
            .take(limit)
            .collect())
    }

    /// Fantasy teams in one league, or all of them.
    async fn fantasy_teams_in(
        &self,
        league_id: Option<LeagueId>,
    ) -> Result<Vec<FantasyTeam>, StorageError> {
        let mut teams = self.list_fantasy_teams().await?;
        if let Some(league_id) = league_id {
            teams.retain(|t| t.league_id == Some(league_id));
        }
        Ok(teams)
    }

    /// Validate and persist a new performance. One per (match, player).
    async fn create_performance(
        &self,
        performance: Performance,
    ) -> Result<Performance, StorageError> {
        let existing = self.match_performances(performance.match_id).await?;
        if existing.iter().any(|p| p.player_id == performance.player_id) {
            return Err(ValidationError::DuplicatePerformance {
                match_id: performance.match_id,
                player_id: performance.player_id,
            }
            .into());
        }
        self.insert_performance(performance).await
    }

    /// Add a player to a team, enforcing the captaincy invariants.
    async fn add_team_entry(
        &self,
        entry: FantasyTeamEntry,
    ) -> Result<FantasyTeamEntry, StorageError> {
        let team_id = entry.fantasy_team_id;
        if self.get_fantasy_team(team_id).await?.is_none() {
            return Err(StorageError::NotFound {
                entity: "fantasy team",
                id: team_id,
            });
        }
        if self.get_player(entry.player_id).await?.is_none() {
            return Err(StorageError::NotFound {
                entity: "player",
                id: entry.player_id,
            });
        }

        let mut entries = self.team_entries(team_id).await?;
        entries.push(entry.clone());
        validate_entries(team_id, &entries)?;

        self.insert_team_entry(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        assert_eq!(config.normalized_dir(), PathBuf::from("/data/normalized"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_not_found_message() {
        let err = StorageError::NotFound {
            entity: "fantasy team",
            id: 9,
        };
        assert_eq!(err.to_string(), "fantasy team 9 not found");
    }

    #[test]
    fn test_assign_id_exhausted() {
        assert_eq!(assign_id("performance", vec![4, 2]).unwrap(), 5);

        let err = assign_id("performance", vec![u32::MAX]).unwrap_err();
        assert!(matches!(
            err,
            StorageError::IdsExhausted {
                entity: "performance"
            }
        ));
        assert_eq!(err.to_string(), "No performance IDs left to assign");
    }
}
