//! In-memory storage backend.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use super::{assign_id, LeagueStore, Snapshot, StorageError};
use crate::models::{
    FantasyTeam, FantasyTeamEntry, FantasyTeamId, IplTeam, League, Match, Performance,
    Player, PlayerId, PointsSystem, TeamStanding, User,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<u32, User>,
    leagues: BTreeMap<u32, League>,
    points_systems: BTreeMap<u32, PointsSystem>,
    ipl_teams: BTreeMap<u32, IplTeam>,
    players: BTreeMap<u32, Player>,
    matches: BTreeMap<u32, Match>,
    performances: BTreeMap<u32, Performance>,
    fantasy_teams: BTreeMap<u32, FantasyTeam>,
    team_entries: BTreeMap<u32, FantasyTeamEntry>,
}

fn keyed<T, F>(rows: Vec<T>, id: F) -> BTreeMap<u32, T>
where
    F: Fn(&T) -> u32,
{
    rows.into_iter().map(|row| (id(&row), row)).collect()
}

/// Tables held in process memory. Listing order is by ID.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding every row in the snapshot.
    /// Later rows win on duplicate IDs.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let tables = Tables {
            users: keyed(snapshot.users, |r| r.id),
            leagues: keyed(snapshot.leagues, |r| r.id),
            points_systems: keyed(snapshot.points_systems, |r| r.id),
            ipl_teams: keyed(snapshot.ipl_teams, |r| r.id),
            players: keyed(snapshot.players, |r| r.id),
            matches: keyed(snapshot.matches, |r| r.id),
            performances: keyed(snapshot.performances, |r| r.id),
            fantasy_teams: keyed(snapshot.fantasy_teams, |r| r.id),
            team_entries: keyed(snapshot.team_entries, |r| r.id),
        };
        debug!(
            "Loaded memory store with {} teams and {} performances",
            tables.fantasy_teams.len(),
            tables.performances.len()
        );
        Self {
            tables: RwLock::new(tables),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|_| StorageError::Poisoned)
    }
}

#[async_trait]
impl LeagueStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    async fn list_leagues(&self) -> Result<Vec<League>, StorageError> {
        Ok(self.read()?.leagues.values().cloned().collect())
    }

    async fn list_points_systems(&self) -> Result<Vec<PointsSystem>, StorageError> {
        Ok(self.read()?.points_systems.values().cloned().collect())
    }

    async fn list_ipl_teams(&self) -> Result<Vec<IplTeam>, StorageError> {
        Ok(self.read()?.ipl_teams.values().cloned().collect())
    }

    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.read()?.players.values().cloned().collect())
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StorageError> {
        Ok(self.read()?.matches.values().cloned().collect())
    }

    async fn list_performances(&self) -> Result<Vec<Performance>, StorageError> {
        Ok(self.read()?.performances.values().cloned().collect())
    }

    async fn list_fantasy_teams(&self) -> Result<Vec<FantasyTeam>, StorageError> {
        Ok(self.read()?.fantasy_teams.values().cloned().collect())
    }

    async fn team_entries(
        &self,
        team_id: FantasyTeamId,
    ) -> Result<Vec<FantasyTeamEntry>, StorageError> {
        Ok(self
            .read()?
            .team_entries
            .values()
            .filter(|e| e.fantasy_team_id == team_id)
            .cloned()
            .collect())
    }

    async fn insert_performance(
        &self,
        mut performance: Performance,
    ) -> Result<Performance, StorageError> {
        let mut tables = self.write()?;
        performance.id = assign_id("performance", tables.performances.keys().copied())?;
        tables
            .performances
            .insert(performance.id, performance.clone());
        Ok(performance)
    }

    async fn insert_team_entry(
        &self,
        mut entry: FantasyTeamEntry,
    ) -> Result<FantasyTeamEntry, StorageError> {
        let mut tables = self.write()?;
        entry.id = assign_id("team entry", tables.team_entries.keys().copied())?;
        tables.team_entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_team_standings(
        &self,
        standings: &[(FantasyTeamId, TeamStanding)],
    ) -> Result<Vec<FantasyTeam>, StorageError> {
        let mut tables = self.write()?;
        if let Some((team_id, _)) = standings
            .iter()
            .find(|(id, _)| !tables.fantasy_teams.contains_key(id))
        {
            return Err(StorageError::NotFound {
                entity: "fantasy team",
                id: *team_id,
            });
        }

        let mut updated = Vec::with_capacity(standings.len());
        for (team_id, standing) in standings {
            if let Some(team) = tables.fantasy_teams.get_mut(team_id) {
                team.apply_standing(*standing);
                updated.push(team.clone());
            }
        }
        Ok(updated)
    }

    async fn remove_team_entry(
        &self,
        team_id: FantasyTeamId,
        player_id: PlayerId,
    ) -> Result<bool, StorageError> {
        let mut tables = self.write()?;
        let found = tables
            .team_entries
            .iter()
            .find(|(_, e)| e.fantasy_team_id == team_id && e.player_id == player_id)
            .map(|(id, _)| *id);
        Ok(match found {
            Some(id) => tables.team_entries.remove(&id).is_some(),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerRole, ValidationError};
    use chrono::{Duration, TimeZone, Utc};
    use tokio_test::block_on;

    fn snapshot() -> Snapshot {
        let day = |d| Utc.with_ymd_and_hms(2025, 4, d, 14, 0, 0).unwrap();
        Snapshot {
            ipl_teams: vec![IplTeam::new(1, "Chennai Super Kings", "CSK")],
            players: vec![
                Player::new(1, "Virat Kohli", 3, PlayerRole::Batsman),
                Player::new(2, "MS Dhoni", 1, PlayerRole::WicketKeeper),
                Player::new(3, "Ravindra Jadeja", 1, PlayerRole::AllRounder),
            ],
            matches: vec![
                Match::new(1, 1, 2, day(28), "Chennai").completed("204/5", "186/8", Some(1)),
                Match::new(2, 3, 4, day(26), "Bangalore").completed("195/6", "189/8", Some(3)),
                Match::new(3, 1, 3, day(30), "Chennai"),
            ],
            performances: vec![
                Performance::new(1, 1, 2).with_points(86, None),
                Performance::new(2, 2, 1).with_points(98, None),
                Performance::new(3, 1, 9).with_points(200, None),
            ],
            fantasy_teams: vec![
                FantasyTeam::new(1, 1, "FantasyKing2025").with_points(10, 1),
                FantasyTeam::new(2, 2, "CSK Fanatics").with_league(1),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_lists_in_id_order() {
        let store = MemoryStore::from_snapshot(snapshot());
        let ids: Vec<u32> = block_on(store.list_players())
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_search_players() {
        let store = MemoryStore::from_snapshot(snapshot());
        let found = block_on(store.search_players("DHONI")).unwrap();
        assert_eq!(found.len(), 1);
        assert!(block_on(store.search_players("  ")).unwrap().is_empty());
    }

    #[test]
    fn test_players_by_team() {
        let store = MemoryStore::from_snapshot(snapshot());
        assert_eq!(block_on(store.players_by_team(1)).unwrap().len(), 2);
    }

    #[test]
    fn test_recent_and_upcoming_matches() {
        let store = MemoryStore::from_snapshot(snapshot());
        let recent = block_on(store.recent_matches(5)).unwrap();
        let ids: Vec<u32> = recent.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let now = Utc.with_ymd_and_hms(2025, 4, 29, 0, 0, 0).unwrap();
        let upcoming = block_on(store.upcoming_matches(now, 5)).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, 3);

        let later = now + Duration::days(5);
        assert!(block_on(store.upcoming_matches(later, 5)).unwrap().is_empty());
    }

    #[test]
    fn test_top_performances_skip_unknown_players() {
        let store = MemoryStore::from_snapshot(snapshot());
        let top = block_on(store.top_performances(3)).unwrap();
        let points: Vec<i64> = top.iter().map(|(p, _)| p.fantasy_points).collect();
        assert_eq!(points, vec![98, 86]);
        assert_eq!(top[0].1.name, "Virat Kohli");
    }

    #[test]
    fn test_create_performance_assigns_id_and_rejects_duplicates() {
        let store = MemoryStore::from_snapshot(snapshot());
        let created = block_on(store.create_performance(Performance::new(0, 2, 3))).unwrap();
        assert_eq!(created.id, 4);

        let err = block_on(store.create_performance(Performance::new(0, 2, 3))).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Validation(ValidationError::DuplicatePerformance {
                match_id: 2,
                player_id: 3
            })
        ));
    }

    #[test]
    fn test_add_team_entry_enforces_captaincy() {
        let store = MemoryStore::from_snapshot(snapshot());
        block_on(store.add_team_entry(FantasyTeamEntry::new(0, 1, 1).captain())).unwrap();
        block_on(store.add_team_entry(FantasyTeamEntry::new(0, 1, 2).vice_captain())).unwrap();

        let err = block_on(store.add_team_entry(FantasyTeamEntry::new(0, 1, 3).captain()))
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Validation(ValidationError::MultipleCaptains { team_id: 1 })
        ));
        assert_eq!(block_on(store.team_entries(1)).unwrap().len(), 2);
    }

    #[test]
    fn test_add_team_entry_unknown_team() {
        let store = MemoryStore::from_snapshot(snapshot());
        let err = block_on(store.add_team_entry(FantasyTeamEntry::new(0, 42, 1))).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 42, .. }));
    }

    #[test]
    fn test_remove_team_entry() {
        let store = MemoryStore::from_snapshot(snapshot());
        block_on(store.add_team_entry(FantasyTeamEntry::new(0, 1, 1))).unwrap();
        assert!(block_on(store.remove_team_entry(1, 1)).unwrap());
        assert!(!block_on(store.remove_team_entry(1, 1)).unwrap());
    }

    #[test]
    fn test_update_team_standing() {
        let store = MemoryStore::from_snapshot(snapshot());
        let standing = TeamStanding {
            total_points: 500,
            weekly_points: 60,
            rank: 1,
            previous_rank: None,
        };
        let team = block_on(store.update_team_standing(2, standing)).unwrap();
        assert_eq!(team.total_points, Some(500));

        let err = block_on(store.update_team_standing(99, standing)).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 99, .. }));
    }

    #[test]
    fn test_standings_batch_with_unknown_team_changes_nothing() {
        let store = MemoryStore::from_snapshot(snapshot());
        let standing = TeamStanding {
            total_points: 500,
            weekly_points: 60,
            rank: 1,
            previous_rank: None,
        };

        let err = block_on(store.update_team_standings(&[(1, standing), (99, standing)]))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 99, .. }));

        let team = block_on(store.get_fantasy_team(1)).unwrap().unwrap();
        assert_eq!(team.total_points, Some(10));
        assert_eq!(team.rank, None);

        let updated = block_on(store.update_team_standings(&[(1, standing), (2, standing)]))
            .unwrap();
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[1].total_points, Some(500));
    }

    #[test]
    fn test_insert_fails_when_ids_run_out() {
        let mut snapshot = snapshot();
        snapshot.performances.push(Performance::new(u32::MAX, 3, 3));
        let store = MemoryStore::from_snapshot(snapshot);

        let err = block_on(store.create_performance(Performance::new(0, 2, 3))).unwrap_err();
        assert!(matches!(
            err,
            StorageError::IdsExhausted {
                entity: "performance"
            }
        ));
        assert_eq!(block_on(store.list_performances()).unwrap().len(), 4);
    }

    #[test]
    fn test_fantasy_teams_in_league() {
        let store = MemoryStore::from_snapshot(snapshot());
        assert_eq!(block_on(store.fantasy_teams_in(Some(1))).unwrap().len(), 1);
        assert_eq!(block_on(store.fantasy_teams_in(None)).unwrap().len(), 2);
    }
}
