//! JSONL (JSON Lines) storage.
//!
//! One file per table under `<data_dir>/normalized/`. Each line is a valid
//! JSON object representing one row. Lines that fail to parse are skipped
//! with a warning on read, so a bad row never hides the rest of its table,
//! and are written back verbatim when the table is rewritten.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{assign_id, LeagueStore, Snapshot, StorageConfig, StorageError};
use crate::models::{
    FantasyTeam, FantasyTeamEntry, FantasyTeamId, IplTeam, League, Match, Performance,
    Player, PlayerId, PointsSystem, TeamStanding, User,
};

/// Tables stored as JSONL files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    User,
    League,
    PointsSystem,
    IplTeam,
    Player,
    Match,
    Performance,
    FantasyTeam,
    TeamEntry,
}

impl EntityType {
    pub const ALL: [EntityType; 9] = [
        EntityType::User,
        EntityType::League,
        EntityType::PointsSystem,
        EntityType::IplTeam,
        EntityType::Player,
        EntityType::Match,
        EntityType::Performance,
        EntityType::FantasyTeam,
        EntityType::TeamEntry,
    ];

    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::User => "users.jsonl",
            EntityType::League => "leagues.jsonl",
            EntityType::PointsSystem => "points_systems.jsonl",
            EntityType::IplTeam => "ipl_teams.jsonl",
            EntityType::Player => "players.jsonl",
            EntityType::Match => "matches.jsonl",
            EntityType::Performance => "performances.jsonl",
            EntityType::FantasyTeam => "fantasy_teams.jsonl",
            EntityType::TeamEntry => "fantasy_team_players.jsonl",
        }
    }
}

/// Get the path for an entity file.
pub fn entity_path(config: &StorageConfig, entity: EntityType) -> PathBuf {
    config.normalized_dir().join(entity.filename())
}

/// One non-empty line of a JSONL file.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonlLine<T> {
    Row(T),

    /// Text that did not parse as `T`, kept as it was on disk
    Unreadable(String),
}

impl<T> JsonlLine<T> {
    pub fn row(&self) -> Option<&T> {
        match self {
            JsonlLine::Row(row) => Some(row),
            JsonlLine::Unreadable(_) => None,
        }
    }

    pub fn row_mut(&mut self) -> Option<&mut T> {
        match self {
            JsonlLine::Row(row) => Some(row),
            JsonlLine::Unreadable(_) => None,
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, JsonlLine::Unreadable(_))
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Replace the entire file with `lines`.
    ///
    /// The new contents go to a sibling temp file which is then renamed
    /// over the original, so readers see either the old file or the new one.
    pub fn write_lines(&self, lines: &[JsonlLine<T>]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let temp_path = self.path.with_extension("jsonl.tmp");
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        for line in lines {
            match line {
                JsonlLine::Row(entity) => writeln!(writer, "{}", serde_json::to_string(entity)?)?,
                JsonlLine::Unreadable(raw) => writeln!(writer, "{}", raw)?,
            }
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&temp_path, &self.path)?;
        info!("Wrote {} lines to {:?}", lines.len(), self.path);

        Ok(lines.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    /// Read every non-empty line, parsed where possible.
    /// A missing file is an empty table.
    pub fn read_lines(&self) -> Result<Vec<JsonlLine<T>>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => lines.push(JsonlLine::Row(entity)),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                    lines.push(JsonlLine::Unreadable(line));
                }
            }
        }

        Ok(lines)
    }

    /// Read all entities from the file, skipping unreadable lines.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        let entities: Vec<T> = self
            .read_lines()?
            .into_iter()
            .filter_map(|line| match line {
                JsonlLine::Row(entity) => Some(entity),
                JsonlLine::Unreadable(_) => None,
            })
            .collect();

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Read entities matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }

    /// Number of lines that failed to parse.
    pub fn unreadable_count(&self) -> Result<usize, StorageError> {
        Ok(self
            .read_lines()?
            .iter()
            .filter(|line| line.is_unreadable())
            .count())
    }
}

/// Filesystem-backed store.
///
/// Reads go to disk on every call. Writers are serialized by an async mutex
/// so read-modify-write updates never interleave within one process.
/// Rewrites carry unreadable lines through untouched.
pub struct JsonlStore {
    config: StorageConfig,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn reader<T: DeserializeOwned>(&self, entity: EntityType) -> JsonlReader<T> {
        JsonlReader::for_entity(&self.config, entity)
    }

    fn writer<T: Serialize>(&self, entity: EntityType) -> JsonlWriter<T> {
        JsonlWriter::for_entity(&self.config, entity)
    }

    /// Read every table.
    pub fn load_snapshot(&self) -> Result<Snapshot, StorageError> {
        Ok(Snapshot {
            users: self.reader(EntityType::User).read_all()?,
            leagues: self.reader(EntityType::League).read_all()?,
            points_systems: self.reader(EntityType::PointsSystem).read_all()?,
            ipl_teams: self.reader(EntityType::IplTeam).read_all()?,
            players: self.reader(EntityType::Player).read_all()?,
            matches: self.reader(EntityType::Match).read_all()?,
            performances: self.reader(EntityType::Performance).read_all()?,
            fantasy_teams: self.reader(EntityType::FantasyTeam).read_all()?,
            team_entries: self.reader(EntityType::TeamEntry).read_all()?,
        })
    }

    /// Unreadable line count for one table.
    pub fn unreadable_in(&self, entity: EntityType) -> Result<usize, StorageError> {
        match entity {
            EntityType::User => self.reader::<User>(entity).unreadable_count(),
            EntityType::League => self.reader::<League>(entity).unreadable_count(),
            EntityType::PointsSystem => self.reader::<PointsSystem>(entity).unreadable_count(),
            EntityType::IplTeam => self.reader::<IplTeam>(entity).unreadable_count(),
            EntityType::Player => self.reader::<Player>(entity).unreadable_count(),
            EntityType::Match => self.reader::<Match>(entity).unreadable_count(),
            EntityType::Performance => self.reader::<Performance>(entity).unreadable_count(),
            EntityType::FantasyTeam => self.reader::<FantasyTeam>(entity).unreadable_count(),
            EntityType::TeamEntry => self.reader::<FantasyTeamEntry>(entity).unreadable_count(),
        }
    }
}

#[async_trait]
impl LeagueStore for JsonlStore {
    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        self.reader(EntityType::User).read_all()
    }

    async fn list_leagues(&self) -> Result<Vec<League>, StorageError> {
        self.reader(EntityType::League).read_all()
    }

    async fn list_points_systems(&self) -> Result<Vec<PointsSystem>, StorageError> {
        self.reader(EntityType::PointsSystem).read_all()
    }

    async fn list_ipl_teams(&self) -> Result<Vec<IplTeam>, StorageError> {
        self.reader(EntityType::IplTeam).read_all()
    }

    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        self.reader(EntityType::Player).read_all()
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StorageError> {
        self.reader(EntityType::Match).read_all()
    }

    async fn list_performances(&self) -> Result<Vec<Performance>, StorageError> {
        self.reader(EntityType::Performance).read_all()
    }

    async fn list_fantasy_teams(&self) -> Result<Vec<FantasyTeam>, StorageError> {
        self.reader(EntityType::FantasyTeam).read_all()
    }

    async fn team_entries(
        &self,
        team_id: FantasyTeamId,
    ) -> Result<Vec<FantasyTeamEntry>, StorageError> {
        self.reader::<FantasyTeamEntry>(EntityType::TeamEntry)
            .read_where(|e| e.fantasy_team_id == team_id)
    }

    async fn insert_performance(
        &self,
        mut performance: Performance,
    ) -> Result<Performance, StorageError> {
        let _guard = self.write_lock.lock().await;
        let existing: Vec<Performance> = self.reader(EntityType::Performance).read_all()?;
        performance.id = assign_id("performance", existing.iter().map(|p| p.id))?;
        self.writer(EntityType::Performance).append(&performance)?;
        Ok(performance)
    }

    async fn insert_team_entry(
        &self,
        mut entry: FantasyTeamEntry,
    ) -> Result<FantasyTeamEntry, StorageError> {
        let _guard = self.write_lock.lock().await;
        let existing: Vec<FantasyTeamEntry> = self.reader(EntityType::TeamEntry).read_all()?;
        entry.id = assign_id("team entry", existing.iter().map(|e| e.id))?;
        self.writer(EntityType::TeamEntry).append(&entry)?;
        Ok(entry)
    }

    async fn update_team_standings(
        &self,
        standings: &[(FantasyTeamId, TeamStanding)],
    ) -> Result<Vec<FantasyTeam>, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut lines: Vec<JsonlLine<FantasyTeam>> =
            self.reader(EntityType::FantasyTeam).read_lines()?;

        let mut updated = Vec::with_capacity(standings.len());
        for (team_id, standing) in standings {
            let team = lines
                .iter_mut()
                .filter_map(JsonlLine::row_mut)
                .find(|t| t.id == *team_id)
                .ok_or(StorageError::NotFound {
                    entity: "fantasy team",
                    id: *team_id,
                })?;
            team.apply_standing(*standing);
            updated.push(team.clone());
        }

        self.writer(EntityType::FantasyTeam).write_lines(&lines)?;
        Ok(updated)
    }

    async fn remove_team_entry(
        &self,
        team_id: FantasyTeamId,
        player_id: PlayerId,
    ) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut lines: Vec<JsonlLine<FantasyTeamEntry>> =
            self.reader(EntityType::TeamEntry).read_lines()?;
        let before = lines.len();
        lines.retain(|line| {
            !line
                .row()
                .is_some_and(|e| e.fantasy_team_id == team_id && e.player_id == player_id)
        });
        if lines.len() == before {
            return Ok(false);
        }
        self.writer(EntityType::TeamEntry).write_lines(&lines)?;
        Ok(true)
    }

    async fn unreadable_rows(&self) -> Result<Vec<(&'static str, usize)>, StorageError> {
        let mut rows = Vec::new();
        for entity in EntityType::ALL {
            let count = self.unreadable_in(entity)?;
            if count > 0 {
                rows.push((entity.filename(), count));
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerRole, PointsRule};
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        name: String,
        value: i32,
    }

    fn entity(id: &str, name: &str, value: i32) -> TestEntity {
        TestEntity {
            id: id.to_string(),
            name: name.to_string(),
            value,
        }
    }

    fn test_store(temp_dir: &TempDir) -> JsonlStore {
        JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    fn seed<T: Serialize>(store: &JsonlStore, entity: EntityType, rows: &[T]) {
        let writer = store.writer::<T>(entity);
        for row in rows {
            writer.append(row).unwrap();
        }
    }

    fn seeded_store(temp_dir: &TempDir) -> JsonlStore {
        let store = test_store(temp_dir);
        seed(&store, EntityType::League, &[League::new(1, "sYAG")]);
        seed(
            &store,
            EntityType::PointsSystem,
            &[PointsSystem {
                id: 1,
                league_id: 1,
                name: "sYAG Standard Points".to_string(),
                description: None,
                rules_config: PointsRule::standard(),
            }],
        );
        seed(
            &store,
            EntityType::Player,
            &[
                Player::new(1, "Virat Kohli", 3, PlayerRole::Batsman),
                Player::new(2, "Jasprit Bumrah", 2, PlayerRole::Bowler),
            ],
        );
        seed(
            &store,
            EntityType::FantasyTeam,
            &[
                FantasyTeam::new(1, 1, "FantasyKing2025").with_league(1),
                FantasyTeam::new(2, 2, "CSK Fanatics").with_league(1),
            ],
        );
        store
    }

    fn standing(total_points: i64, rank: u32) -> TeamStanding {
        TeamStanding {
            total_points,
            weekly_points: 45,
            rank,
            previous_rank: Some(2),
        }
    }

    fn raw_lines(store: &JsonlStore, entity: EntityType) -> Vec<String> {
        std::fs::read_to_string(entity_path(store.config(), entity))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_write_and_read_all() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer
            .write_lines(&[
                JsonlLine::Row(entity("1", "A", 10)),
                JsonlLine::Row(entity("2", "B", 20)),
            ])
            .unwrap();
        writer.append(&entity("3", "C", 30)).unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        let entities = reader.read_all().unwrap();
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[2].name, "C");

        let big = reader.read_where(|e| e.value > 15).unwrap();
        assert_eq!(big.len(), 2);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.jsonl");
        std::fs::write(
            &path,
            r#"{"id":"1","name":"Good","value":1}
not-valid-json

{"id":"2","name":"Also Good","value":2}
"#,
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        let entities = reader.read_all().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].name, "Also Good");

        let lines = reader.read_lines().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], JsonlLine::Unreadable("not-valid-json".to_string()));
        assert_eq!(reader.unreadable_count().unwrap(), 1);
    }

    #[test]
    fn test_write_lines_keeps_unreadable_text_and_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rewrite.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer
            .write_lines(&[
                JsonlLine::Unreadable("{\"id\":7,broken".to_string()),
                JsonlLine::Row(entity("1", "A", 10)),
            ])
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\"id\":7,broken\n{\"id\":\"1\",\"name\":\"A\",\"value\":10}\n");
        assert!(!path.with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestEntity> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));
        assert!(reader.read_all().unwrap().is_empty());
        assert_eq!(reader.unreadable_count().unwrap(), 0);
    }

    #[test]
    fn test_entity_path_construction() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        let path = entity_path(&config, EntityType::TeamEntry);
        assert!(path.ends_with("normalized/fantasy_team_players.jsonl"));
    }

    #[test]
    fn test_negative_count_row_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let path = entity_path(store.config(), EntityType::Performance);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "{\"id\":1,\"match_id\":1,\"player_id\":1,\"runs\":-4}\n\
             {\"id\":2,\"match_id\":1,\"player_id\":2,\"runs\":12}\n",
        )
        .unwrap();

        let performances = tokio_test::block_on(store.list_performances()).unwrap();
        assert_eq!(performances.len(), 1);
        assert_eq!(performances[0].id, 2);
    }

    #[tokio::test]
    async fn test_snapshot_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);

        let loaded = store.load_snapshot().unwrap();
        assert_eq!(loaded.players.len(), 2);
        assert_eq!(loaded.fantasy_teams[1].name, "CSK Fanatics");

        let system = store.points_system(1).await.unwrap().unwrap();
        assert_eq!(system.rules_config, PointsRule::standard());
    }

    #[tokio::test]
    async fn test_update_team_standing_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);

        store.update_team_standing(2, standing(321, 1)).await.unwrap();

        let team = store.get_fantasy_team(2).await.unwrap().unwrap();
        assert_eq!(team.total_points, Some(321));
        assert_eq!(team.previous_rank, Some(2));
        // Other rows untouched
        let other = store.get_fantasy_team(1).await.unwrap().unwrap();
        assert_eq!(other.total_points, None);
    }

    #[tokio::test]
    async fn test_standing_update_keeps_unparsable_team_rows() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let bad_row = r#"{"id":3,"user_id":3,"name":"Broken XI","rank":-1}"#;
        let path = entity_path(store.config(), EntityType::FantasyTeam);
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str(bad_row);
        text.push('\n');
        std::fs::write(&path, text).unwrap();

        store.update_team_standing(1, standing(321, 1)).await.unwrap();

        let lines = raw_lines(&store, EntityType::FantasyTeam);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], bad_row);
        assert_eq!(store.list_fantasy_teams().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_standings_batch_is_all_or_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let before = raw_lines(&store, EntityType::FantasyTeam);

        let err = store
            .update_team_standings(&[(1, standing(300, 1)), (9, standing(200, 2))])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 9, .. }));
        assert_eq!(raw_lines(&store, EntityType::FantasyTeam), before);

        let updated = store
            .update_team_standings(&[(1, standing(300, 1)), (2, standing(200, 2))])
            .await
            .unwrap();
        assert_eq!(updated.len(), 2);
        let ranks: Vec<Option<u32>> = store
            .list_fantasy_teams()
            .await
            .unwrap()
            .iter()
            .map(|t| t.rank)
            .collect();
        assert_eq!(ranks, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_entries_add_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);

        let first = store
            .add_team_entry(FantasyTeamEntry::new(0, 1, 1).captain())
            .await
            .unwrap();
        let second = store
            .add_team_entry(FantasyTeamEntry::new(0, 1, 2))
            .await
            .unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let dup = store.add_team_entry(FantasyTeamEntry::new(0, 1, 2)).await;
        assert!(matches!(dup, Err(StorageError::Validation(_))));

        assert!(store.remove_team_entry(1, 1).await.unwrap());
        let remaining = store.team_entries(1).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].player_id, 2);
    }

    #[tokio::test]
    async fn test_remove_entry_keeps_unparsable_rows() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        store
            .add_team_entry(FantasyTeamEntry::new(0, 1, 1).captain())
            .await
            .unwrap();
        let path = entity_path(store.config(), EntityType::TeamEntry);
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str("{\"id\":5,\"fantasy_team_id\":1}\n");
        std::fs::write(&path, text).unwrap();

        assert!(store.remove_team_entry(1, 1).await.unwrap());
        assert_eq!(
            raw_lines(&store, EntityType::TeamEntry),
            vec!["{\"id\":5,\"fantasy_team_id\":1}".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_performance_appends() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let created = store
            .create_performance(Performance::new(0, 1, 1).with_batting(40, 30, 3, 1))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let next = store
            .create_performance(Performance::new(0, 1, 2))
            .await
            .unwrap();
        assert_eq!(next.id, 2);
        assert_eq!(store.list_performances().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_rows_per_table() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        assert!(store.unreadable_rows().await.unwrap().is_empty());

        let path = entity_path(store.config(), EntityType::Player);
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str("{\"id\":3,\"name\":\"No Team\"}\nnot json\n");
        std::fs::write(&path, text).unwrap();

        assert_eq!(
            store.unreadable_rows().await.unwrap(),
            vec![("players.jsonl", 2)]
        );
        assert_eq!(store.unreadable_in(EntityType::League).unwrap(), 0);
    }

    #[test]
    fn test_entity_filenames_unique() {
        let mut names: Vec<&str> = EntityType::ALL.iter().map(|e| e.filename()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EntityType::ALL.len());
    }
}
