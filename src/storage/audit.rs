//! Consistency checks over stored data.

use std::collections::HashSet;

use serde::Serialize;

use super::{LeagueStore, StorageError};
use crate::calculate::validate_entries;
use crate::models::{FantasyTeamId, PerformanceId};

/// Problems found in a store. Nothing here is repaired automatically.
#[derive(Debug, Default, Serialize)]
pub struct StorageAudit {
    /// Teams whose entries break the captaincy or membership rules
    pub invalid_teams: Vec<(FantasyTeamId, String)>,

    /// Performances whose player or match does not exist
    pub orphan_performances: Vec<PerformanceId>,

    /// Teams that would block ranking until refreshed
    pub unscored_teams: Vec<FantasyTeamId>,

    /// Stored rows that failed to parse, per table
    pub unreadable_rows: Vec<(String, usize)>,
}

impl StorageAudit {
    pub fn is_clean(&self) -> bool {
        self.invalid_teams.is_empty()
            && self.orphan_performances.is_empty()
            && self.unscored_teams.is_empty()
            && self.unreadable_rows.is_empty()
    }
}

pub async fn audit_store(store: &dyn LeagueStore) -> Result<StorageAudit, StorageError> {
    let mut audit = StorageAudit::default();

    let player_ids: HashSet<_> = store.list_players().await?.iter().map(|p| p.id).collect();
    let match_ids: HashSet<_> = store.list_matches().await?.iter().map(|m| m.id).collect();

    for performance in store.list_performances().await? {
        let known = player_ids.contains(&performance.player_id)
            && match_ids.contains(&performance.match_id);
        if !known {
            audit.orphan_performances.push(performance.id);
        }
    }

    for team in store.list_fantasy_teams().await? {
        let entries = store.team_entries(team.id).await?;
        if let Err(e) = validate_entries(team.id, &entries) {
            audit.invalid_teams.push((team.id, e.to_string()));
        }
        if team.total_points.is_none() {
            audit.unscored_teams.push(team.id);
        }
    }

    audit.unreadable_rows = store
        .unreadable_rows()
        .await?
        .into_iter()
        .map(|(table, count)| (table.to_string(), count))
        .collect();

    Ok(audit)
}
