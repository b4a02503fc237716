use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{IplTeam, Match, MatchId, Performance, Player};

const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    /// "recent" or "upcoming"; all matches when absent
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PerformanceLine {
    #[serde(flatten)]
    pub performance: Performance,
    pub player: Option<Player>,
}

#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub fixture: Match,
    pub team1: Option<IplTeam>,
    pub team2: Option<IplTeam>,
    pub winner: Option<IplTeam>,
    pub performances: Vec<PerformanceLine>,
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    let matches = match params.kind.as_deref() {
        Some("recent") => state.store.recent_matches(limit).await?,
        Some("upcoming") => {
            state
                .store
                .upcoming_matches(chrono::Utc::now(), limit)
                .await?
        }
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown match type '{}', expected 'recent' or 'upcoming'",
                other
            )))
        }
        None => {
            let mut all = state.store.list_matches().await?;
            all.sort_by(|a, b| a.date.cmp(&b.date));
            all
        }
    };

    Ok(Json(matches))
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<MatchDetail>, ApiError> {
    let fixture = state
        .store
        .get_match(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Match {}", id)))?;

    let teams: HashMap<_, IplTeam> = state
        .store
        .list_ipl_teams()
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let players: HashMap<_, Player> = state
        .store
        .list_players()
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut performances: Vec<PerformanceLine> = state
        .store
        .match_performances(id)
        .await?
        .into_iter()
        .map(|performance| PerformanceLine {
            player: players.get(&performance.player_id).cloned(),
            performance,
        })
        .collect();
    performances.sort_by(|a, b| b.performance.fantasy_points.cmp(&a.performance.fantasy_points));

    Ok(Json(MatchDetail {
        team1: teams.get(&fixture.team1_id).cloned(),
        team2: teams.get(&fixture.team2_id).cloned(),
        winner: fixture.winner_id.and_then(|w| teams.get(&w).cloned()),
        performances,
        fixture,
    }))
}
