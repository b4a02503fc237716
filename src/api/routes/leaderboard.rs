use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::calculate::RankedTeam;
use crate::models::{FantasyTeamId, LeagueId, User, UserId};
use crate::standings::stored_leaderboard;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub rank_delta: Option<i64>,
    pub total_points: i64,
    pub weekly_points: Option<i64>,
    pub team_id: FantasyTeamId,
    pub team_name: String,
    pub manager: Option<String>,
}

impl LeaderboardRow {
    pub fn new(ranked: &RankedTeam, users: &HashMap<UserId, User>) -> Self {
        Self {
            rank: ranked.rank,
            rank_delta: ranked.rank_delta,
            total_points: ranked.total_points,
            weekly_points: ranked.team.weekly_points,
            team_id: ranked.team.id,
            team_name: ranked.team.name.clone(),
            manager: users.get(&ranked.team.user_id).map(|u| u.name.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub league_id: Option<LeagueId>,
    pub teams: Vec<LeaderboardRow>,
    pub pagination: PaginationMeta,
}

pub async fn global_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    leaderboard_page(&state, None, &params).await.map(Json)
}

pub async fn league_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    leaderboard_page(&state, Some(id), &params).await.map(Json)
}

async fn leaderboard_page(
    state: &AppState,
    league_id: Option<LeagueId>,
    params: &LeaderboardParams,
) -> Result<LeaderboardResponse, ApiError> {
    let ranked = stored_leaderboard(state.store.as_ref(), league_id).await?;
    let users: HashMap<UserId, User> = state
        .store
        .list_users()
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let limits = &state.config.leaderboard;
    let pagination = Pagination::with_limits(
        params.page,
        params.page_size,
        limits.default_page_size,
        limits.max_page_size,
    );
    let meta = PaginationMeta::new(&pagination, ranked.len() as u32);

    let teams = pagination
        .slice(&ranked)
        .iter()
        .map(|r| LeaderboardRow::new(r, &users))
        .collect();

    Ok(LeaderboardResponse {
        league_id,
        teams,
        pagination: meta,
    })
}
