use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::leaderboard::LeaderboardRow;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{IplTeam, Match, Performance, Player, User, UserId};
use crate::standings::{stored_leaderboard, StandingsError};

#[derive(Debug, Deserialize)]
pub struct TopPerformersParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopPerformer {
    pub player: Player,
    pub team: Option<IplTeam>,
    pub performance: Performance,
}

#[derive(Debug, Serialize)]
pub struct StatsOverview {
    pub next_match: Option<Match>,
    pub current_leader: Option<LeaderboardRow>,
    pub top_scorer: Option<TopPerformer>,
}

async fn top_performers_list(
    state: &AppState,
    limit: usize,
) -> Result<Vec<TopPerformer>, ApiError> {
    let teams = state.store.list_ipl_teams().await?;
    Ok(state
        .store
        .top_performances(limit)
        .await?
        .into_iter()
        .map(|(performance, player)| TopPerformer {
            team: teams.iter().find(|t| t.id == player.ipl_team_id).cloned(),
            player,
            performance,
        })
        .collect())
}

pub async fn top_performers(
    State(state): State<AppState>,
    Query(params): Query<TopPerformersParams>,
) -> Result<Json<Vec<TopPerformer>>, ApiError> {
    let limit = params.limit.unwrap_or(3);
    Ok(Json(top_performers_list(&state, limit).await?))
}

/// Dashboard summary.
///
/// The leader comes from the same board as `/leaderboard`. While any team
/// is still unscored that board cannot be ranked, and there is no leader.
pub async fn stats_overview(
    State(state): State<AppState>,
) -> Result<Json<StatsOverview>, ApiError> {
    let next_match = state
        .store
        .upcoming_matches(chrono::Utc::now(), 1)
        .await?
        .into_iter()
        .next();

    let ranked = match stored_leaderboard(state.store.as_ref(), None).await {
        Ok(ranked) => ranked,
        Err(StandingsError::Ranking(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    let users: HashMap<UserId, User> = state
        .store
        .list_users()
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let current_leader = ranked.first().map(|r| LeaderboardRow::new(r, &users));

    let top_scorer = top_performers_list(&state, 1).await?.into_iter().next();

    Ok(Json(StatsOverview {
        next_match,
        current_leader,
        top_scorer,
    }))
}
