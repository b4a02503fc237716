use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{IplTeam, IplTeamId, Performance, Player, PlayerId};

#[derive(Debug, Deserialize)]
pub struct ListPlayersParams {
    pub team_id: Option<IplTeamId>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: Player,
    pub team: Option<IplTeam>,
    pub performances: Vec<Performance>,
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<ListPlayersParams>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let mut players = match params.search.as_deref() {
        Some(query) => state.store.search_players(query).await?,
        None => match params.team_id {
            Some(team_id) => state.store.players_by_team(team_id).await?,
            None => state.store.list_players().await?,
        },
    };

    // Search and team filter combine
    if let (Some(_), Some(team_id)) = (&params.search, params.team_id) {
        players.retain(|p| p.ipl_team_id == team_id);
    }

    Ok(Json(players))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let player = state
        .store
        .get_player(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Player {}", id)))?;

    let team = state.store.get_ipl_team(player.ipl_team_id).await?;
    let performances = state.store.player_performances(id).await?;

    Ok(Json(PlayerDetail {
        player,
        team,
        performances,
    }))
}
