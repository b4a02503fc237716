use axum::extract::{Path, State};
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{IplTeam, IplTeamId};

pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<IplTeam>>, ApiError> {
    Ok(Json(state.store.list_ipl_teams().await?))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<IplTeamId>,
) -> Result<Json<IplTeam>, ApiError> {
    state
        .store
        .get_ipl_team(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Team {}", id)))
}
