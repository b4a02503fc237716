use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{FantasyTeam, FantasyTeamId, Player, User};

#[derive(Debug, Serialize)]
pub struct SquadMember {
    pub player: Player,
    pub is_captain: bool,
    pub is_vice_captain: bool,
}

#[derive(Debug, Serialize)]
pub struct FantasyTeamDetail {
    #[serde(flatten)]
    pub team: FantasyTeam,
    pub manager: Option<User>,
    pub players: Vec<SquadMember>,
}

pub async fn get_fantasy_team(
    State(state): State<AppState>,
    Path(id): Path<FantasyTeamId>,
) -> Result<Json<FantasyTeamDetail>, ApiError> {
    let team = state
        .store
        .get_fantasy_team(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Fantasy team {}", id)))?;

    let manager = state.store.get_user(team.user_id).await?;
    let roster = state.store.list_players().await?;

    // Entries pointing at unknown players are left out
    let players = state
        .store
        .team_entries(id)
        .await?
        .into_iter()
        .filter_map(|entry| {
            roster
                .iter()
                .find(|p| p.id == entry.player_id)
                .map(|player| SquadMember {
                    player: player.clone(),
                    is_captain: entry.is_captain,
                    is_vice_captain: entry.is_vice_captain,
                })
        })
        .collect();

    Ok(Json(FantasyTeamDetail {
        team,
        manager,
        players,
    }))
}
