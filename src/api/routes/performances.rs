use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{NewPerformance, Performance};

/// Record a stat line, scoring it under the default rule set.
pub async fn create_performance(
    State(state): State<AppState>,
    Json(input): Json<NewPerformance>,
) -> Result<(StatusCode, Json<Performance>), ApiError> {
    let performance = input.validate()?;

    if state.store.get_match(performance.match_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Match {}", performance.match_id)));
    }
    let player = state
        .store
        .get_player(performance.player_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Player {}", performance.player_id)))?;

    let rule = &state.config.scoring;
    let points = state
        .calculator
        .calculate(&performance, rule, Some(player.role));
    let performance = performance.with_points(points, Some(rule.fingerprint()));

    let created = state.store.create_performance(performance).await?;
    info!(
        "Recorded performance {} for {} ({} pts)",
        created.id, player.name, created.fantasy_points
    );

    Ok((StatusCode::CREATED, Json(created)))
}
