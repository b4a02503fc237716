use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Fingerprint, League, LeagueId, PointsRule};
use crate::standings::{
    refresh_standings, resolve_rules, RefreshOptions, RefreshSummary, RuleSource,
};

#[derive(Debug, Serialize)]
pub struct RulesResponse {
    pub league_id: LeagueId,
    pub source: RuleSource,
    pub fingerprint: Fingerprint,
    pub rules: PointsRule,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecomputeParams {
    #[serde(default)]
    pub dry_run: bool,
}

pub async fn list_leagues(State(state): State<AppState>) -> Result<Json<Vec<League>>, ApiError> {
    Ok(Json(state.store.list_leagues().await?))
}

pub async fn get_league(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
) -> Result<Json<League>, ApiError> {
    state
        .store
        .get_league(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("League {}", id)))
}

/// The rule set the league is scored under, falling back to the default.
pub async fn get_points_system(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
) -> Result<Json<RulesResponse>, ApiError> {
    let resolved = resolve_rules(state.store.as_ref(), Some(id), &state.config.scoring).await?;
    let warnings = resolved
        .rule
        .warnings()
        .iter()
        .map(ToString::to_string)
        .collect();

    Ok(Json(RulesResponse {
        league_id: id,
        source: resolved.source,
        fingerprint: resolved.fingerprint,
        rules: resolved.rule,
        warnings,
    }))
}

pub async fn recompute(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
    Query(params): Query<RecomputeParams>,
) -> Result<Json<RefreshSummary>, ApiError> {
    info!("Recompute requested for league {}", id);
    let options = RefreshOptions::new(Some(id), state.weekly_window()).dry_run(params.dry_run);
    let summary = refresh_standings(
        state.store.as_ref(),
        &state.calculator,
        &state.config.scoring,
        &options,
    )
    .await?;
    Ok(Json(summary))
}
