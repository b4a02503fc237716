//! Standings refresh pipeline.
//!
//! Rescores every stored performance under the league's rule set, totals
//! each fantasy team, ranks the result and writes it back.
//!
//! Stored `rank` and `previous_rank` are always positions on the overall
//! board. A league refresh rescores that league's teams, then re-ranks every
//! team that has a total, so the stored ranks of other leagues move with it.
//! The new standings are written as one batch after everything is computed;
//! a failed refresh leaves the stored standings untouched.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculate::{
    aggregate_team_points, rank_subset, rank_teams, validate_entries, PointsCalculator,
    RankedTeam, RankingError,
};
use crate::models::{
    FantasyTeam, FantasyTeamId, Fingerprint, LeagueId, Match, MatchId, Performance, Player,
    PlayerId, PointsRule, PointsSystemId, TeamStanding, ValidationError,
};
use crate::storage::{LeagueStore, StorageError};

/// Errors from a standings refresh.
#[derive(Debug, Error)]
pub enum StandingsError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Ranking failed: {0}")]
    Ranking(#[from] RankingError),

    #[error("Invalid team: {0}")]
    Validation(#[from] ValidationError),

    #[error("League {0} not found")]
    LeagueNotFound(LeagueId),
}

/// Where a rule set came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSource {
    PointsSystem { id: PointsSystemId, name: String },
    Fallback,
}

/// The rule set in force for a league.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRules {
    pub league_id: Option<LeagueId>,
    pub source: RuleSource,
    pub fingerprint: Fingerprint,
    pub rule: PointsRule,
}

/// Resolve a league's rule set, falling back when it has none.
///
/// Tolerated problems in the rule set are logged here.
pub async fn resolve_rules(
    store: &dyn LeagueStore,
    league_id: Option<LeagueId>,
    fallback: &PointsRule,
) -> Result<ResolvedRules, StandingsError> {
    let system = match league_id {
        Some(id) => {
            if store.get_league(id).await?.is_none() {
                return Err(StandingsError::LeagueNotFound(id));
            }
            store.points_system(id).await?
        }
        None => None,
    };

    let (source, rule) = match system {
        Some(system) => (
            RuleSource::PointsSystem {
                id: system.id,
                name: system.name,
            },
            system.rules_config,
        ),
        None => (RuleSource::Fallback, fallback.clone()),
    };

    for warning in rule.warnings() {
        warn!("League {:?}: {}", league_id, warning);
    }

    Ok(ResolvedRules {
        league_id,
        source,
        fingerprint: rule.fingerprint(),
        rule,
    })
}

/// Knobs for one refresh run.
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Only teams in this league; `None` refreshes every team
    pub league_id: Option<LeagueId>,

    pub now: DateTime<Utc>,

    /// Matches dated within this span before `now` count as weekly points
    pub weekly_window: Duration,

    /// Compute without persisting
    pub dry_run: bool,
}

impl RefreshOptions {
    pub fn new(league_id: Option<LeagueId>, weekly_window: Duration) -> Self {
        Self {
            league_id,
            now: Utc::now(),
            weekly_window,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// Outcome of a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub league_id: Option<LeagueId>,
    pub dry_run: bool,
    pub performances_scored: usize,
    pub rule_sets: Vec<ResolvedRules>,

    /// The refreshed scope's board, with movement measured within the scope
    pub teams: Vec<RankedTeam>,
}

/// Season and weekly points per player under one rule set.
#[derive(Debug, Default)]
struct PlayerTotals {
    season: HashMap<PlayerId, i64>,
    weekly: HashMap<PlayerId, i64>,
}

fn score_players(
    performances: &[Performance],
    players: &HashMap<PlayerId, Player>,
    matches: &HashMap<MatchId, Match>,
    rule: &PointsRule,
    calculator: &PointsCalculator,
    options: &RefreshOptions,
) -> PlayerTotals {
    let window_start = options.now - options.weekly_window;
    let mut totals = PlayerTotals::default();

    for performance in performances {
        let role = players.get(&performance.player_id).map(|p| p.role);
        let points = calculator.calculate(performance, rule, role);
        *totals.season.entry(performance.player_id).or_default() += points;

        let recent = matches
            .get(&performance.match_id)
            .map(|m| m.date >= window_start && m.date <= options.now)
            .unwrap_or(false);
        if recent {
            *totals.weekly.entry(performance.player_id).or_default() += points;
        }
    }

    totals
}

/// Recompute, rank and (unless dry-running) persist standings.
pub async fn refresh_standings(
    store: &dyn LeagueStore,
    calculator: &PointsCalculator,
    fallback: &PointsRule,
    options: &RefreshOptions,
) -> Result<RefreshSummary, StandingsError> {
    info!(
        "Refreshing standings (league: {:?}, dry_run: {})",
        options.league_id, options.dry_run
    );

    if let Some(id) = options.league_id {
        if store.get_league(id).await?.is_none() {
            return Err(StandingsError::LeagueNotFound(id));
        }
    }

    let all_teams = store.list_fantasy_teams().await?;
    let in_scope =
        |team: &FantasyTeam| options.league_id.map_or(true, |id| team.league_id == Some(id));
    let teams: Vec<FantasyTeam> = all_teams.iter().filter(|t| in_scope(*t)).cloned().collect();
    let performances = store.list_performances().await?;
    let players: HashMap<PlayerId, Player> = store
        .list_players()
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let matches: HashMap<MatchId, Match> = store
        .list_matches()
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    // One rule set per league the teams belong to
    let mut rule_sets: Vec<ResolvedRules> = Vec::new();
    let mut totals: HashMap<Option<LeagueId>, PlayerTotals> = HashMap::new();
    for team in &teams {
        if totals.contains_key(&team.league_id) {
            continue;
        }
        let resolved = resolve_rules(store, team.league_id, fallback).await?;
        let scored = score_players(
            &performances,
            &players,
            &matches,
            &resolved.rule,
            calculator,
            options,
        );
        debug!(
            "Scored {} players for league {:?} under {}",
            scored.season.len(),
            team.league_id,
            resolved.fingerprint
        );
        totals.insert(team.league_id, scored);
        rule_sets.push(resolved);
    }

    let mut refreshed: HashMap<FantasyTeamId, FantasyTeam> = HashMap::new();
    for team in teams {
        let entries = store.team_entries(team.id).await?;
        validate_entries(team.id, &entries)?;

        let (rule, player_totals) = match (
            rule_sets.iter().find(|r| r.league_id == team.league_id),
            totals.get(&team.league_id),
        ) {
            (Some(resolved), Some(player_totals)) => (&resolved.rule, player_totals),
            _ => continue,
        };

        let total = aggregate_team_points(&entries, &player_totals.season, rule);
        let weekly = aggregate_team_points(&entries, &player_totals.weekly, rule);
        refreshed.insert(team.id, team.with_points(total, weekly));
    }

    // Overall board: refreshed teams plus every other team that has a total
    let board: Vec<FantasyTeam> = all_teams
        .into_iter()
        .map(|team| refreshed.remove(&team.id).unwrap_or(team))
        .filter(|team| team.total_points.is_some())
        .map(|team| {
            let previous_rank = team.rank;
            team.with_ranks(None, previous_rank)
        })
        .collect();
    let overall = rank_teams(board)?;

    let mut standings: Vec<(FantasyTeamId, TeamStanding)> = Vec::with_capacity(overall.len());
    let mut scope_teams: Vec<FantasyTeam> = Vec::new();
    for entry in &overall {
        let standing = TeamStanding {
            total_points: entry.total_points,
            weekly_points: entry.team.weekly_points.unwrap_or_default(),
            rank: entry.rank,
            previous_rank: entry.team.previous_rank,
        };
        standings.push((entry.team.id, standing));
        if in_scope(&entry.team) {
            let mut team = entry.team.clone();
            team.apply_standing(standing);
            scope_teams.push(team);
        }
    }

    let ranked = match options.league_id {
        Some(_) => rank_subset(scope_teams)?,
        None => rank_teams(scope_teams)?,
    };

    if options.dry_run {
        info!("Dry run: computed {} standings, nothing written", standings.len());
    } else {
        store.update_team_standings(&standings).await?;
        info!("Persisted {} standings", standings.len());
    }

    Ok(RefreshSummary {
        league_id: options.league_id,
        dry_run: options.dry_run,
        performances_scored: performances.len(),
        rule_sets,
        teams: ranked,
    })
}

/// Rank teams by their stored totals.
///
/// A league board measures movement against the league's own previous
/// order, so its deltas agree with the overall board's.
pub async fn stored_leaderboard(
    store: &dyn LeagueStore,
    league_id: Option<LeagueId>,
) -> Result<Vec<RankedTeam>, StandingsError> {
    match league_id {
        Some(id) => {
            if store.get_league(id).await?.is_none() {
                return Err(StandingsError::LeagueNotFound(id));
            }
            Ok(rank_subset(store.fantasy_teams_in(Some(id)).await?)?)
        }
        None => Ok(rank_teams(store.list_fantasy_teams().await?)?),
    }
}
