//! Leaderboard ranking.
//!
//! Teams are ordered by total points descending and ranked with standard
//! competition ranking: tied teams share a rank and the next distinct score
//! resumes at one plus the number of teams strictly above it ("1224").
//!
//! Stored ranks are positions on the overall board. Boards over a subset of
//! teams (one league) go through [`rank_subset`], which measures movement
//! against the subset's own previous order.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::{FantasyTeam, FantasyTeamId};

/// Ranking rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    /// The whole call fails; every offending team is listed.
    #[error("Teams without total points: {team_ids:?}")]
    MissingTotalPoints { team_ids: Vec<FantasyTeamId> },
}

/// A team with its computed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTeam {
    pub rank: u32,

    /// `previous_rank - rank`; positive means the team moved up
    pub rank_delta: Option<i64>,

    pub total_points: i64,

    pub team: FantasyTeam,
}

/// Rank teams by total points.
///
/// The sort is stable, so teams tied on points keep their input order.
pub fn rank_teams(teams: Vec<FantasyTeam>) -> Result<Vec<RankedTeam>, RankingError> {
    rank_with_previous(teams, |team| team.previous_rank)
}

/// Rank a subset of the overall board.
///
/// Each team's previous overall rank is projected onto the subset: one plus
/// the number of subset teams that were previously ranked strictly higher.
/// Deltas compare that projection with the new position in the subset.
pub fn rank_subset(teams: Vec<FantasyTeam>) -> Result<Vec<RankedTeam>, RankingError> {
    let previous: Vec<u32> = teams.iter().filter_map(|t| t.previous_rank).collect();
    let projected: HashMap<FantasyTeamId, u32> = teams
        .iter()
        .filter_map(|t| {
            let own = t.previous_rank?;
            let above = previous.iter().filter(|&&p| p < own).count() as u32;
            Some((t.id, above + 1))
        })
        .collect();

    rank_with_previous(teams, |team| projected.get(&team.id).copied())
}

fn rank_with_previous<F>(
    teams: Vec<FantasyTeam>,
    previous_rank: F,
) -> Result<Vec<RankedTeam>, RankingError>
where
    F: Fn(&FantasyTeam) -> Option<u32>,
{
    let missing: Vec<FantasyTeamId> = teams
        .iter()
        .filter(|t| t.total_points.is_none())
        .map(|t| t.id)
        .collect();
    if !missing.is_empty() {
        return Err(RankingError::MissingTotalPoints { team_ids: missing });
    }

    let mut scored: Vec<(i64, FantasyTeam)> = teams
        .into_iter()
        .map(|t| (t.total_points.unwrap_or_default(), t))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut ranked: Vec<RankedTeam> = Vec::with_capacity(scored.len());
    for (index, (total_points, team)) in scored.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.total_points == total_points => prev.rank,
            _ => index as u32 + 1,
        };
        let rank_delta =
            previous_rank(&team).map(|previous| i64::from(previous) - i64::from(rank));

        ranked.push(RankedTeam {
            rank,
            rank_delta,
            total_points,
            team,
        });
    }

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn team(id: FantasyTeamId, total: i64) -> FantasyTeam {
        FantasyTeam::new(id, id, format!("Team {}", id)).with_points(total, 0)
    }

    fn ranks(ranked: &[RankedTeam]) -> Vec<u32> {
        ranked.iter().map(|r| r.rank).collect()
    }

    fn ids(ranked: &[RankedTeam]) -> Vec<FantasyTeamId> {
        ranked.iter().map(|r| r.team.id).collect()
    }

    #[test]
    fn test_tie_law() {
        let ranked = rank_teams(vec![team(1, 100), team(2, 100), team(3, 90)]).unwrap();
        assert_eq!(ranks(&ranked), vec![1, 1, 3]);
    }

    #[test]
    fn test_league_totals_scenario() {
        let ranked =
            rank_teams(vec![team(1, 4289), team(2, 4156), team(3, 4156), team(4, 3976)]).unwrap();
        assert_eq!(ranks(&ranked), vec![1, 2, 2, 4]);
    }

    #[test]
    fn test_orders_descending() {
        let ranked = rank_teams(vec![team(1, 10), team(2, 30), team(3, -5), team(4, 20)]).unwrap();
        assert_eq!(ids(&ranked), vec![2, 4, 1, 3]);
        assert_eq!(ranks(&ranked), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_all_tied() {
        let ranked = rank_teams(vec![team(1, 0), team(2, 0), team(3, 0)]).unwrap();
        assert_eq!(ranks(&ranked), vec![1, 1, 1]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank_teams(vec![team(7, 50), team(3, 80), team(5, 50), team(1, 50)]).unwrap();
        assert_eq!(ids(&ranked), vec![3, 7, 5, 1]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![team(1, 100), team(2, 90), team(3, 100), team(4, 90), team(5, 70)];
        let first = rank_teams(input.clone()).unwrap();
        let second = rank_teams(input).unwrap();
        assert_eq!(first, second);
        assert_eq!(ranks(&first), vec![1, 1, 3, 3, 5]);
    }

    #[test]
    fn test_rerank_of_output_is_stable() {
        let first = rank_teams(vec![team(2, 60), team(1, 60), team(3, 75)]).unwrap();
        let again = rank_teams(first.iter().map(|r| r.team.clone()).collect()).unwrap();
        assert_eq!(ids(&first), ids(&again));
        assert_eq!(ranks(&first), ranks(&again));
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_teams(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_total_rejects_whole_call() {
        let mut unscored = team(2, 0);
        unscored.total_points = None;
        let mut also_unscored = team(4, 0);
        also_unscored.total_points = None;

        let err = rank_teams(vec![team(1, 10), unscored, team(3, 0), also_unscored]).unwrap_err();
        assert_eq!(
            err,
            RankingError::MissingTotalPoints {
                team_ids: vec![2, 4]
            }
        );
        assert!(err.to_string().contains("[2, 4]"));
    }

    #[test]
    fn test_zero_total_is_valid() {
        let ranked = rank_teams(vec![team(1, 0), team(2, 5)]).unwrap();
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_rank_delta() {
        let climber = team(1, 4289).with_ranks(Some(4), Some(3));
        let faller = team(2, 4156).with_ranks(Some(1), Some(1));
        let newcomer = team(3, 4000);

        let ranked = rank_teams(vec![faller, newcomer, climber]).unwrap();
        let deltas: Vec<Option<i64>> = ranked.iter().map(|r| r.rank_delta).collect();
        assert_eq!(deltas, vec![Some(2), Some(-1), None]);
    }

    #[test]
    fn test_rank_delta_uses_shared_rank() {
        let a = team(1, 100).with_ranks(None, Some(1));
        let b = team(2, 100).with_ranks(None, Some(2));
        let ranked = rank_teams(vec![a, b]).unwrap();
        assert_eq!(ranked[1].rank, 1);
        assert_eq!(ranked[1].rank_delta, Some(1));
    }

    #[test]
    fn test_rank_subset_projects_previous_ranks() {
        // Overall ranks 2, 5 and 9 were 1st, 2nd and 3rd within the league
        let a = team(1, 300).with_ranks(None, Some(5));
        let b = team(2, 200).with_ranks(None, Some(9));
        let c = team(3, 100).with_ranks(None, Some(2));

        let ranked = rank_subset(vec![a, b, c]).unwrap();
        assert_eq!(ids(&ranked), vec![1, 2, 3]);
        let deltas: Vec<Option<i64>> = ranked.iter().map(|r| r.rank_delta).collect();
        assert_eq!(deltas, vec![Some(1), Some(1), Some(-2)]);
    }

    #[test]
    fn test_rank_subset_unchanged_order_has_zero_delta() {
        let a = team(1, 300).with_ranks(None, Some(4));
        let b = team(2, 300).with_ranks(None, Some(4));
        let c = team(3, 100).with_ranks(None, Some(7));
        let newcomer = team(4, 50);

        let ranked = rank_subset(vec![a, b, c, newcomer]).unwrap();
        let deltas: Vec<Option<i64>> = ranked.iter().map(|r| r.rank_delta).collect();
        assert_eq!(deltas, vec![Some(0), Some(0), Some(0), None]);
    }

    #[test]
    fn test_rank_subset_rejects_missing_totals() {
        let mut unscored = team(2, 0);
        unscored.total_points = None;
        assert!(rank_subset(vec![team(1, 10), unscored]).is_err());
    }
}
