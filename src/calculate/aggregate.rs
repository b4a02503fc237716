//! Team totals from player points.

use std::collections::{HashMap, HashSet};

use crate::models::{
    FantasyTeamEntry, FantasyTeamId, PlayerId, PointsRule, RuleKey, ValidationError,
};

use super::round_points;

/// Multiplier for an entry. Missing multiplier keys are neutral (1.0).
pub fn entry_multiplier(entry: &FantasyTeamEntry, rule: &PointsRule) -> f64 {
    if entry.is_captain {
        rule.get(RuleKey::CaptainMultiplier).unwrap_or(1.0)
    } else if entry.is_vice_captain {
        rule.get(RuleKey::ViceCaptainMultiplier).unwrap_or(1.0)
    } else {
        1.0
    }
}

/// Sum each entry's player points, weighted by its multiplier.
/// Players with no points contribute zero.
pub fn aggregate_team_points(
    entries: &[FantasyTeamEntry],
    player_points: &HashMap<PlayerId, i64>,
    rule: &PointsRule,
) -> i64 {
    entries
        .iter()
        .map(|entry| {
            let points = player_points.get(&entry.player_id).copied().unwrap_or(0);
            round_points(points as f64 * entry_multiplier(entry, rule))
        })
        .sum()
}

/// Check the captaincy and membership invariants for one team's entries.
pub fn validate_entries(
    team_id: FantasyTeamId,
    entries: &[FantasyTeamEntry],
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let mut captains = 0;
    let mut vice_captains = 0;

    for entry in entries {
        if !seen.insert(entry.player_id) {
            return Err(ValidationError::DuplicatePlayer {
                team_id,
                player_id: entry.player_id,
            });
        }
        if entry.is_captain && entry.is_vice_captain {
            return Err(ValidationError::CaptainIsViceCaptain {
                team_id,
                player_id: entry.player_id,
            });
        }
        captains += usize::from(entry.is_captain);
        vice_captains += usize::from(entry.is_vice_captain);
    }

    if captains > 1 {
        return Err(ValidationError::MultipleCaptains { team_id });
    }
    if vice_captains > 1 {
        return Err(ValidationError::MultipleViceCaptains { team_id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squad() -> Vec<FantasyTeamEntry> {
        vec![
            FantasyTeamEntry::new(1, 1, 10).captain(),
            FantasyTeamEntry::new(2, 1, 11).vice_captain(),
            FantasyTeamEntry::new(3, 1, 12),
        ]
    }

    fn points() -> HashMap<PlayerId, i64> {
        HashMap::from([(10, 100), (11, 51), (12, 30)])
    }

    #[test]
    fn test_aggregate_with_multipliers() {
        let rule = PointsRule::standard();
        // 100 * 2 + round(51 * 1.5) + 30
        assert_eq!(aggregate_team_points(&squad(), &points(), &rule), 307);
    }

    #[test]
    fn test_missing_multipliers_are_neutral() {
        let rule = PointsRule::new();
        assert_eq!(aggregate_team_points(&squad(), &points(), &rule), 181);
    }

    #[test]
    fn test_player_without_points() {
        let rule = PointsRule::standard();
        let entries = vec![FantasyTeamEntry::new(1, 1, 99).captain()];
        assert_eq!(aggregate_team_points(&entries, &points(), &rule), 0);
    }

    #[test]
    fn test_negative_points_multiplied() {
        let rule = PointsRule::standard();
        let entries = vec![FantasyTeamEntry::new(1, 1, 10).captain()];
        let points = HashMap::from([(10, -2)]);
        assert_eq!(aggregate_team_points(&entries, &points, &rule), -4);
    }

    #[test]
    fn test_validate_entries_ok() {
        assert!(validate_entries(1, &squad()).is_ok());
        assert!(validate_entries(1, &[]).is_ok());
    }

    #[test]
    fn test_validate_two_captains() {
        let mut entries = squad();
        entries.push(FantasyTeamEntry::new(4, 1, 13).captain());
        assert_eq!(
            validate_entries(1, &entries),
            Err(ValidationError::MultipleCaptains { team_id: 1 })
        );
    }

    #[test]
    fn test_validate_two_vice_captains() {
        let mut entries = squad();
        entries.push(FantasyTeamEntry::new(4, 1, 13).vice_captain());
        assert_eq!(
            validate_entries(1, &entries),
            Err(ValidationError::MultipleViceCaptains { team_id: 1 })
        );
    }

    #[test]
    fn test_validate_captain_is_vice_captain() {
        let entries = vec![FantasyTeamEntry::new(1, 1, 10).captain().vice_captain()];
        assert_eq!(
            validate_entries(1, &entries),
            Err(ValidationError::CaptainIsViceCaptain {
                team_id: 1,
                player_id: 10
            })
        );
    }

    #[test]
    fn test_validate_duplicate_player() {
        let mut entries = squad();
        entries.push(FantasyTeamEntry::new(4, 1, 12));
        assert_eq!(
            validate_entries(1, &entries),
            Err(ValidationError::DuplicatePlayer {
                team_id: 1,
                player_id: 12
            })
        );
    }
}
