//! Fantasy points for a single performance.

use std::fmt;

use crate::models::{Performance, PlayerRole, PointsRule, RuleKey};

/// Additional scoring beyond the base formula.
///
/// Extensions receive the player's role so they may gate bonuses on it.
pub trait ScoringExtension: Send + Sync {
    /// Label used in breakdowns.
    fn name(&self) -> &'static str;

    /// Unrounded points contributed by this extension.
    fn points(&self, performance: &Performance, rule: &PointsRule, role: Option<PlayerRole>)
        -> f64;
}

/// Maiden over bonus. Contributes nothing unless the performance carries
/// a maiden count, which only ball-by-ball sources provide.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaidenOverBonus;

impl ScoringExtension for MaidenOverBonus {
    fn name(&self) -> &'static str {
        "maidenOver"
    }

    fn points(&self, performance: &Performance, rule: &PointsRule, _: Option<PlayerRole>) -> f64 {
        performance
            .maiden_overs
            .map_or(0.0, |m| m as f64 * rule.weight(RuleKey::MaidenOver))
    }
}

/// One non-zero contribution to a points total.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsTerm {
    pub label: &'static str,
    pub points: f64,
}

/// Points total with the terms that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsBreakdown {
    pub terms: Vec<PointsTerm>,
    pub total: i64,
}

/// Highest batting milestone reached, if any.
pub fn batting_milestone(runs: u32) -> Option<RuleKey> {
    if runs >= 100 {
        Some(RuleKey::HundredRuns)
    } else if runs >= 50 {
        Some(RuleKey::FiftyRuns)
    } else if runs >= 30 {
        Some(RuleKey::ThirtyRuns)
    } else {
        None
    }
}

/// Highest wicket haul reached, if any.
pub fn wicket_haul(wickets: u32) -> Option<RuleKey> {
    if wickets >= 5 {
        Some(RuleKey::FiveWickets)
    } else if wickets >= 4 {
        Some(RuleKey::FourWickets)
    } else if wickets >= 3 {
        Some(RuleKey::ThreeWickets)
    } else {
        None
    }
}

/// Round a fractional total to whole points.
pub fn round_points(points: f64) -> i64 {
    points.round() as i64
}

/// Converts performances into fantasy points under a rule set.
///
/// Captain and vice-captain multipliers are not applied here; see
/// [`aggregate_team_points`](super::aggregate_team_points).
#[derive(Default)]
pub struct PointsCalculator {
    extensions: Vec<Box<dyn ScoringExtension>>,
}

impl fmt::Debug for PointsCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.extensions.iter().map(|e| e.name()).collect();
        f.debug_struct("PointsCalculator")
            .field("extensions", &names)
            .finish()
    }
}

impl PointsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register an extension.
    pub fn with_extension(mut self, extension: impl ScoringExtension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Fantasy points for one performance.
    pub fn calculate(
        &self,
        performance: &Performance,
        rule: &PointsRule,
        role: Option<PlayerRole>,
    ) -> i64 {
        self.breakdown(performance, rule, role).total
    }

    /// Fantasy points with each contributing term.
    pub fn breakdown(
        &self,
        performance: &Performance,
        rule: &PointsRule,
        role: Option<PlayerRole>,
    ) -> PointsBreakdown {
        let p = performance;
        let mut terms = Vec::new();
        let mut push = |label: &'static str, points: f64| {
            if points != 0.0 {
                terms.push(PointsTerm { label, points });
            }
        };

        let counted = [
            (RuleKey::Run, p.runs),
            (RuleKey::Four, p.fours),
            (RuleKey::Six, p.sixes),
            (RuleKey::Wicket, p.wickets),
            (RuleKey::Catch, p.catches),
            (RuleKey::Stumping, p.stumpings),
            (RuleKey::RunOut, p.run_outs),
        ];
        for (key, n) in counted {
            push(key.as_str(), n as f64 * rule.weight(key));
        }

        if let Some(key) = batting_milestone(p.runs) {
            push(key.as_str(), rule.weight(key));
        }
        if let Some(key) = wicket_haul(p.wickets) {
            push(key.as_str(), rule.weight(key));
        }
        if p.is_duck() {
            push(RuleKey::Duck.as_str(), rule.weight(RuleKey::Duck));
        }

        for extension in &self.extensions {
            push(extension.name(), extension.points(p, rule, role));
        }

        let total = round_points(terms.iter().map(|t| t.points).sum());
        PointsBreakdown { terms, total }
    }
}
