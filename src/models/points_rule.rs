//! Fantasy points rule sets.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Fingerprint;

/// Event names a rule set can weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Run,
    Four,
    Six,
    Wicket,
    Catch,
    Stumping,
    RunOut,
    MaidenOver,
    Duck,
    ThirtyRuns,
    FiftyRuns,
    HundredRuns,
    ThreeWickets,
    FourWickets,
    FiveWickets,
    CaptainMultiplier,
    ViceCaptainMultiplier,
}

impl RuleKey {
    pub const ALL: [RuleKey; 17] = [
        RuleKey::Run,
        RuleKey::Four,
        RuleKey::Six,
        RuleKey::Wicket,
        RuleKey::Catch,
        RuleKey::Stumping,
        RuleKey::RunOut,
        RuleKey::MaidenOver,
        RuleKey::Duck,
        RuleKey::ThirtyRuns,
        RuleKey::FiftyRuns,
        RuleKey::HundredRuns,
        RuleKey::ThreeWickets,
        RuleKey::FourWickets,
        RuleKey::FiveWickets,
        RuleKey::CaptainMultiplier,
        RuleKey::ViceCaptainMultiplier,
    ];

    /// Key as it appears in a stored rules config.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKey::Run => "run",
            RuleKey::Four => "four",
            RuleKey::Six => "six",
            RuleKey::Wicket => "wicket",
            RuleKey::Catch => "catch",
            RuleKey::Stumping => "stumping",
            RuleKey::RunOut => "runOut",
            RuleKey::MaidenOver => "maidenOver",
            RuleKey::Duck => "duck",
            RuleKey::ThirtyRuns => "thirtyRuns",
            RuleKey::FiftyRuns => "fiftyRuns",
            RuleKey::HundredRuns => "hundredRuns",
            RuleKey::ThreeWickets => "threeWickets",
            RuleKey::FourWickets => "fourWickets",
            RuleKey::FiveWickets => "fiveWickets",
            RuleKey::CaptainMultiplier => "captainMultiplier",
            RuleKey::ViceCaptainMultiplier => "viceCaptainMultiplier",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something wrong with a rule set that was tolerated rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleWarning {
    /// Value was not a finite number; weighs zero.
    Malformed(String),
    /// Key is not one the calculator knows; ignored.
    Unknown(String),
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleWarning::Malformed(key) => {
                write!(f, "rule '{}' is not a number, treating as 0", key)
            }
            RuleWarning::Unknown(key) => write!(f, "rule '{}' is not recognized", key),
        }
    }
}

/// A mapping from event name to numeric weight.
///
/// Lookups of missing keys weigh zero. Deserialization never fails on a bad
/// value: non-numeric entries are dropped and reported through
/// [`PointsRule::warnings`] so the caller can log them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointsRule {
    weights: BTreeMap<String, f64>,
    malformed: Vec<String>,
}

impl PointsRule {
    /// Empty rule set; every weight is zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard fantasy cricket points system.
    pub fn standard() -> Self {
        Self::new()
            .with(RuleKey::Run, 1.0)
            .with(RuleKey::Four, 1.0)
            .with(RuleKey::Six, 2.0)
            .with(RuleKey::Wicket, 25.0)
            .with(RuleKey::Catch, 8.0)
            .with(RuleKey::Stumping, 12.0)
            .with(RuleKey::RunOut, 6.0)
            .with(RuleKey::MaidenOver, 8.0)
            .with(RuleKey::Duck, -2.0)
            .with(RuleKey::ThirtyRuns, 4.0)
            .with(RuleKey::FiftyRuns, 8.0)
            .with(RuleKey::HundredRuns, 16.0)
            .with(RuleKey::ThreeWickets, 4.0)
            .with(RuleKey::FourWickets, 8.0)
            .with(RuleKey::FiveWickets, 16.0)
            .with(RuleKey::CaptainMultiplier, 2.0)
            .with(RuleKey::ViceCaptainMultiplier, 1.5)
    }

    /// Builder method to set a weight.
    pub fn with(mut self, key: RuleKey, weight: f64) -> Self {
        self.weights.insert(key.as_str().to_string(), weight);
        self
    }

    /// Build from raw config values, keeping only finite numbers.
    pub fn from_raw(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let mut rule = Self::new();
        for (key, value) in raw {
            match value.as_f64().filter(|v| v.is_finite()) {
                Some(weight) => {
                    rule.weights.insert(key, weight);
                }
                None => rule.malformed.push(key),
            }
        }
        rule
    }

    /// Configured weight, if present and well-formed.
    pub fn get(&self, key: RuleKey) -> Option<f64> {
        self.weights.get(key.as_str()).copied()
    }

    /// Weight for an additive term; missing keys weigh zero.
    pub fn weight(&self, key: RuleKey) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    /// Tolerated problems, malformed values first.
    pub fn warnings(&self) -> Vec<RuleWarning> {
        let mut warnings: Vec<RuleWarning> = self
            .malformed
            .iter()
            .cloned()
            .map(RuleWarning::Malformed)
            .collect();
        warnings.extend(
            self.weights
                .keys()
                .filter(|k| RuleKey::parse(k).is_none())
                .cloned()
                .map(RuleWarning::Unknown),
        );
        warnings
    }

    /// Content fingerprint over the sorted weights.
    pub fn fingerprint(&self) -> Fingerprint {
        let fields: Vec<String> = self
            .weights
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        Fingerprint::generate(&refs)
    }

    /// Iterate over the well-formed weights in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Serialize for PointsRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.weights.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PointsRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}
