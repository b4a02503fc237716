//! Record identifiers and deterministic content fingerprints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Type alias for manager (user) IDs
pub type UserId = u32;

/// Type alias for league IDs
pub type LeagueId = u32;

/// Type alias for points system IDs
pub type PointsSystemId = u32;

/// Type alias for real-world (IPL) team IDs
pub type IplTeamId = u32;

/// Type alias for player IDs
pub type PlayerId = u32;

/// Type alias for match IDs
pub type MatchId = u32;

/// Type alias for performance IDs
pub type PerformanceId = u32;

/// Type alias for fantasy team IDs
pub type FantasyTeamId = u32;

/// Type alias for fantasy team entry IDs
pub type EntryId = u32;

/// A deterministic fingerprint derived from content hash.
///
/// Used to tag stored fantasy-points values with the rule set they were
/// computed under.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Generate a fingerprint from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Next free ID after the largest existing one, or `None` once the ID
/// space is used up.
pub fn next_id<I>(ids: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    match ids.into_iter().max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = Fingerprint::generate(&["run=1", "six=2"]);
        let b = Fingerprint::generate(&["run=1", "six=2"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_different_inputs() {
        let a = Fingerprint::generate(&["run=1", "six=2"]);
        let b = Fingerprint::generate(&["run=1", "six=3"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_field_boundaries_matter() {
        let a = Fingerprint::generate(&["ab", "c"]);
        let b = Fingerprint::generate(&["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_hex_format() {
        let fp = Fingerprint::generate(&["test"]);
        assert_eq!(fp.as_str().len(), 16);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_serialization() {
        let fp = Fingerprint::generate(&["test"]);
        let json = serde_json::to_string(&fp).unwrap();
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(Vec::<u32>::new()), Some(1));
        assert_eq!(next_id(vec![3, 1, 7]), Some(8));
    }

    #[test]
    fn test_next_id_exhausted() {
        assert_eq!(next_id(vec![1, u32::MAX]), None);
        assert_eq!(next_id(vec![u32::MAX - 1]), Some(u32::MAX));
    }
}
