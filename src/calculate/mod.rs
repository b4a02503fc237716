//! Scoring and ranking engine.
//!
//! Pure functions over in-memory records:
//! - Fantasy points per performance under a league's rule set
//! - Team totals with captain / vice-captain multipliers
//! - Tie-aware leaderboard ranking with rank movement

mod aggregate;
mod points;
mod ranking;

pub use aggregate::*;
pub use points::*;
pub use ranking::*;
