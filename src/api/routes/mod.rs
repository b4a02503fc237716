//! Route handlers, one module per resource.

pub mod fantasy_teams;
pub mod leaderboard;
pub mod leagues;
pub mod matches;
pub mod overview;
pub mod performances;
pub mod players;
pub mod teams;
