//! Core data models for the league.

mod fixture;
mod ids;
mod league;
mod performance;
mod player;
mod points_rule;
mod team;
mod validation;

pub use fixture::*;
pub use ids::*;
pub use league::*;
pub use performance::*;
pub use player::*;
pub use points_rule::*;
pub use team::*;
pub use validation::*;
