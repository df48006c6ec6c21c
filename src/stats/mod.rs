pub mod collectors;

mod aggregator;
mod errors;
mod models;
mod ranking;

pub use aggregator::{aggregate, Aggregator, AggregatorBuilder};
pub use errors::{AggregationGap, GapReason, StatsError};
pub use models::*;
pub use ranking::{compare_players, compare_teams, rank_players, rank_teams};

use crate::game::{DerivedGameState, GameRecord};

/// Extracts one kind of season data from a game's derived state
pub trait StatCollector: Send + Sync {
    fn collect(&self, game: &GameRecord, state: &DerivedGameState) -> Vec<CollectedData>;

    fn name(&self) -> &'static str;
}
