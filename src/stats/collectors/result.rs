use tracing::debug;

use crate::game::{DerivedGameState, GameRecord, GameStatus};

use super::super::{AggregationGap, CollectedData, GameOutcome, GapReason, StatCollector};

/// Emits each side's result, or a gap when the game has no final-score summary
pub struct ResultCollector;

impl Default for ResultCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCollector {
    pub fn new() -> Self {
        Self
    }
}

impl StatCollector for ResultCollector {
    fn collect(&self, game: &GameRecord, state: &DerivedGameState) -> Vec<CollectedData> {
        let teams = match game.teams() {
            Some(teams) if game.status == GameStatus::Final => teams,
            Some(_) => return vec![gap(game, GapReason::NotFinal)],
            None => return vec![gap(game, GapReason::MissingTeams)],
        };

        [(&teams.home, &teams.away), (&teams.away, &teams.home)]
            .into_iter()
            .map(|(team, opponent)| {
                let goals_for = state.score_of(team);
                let goals_against = state.score_of(opponent);
                CollectedData::TeamResult {
                    team: team.clone(),
                    goals_for,
                    goals_against,
                    outcome: GameOutcome::from_scores(goals_for, goals_against),
                }
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "ResultCollector"
    }
}

fn gap(game: &GameRecord, reason: GapReason) -> CollectedData {
    debug!(game_id = %game.id, reason = %reason, "Game excluded from team tallies");
    CollectedData::Gap(AggregationGap {
        game_id: game.id.clone(),
        reason,
    })
}
