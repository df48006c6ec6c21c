use crate::game::{DerivedGameState, GameRecord};

use super::super::{CollectedData, StatCollector};

/// Emits penalty minutes per player and per team
pub struct PenaltyCollector;

impl Default for PenaltyCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl PenaltyCollector {
    pub fn new() -> Self {
        Self
    }
}

impl StatCollector for PenaltyCollector {
    fn collect(&self, _game: &GameRecord, state: &DerivedGameState) -> Vec<CollectedData> {
        let players = state
            .player_pim
            .iter()
            .map(|(player, minutes)| CollectedData::PlayerPenalty {
                player: player.clone(),
                minutes: *minutes,
            });
        let teams = state
            .team_pim
            .iter()
            .map(|(team, minutes)| CollectedData::TeamPenalty {
                team: team.clone(),
                minutes: *minutes,
            });

        players.chain(teams).collect()
    }

    fn name(&self) -> &'static str {
        "PenaltyCollector"
    }
}
