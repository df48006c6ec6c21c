use std::collections::BTreeMap;

use crate::game::{DerivedGameState, GameRecord, PlayerKey};

use super::super::{CollectedData, StatCollector};

/// Emits goals and assists from classified goals, plus each player's game line
pub struct ScoringCollector;

impl Default for ScoringCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringCollector {
    pub fn new() -> Self {
        Self
    }
}

impl StatCollector for ScoringCollector {
    fn collect(&self, _game: &GameRecord, state: &DerivedGameState) -> Vec<CollectedData> {
        let mut data = Vec::new();
        let mut lines: BTreeMap<PlayerKey, (u32, u32)> = BTreeMap::new();

        for goal in &state.goals {
            let scorer = PlayerKey::new(&goal.scorer, &goal.team);
            let line = lines.entry(scorer.clone()).or_default();
            line.0 += 1;
            line.1 += 1;
            data.push(CollectedData::Goal {
                scorer,
                strength: goal.classification.strength,
            });

            for assister in goal.assists.iter().take(2) {
                let player = PlayerKey::new(assister, &goal.team);
                lines.entry(player.clone()).or_default().1 += 1;
                data.push(CollectedData::Assist { player });
            }
        }

        data.extend(
            lines
                .into_iter()
                .map(|(player, (goals, points))| CollectedData::GameLine {
                    player,
                    goals,
                    points,
                }),
        );
        data
    }

    fn name(&self) -> &'static str {
        "ScoringCollector"
    }
}
