use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::event::{normalize_records, EventLog, RawEventRecord};
use crate::game::{GameRecord, InMemoryGameDirectory};
use crate::shared::AppError;

/// Seed file shape: game metadata plus raw event records from any client version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub games: Vec<GameRecord>,
    #[serde(default)]
    pub events: Vec<RawEventRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub games: usize,
    pub events: usize,
    pub rejected: usize,
}

impl SeedData {
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!("cannot read seed file {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Loads games into the directory and normalized events into the log
    #[instrument(skip_all)]
    pub async fn apply(
        self,
        directory: &InMemoryGameDirectory,
        event_log: &dyn EventLog,
    ) -> Result<SeedSummary, AppError> {
        let mut summary = SeedSummary {
            games: self.games.len(),
            ..SeedSummary::default()
        };
        for game in self.games {
            directory.put_game(game).await;
        }

        let mut by_game: BTreeMap<String, Vec<RawEventRecord>> = BTreeMap::new();
        for record in self.events {
            match record.game_id.as_deref().map(str::trim) {
                Some(game_id) if !game_id.is_empty() => {
                    by_game.entry(game_id.to_string()).or_default().push(record)
                }
                _ => {
                    warn!("Skipping seed event without a game id");
                    summary.rejected += 1;
                }
            }
        }

        for (game_id, records) in by_game {
            let (events, rejected) = normalize_records(&game_id, records);
            summary.rejected += rejected.len();
            for event in events {
                event_log.append_event(&game_id, event).await?;
                summary.events += 1;
            }
        }

        info!(
            games = summary.games,
            events = summary.events,
            rejected = summary.rejected,
            "Seed data loaded"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InMemoryEventLog;
    use crate::game::GameDirectory;
    use serde_json::json;

    #[tokio::test]
    async fn applies_games_and_legacy_events() {
        let seed: SeedData = serde_json::from_value(json!({
            "games": [{
                "id": "g1",
                "division": "Gold",
                "home_team": "Blades",
                "away_team": "Pucks",
                "status": "final"
            }],
            "events": [
                {
                    "gameId": "g1",
                    "type": "goal",
                    "scoringTeam": "Blades",
                    "scorer": "Adams",
                    "period": 1,
                    "timeRemaining": "15:00",
                    "assists": "Brown, Clark",
                    "createdAt": "2024-01-05T19:10:00Z"
                },
                {
                    "gameId": "g1",
                    "eventType": "penalty",
                    "penalizedTeam": "Pucks",
                    "playerName": "Park",
                    "period": "2",
                    "time": "10:00",
                    "infraction": "Roughing",
                    "minutes": "2",
                    "timestamp": "2024-01-05T19:40:00Z"
                },
                { "gameId": "g1", "team": "Blades" },
                { "type": "goal", "team": "Blades", "createdAt": "2024-01-05T19:45:00Z" }
            ]
        }))
        .unwrap();

        let directory = InMemoryGameDirectory::new();
        let log = InMemoryEventLog::new();
        let summary = seed.apply(&directory, &log).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                games: 1,
                events: 2,
                rejected: 2,
            }
        );
        assert!(directory.get_game("g1").await.unwrap().is_some());
        assert_eq!(log.event_count("g1").await, 2);
    }

    #[tokio::test]
    async fn missing_seed_file_is_a_config_error() {
        let result = SeedData::load(Path::new("/nonexistent/seed.json")).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
