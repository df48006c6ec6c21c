use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{GameRecord, GameStatus};
use crate::shared::AppError;

/// Game metadata lookup
#[async_trait]
pub trait GameDirectory: Send + Sync {
    async fn get_game(&self, game_id: &str) -> Result<Option<GameRecord>, AppError>;
    async fn list_games(&self, division: &str) -> Result<Vec<GameRecord>, AppError>;
    async fn list_divisions(&self) -> Result<Vec<String>, AppError>;
}

/// Looks a game up, degrading to "Unknown" metadata when the directory fails
/// or does not know the game. Never fails.
#[instrument(skip(directory))]
pub async fn resolve_game(directory: &dyn GameDirectory, game_id: &str) -> GameRecord {
    match directory.get_game(game_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            warn!(game_id = %game_id, "Game metadata not found, using Unknown division");
            GameRecord::unknown(game_id)
        }
        Err(err) => {
            warn!(game_id = %game_id, error = %err, "Game metadata lookup failed, using Unknown division");
            GameRecord::unknown(game_id)
        }
    }
}

/// In-memory implementation of GameDirectory for development and testing
#[derive(Debug, Default)]
pub struct InMemoryGameDirectory {
    games: Arc<RwLock<BTreeMap<String, GameRecord>>>,
}

impl InMemoryGameDirectory {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Inserts or replaces a game's metadata
    pub async fn put_game(&self, record: GameRecord) {
        let mut games = self.games.write().await;
        debug!(game_id = %record.id, division = %record.division, "Storing game metadata");
        games.insert(record.id.clone(), record);
    }

    pub async fn set_status(&self, game_id: &str, status: GameStatus) -> Result<(), AppError> {
        let mut games = self.games.write().await;
        let record = games
            .get_mut(game_id)
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", game_id)))?;
        record.status = status;
        Ok(())
    }
}

#[async_trait]
impl GameDirectory for InMemoryGameDirectory {
    async fn get_game(&self, game_id: &str) -> Result<Option<GameRecord>, AppError> {
        let games = self.games.read().await;
        Ok(games.get(game_id).cloned())
    }

    async fn list_games(&self, division: &str) -> Result<Vec<GameRecord>, AppError> {
        let games = self.games.read().await;
        Ok(games
            .values()
            .filter(|record| record.division == division)
            .cloned()
            .collect())
    }

    async fn list_divisions(&self) -> Result<Vec<String>, AppError> {
        let games = self.games.read().await;
        let mut divisions: Vec<String> = games.values().map(|r| r.division.clone()).collect();
        divisions.sort();
        divisions.dedup();
        Ok(divisions)
    }
}

/// PostgreSQL implementation of GameDirectory backed by the `games` table
pub struct PostgresGameDirectory {
    pool: PgPool,
}

impl PostgresGameDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<GameRecord, AppError> {
        let status: String = row
            .try_get("status")
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        let status = match status.as_str() {
            "final" => GameStatus::Final,
            "in_progress" => GameStatus::InProgress,
            _ => GameStatus::Scheduled,
        };

        Ok(GameRecord {
            id: row
                .try_get("id")
                .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            division: row
                .try_get("division")
                .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            home_team: row
                .try_get("home_team")
                .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            away_team: row
                .try_get("away_team")
                .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            status,
            scheduled_at: row
                .try_get("scheduled_at")
                .map_err(|e| AppError::DatabaseError(e.to_string()))?,
        })
    }
}

#[async_trait]
impl GameDirectory for PostgresGameDirectory {
    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<GameRecord>, AppError> {
        let row = sqlx::query(
            "SELECT id, division, home_team, away_team, status, scheduled_at FROM games WHERE id = $1",
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id = %game_id, "Failed to fetch game from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_games(&self, division: &str) -> Result<Vec<GameRecord>, AppError> {
        let rows = sqlx::query(
            "SELECT id, division, home_team, away_team, status, scheduled_at FROM games WHERE division = $1 ORDER BY scheduled_at ASC NULLS LAST, id ASC",
        )
        .bind(division)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, division = %division, "Failed to list games from database");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(Self::record_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_divisions(&self) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query("SELECT DISTINCT division FROM games ORDER BY division")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list divisions from database");
                AppError::DatabaseError(e.to_string())
            })?;

        rows.iter()
            .map(|row| {
                row.try_get("division")
                    .map_err(|e| AppError::DatabaseError(e.to_string()))
            })
            .collect()
    }
}
