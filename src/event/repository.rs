use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::events::{sort_by_recorded_at, GameEvent};
use crate::shared::AppError;

/// Append-only, per-game ordered event log
#[async_trait]
pub trait EventLog: Send + Sync {
    /// All events for a game, ordered by recorded-at ascending; events sharing a
    /// timestamp come back in the order they were appended
    async fn get_events(&self, game_id: &str) -> Result<Vec<GameEvent>, AppError>;

    /// Commits an event to the game's log and returns the stored copy.
    ///
    /// Events arriving without an id get a fresh one. Appending an id that is
    /// already stored is a no-op that returns the stored event.
    async fn append_event(&self, game_id: &str, event: GameEvent) -> Result<GameEvent, AppError>;
}

fn prepare_for_append(game_id: &str, mut event: GameEvent) -> GameEvent {
    let header = event.header_mut();
    if header.id.is_nil() {
        header.id = Uuid::new_v4();
    }
    header.game_id = game_id.to_string();
    event
}

/// In-memory implementation of EventLog for development and testing
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    games: Arc<RwLock<HashMap<String, Vec<GameEvent>>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of events stored for a game
    pub async fn event_count(&self, game_id: &str) -> usize {
        let games = self.games.read().await;
        games.get(game_id).map(Vec::len).unwrap_or_default()
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    #[instrument(skip(self))]
    async fn get_events(&self, game_id: &str) -> Result<Vec<GameEvent>, AppError> {
        let games = self.games.read().await;
        let mut events = games.get(game_id).cloned().unwrap_or_default();
        sort_by_recorded_at(&mut events);

        debug!(game_id = %game_id, event_count = events.len(), "Read game events from memory");
        Ok(events)
    }

    #[instrument(skip(self, event))]
    async fn append_event(&self, game_id: &str, event: GameEvent) -> Result<GameEvent, AppError> {
        let event = prepare_for_append(game_id, event);

        let mut games = self.games.write().await;
        let log = games.entry(game_id.to_string()).or_default();

        if let Some(existing) = log.iter().find(|stored| stored.id() == event.id()) {
            debug!(game_id = %game_id, event_id = %event.id(), "Event already in log");
            return Ok(existing.clone());
        }

        log.push(event.clone());
        debug!(
            game_id = %game_id,
            event_id = %event.id(),
            event_type = event.event_type(),
            "Event appended to memory log"
        );
        Ok(event)
    }
}

/// PostgreSQL implementation of EventLog
///
/// Events are stored as JSON payloads in `game_events`; the `seq` column keeps
/// insertion order for events sharing a recorded-at timestamp.
pub struct PostgresEventLog {
    pool: PgPool,
}

impl PostgresEventLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLog for PostgresEventLog {
    #[instrument(skip(self))]
    async fn get_events(&self, game_id: &str) -> Result<Vec<GameEvent>, AppError> {
        let rows = sqlx::query(
            "SELECT payload FROM game_events WHERE game_id = $1 ORDER BY recorded_at ASC, seq ASC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id = %game_id, "Failed to read game events from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let payload: String = row
                .try_get("payload")
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;
            events.push(serde_json::from_str(&payload)?);
        }

        debug!(game_id = %game_id, event_count = events.len(), "Read game events from database");
        Ok(events)
    }

    #[instrument(skip(self, event))]
    async fn append_event(&self, game_id: &str, event: GameEvent) -> Result<GameEvent, AppError> {
        let event = prepare_for_append(game_id, event);
        let payload = serde_json::to_string(&event)?;

        sqlx::query(
            "INSERT INTO game_events (id, game_id, recorded_at, payload) VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO NOTHING",
        )
        .bind(event.id())
        .bind(game_id)
        .bind(event.recorded_at())
        .bind(&payload)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id = %game_id, "Failed to append game event");
            AppError::DatabaseError(e.to_string())
        })?;

        let row = sqlx::query("SELECT payload FROM game_events WHERE id = $1")
            .bind(event.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        let stored: String = row
            .try_get("payload")
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(serde_json::from_str(&stored)?)
    }
}
