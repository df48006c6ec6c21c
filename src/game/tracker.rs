use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, error, info, instrument};

use super::repository::{resolve_game, GameDirectory};
use super::state::{reconstruct, DerivedGameState, EventOutcome};
use crate::event::{EventLog, GameEvent};
use crate::shared::AppError;

/// Keeps a derived-state snapshot per game and folds appended events onto it
/// instead of replaying the whole log on every append.
pub struct GameTracker {
    event_log: Arc<dyn EventLog>,
    directory: Arc<dyn GameDirectory>,
    snapshots: Arc<RwLock<HashMap<String, DerivedGameState>>>,
    game_mutexes: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl GameTracker {
    pub fn new(event_log: Arc<dyn EventLog>, directory: Arc<dyn GameDirectory>) -> Self {
        Self {
            event_log,
            directory,
            snapshots: Arc::new(RwLock::new(HashMap::new())),
            game_mutexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Appends an event to the game's log and returns its classification.
    ///
    /// The event is folded onto the cached snapshot when it sorts at or after
    /// the snapshot's watermark; otherwise the game is rebuilt from its log.
    #[instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn record_event(
        &self,
        game_id: &str,
        event: GameEvent,
    ) -> Result<EventOutcome, AppError> {
        let game_lock = self.game_lock(game_id).await;
        let _guard = game_lock.lock().await;

        let stored = self.event_log.append_event(game_id, event).await?;
        let cached = self.snapshots.read().await.get(game_id).cloned();

        let state = match cached {
            Some(state) if state.contains_event(stored.id()) => {
                debug!(game_id = %game_id, event_id = %stored.id(), "Event already folded into snapshot");
                state
            }
            Some(mut state) if state.accepts_next(&stored) => {
                state.apply(&stored);
                state
            }
            Some(_) => {
                info!(game_id = %game_id, event_id = %stored.id(), "Event precedes snapshot watermark, rebuilding");
                self.replay(game_id).await?
            }
            None => self.replay(game_id).await?,
        };

        let outcome = state.outcome_for(stored.id()).ok_or_else(|| {
            error!(game_id = %game_id, event_id = %stored.id(), "Appended event missing from derived state");
            AppError::Internal
        })?;

        self.snapshots
            .write()
            .await
            .insert(game_id.to_string(), state);
        Ok(outcome)
    }

    /// Current derived state, reconstructed from the log on first access
    #[instrument(skip(self))]
    pub async fn state(&self, game_id: &str) -> Result<DerivedGameState, AppError> {
        if let Some(state) = self.snapshots.read().await.get(game_id) {
            return Ok(state.clone());
        }

        let game_lock = self.game_lock(game_id).await;
        let _guard = game_lock.lock().await;
        self.rebuild_locked(game_id).await
    }

    /// Discards the snapshot and reconstructs the game from its full log
    #[instrument(skip(self))]
    pub async fn rebuild(&self, game_id: &str) -> Result<DerivedGameState, AppError> {
        let game_lock = self.game_lock(game_id).await;
        let _guard = game_lock.lock().await;
        self.rebuild_locked(game_id).await
    }

    /// Recomputes the game from scratch and compares it with the snapshot.
    ///
    /// A mismatch replaces the snapshot with the recomputed state and returns
    /// `false`. Games without a snapshot are trivially consistent.
    #[instrument(skip(self))]
    pub async fn verify_replay(&self, game_id: &str) -> Result<bool, AppError> {
        let game_lock = self.game_lock(game_id).await;
        let _guard = game_lock.lock().await;

        let Some(cached) = self.snapshots.read().await.get(game_id).cloned() else {
            return Ok(true);
        };

        let replayed = self.replay(game_id).await?;
        if replayed == cached {
            debug!(game_id = %game_id, "Snapshot matches full replay");
            return Ok(true);
        }

        error!(
            game_id = %game_id,
            snapshot_events = cached.watermark.as_ref().map(|w| w.events_applied),
            replayed_events = replayed.watermark.as_ref().map(|w| w.events_applied),
            "Snapshot diverged from full replay, replacing it"
        );
        self.snapshots
            .write()
            .await
            .insert(game_id.to_string(), replayed);
        Ok(false)
    }

    /// Drops a game's snapshot; the next access rebuilds it.
    ///
    /// Waits for any in-flight append on the game. The game's lock entry is
    /// kept so later writers still serialize on it.
    #[instrument(skip(self))]
    pub async fn evict(&self, game_id: &str) {
        let game_lock = self.game_lock(game_id).await;
        let _guard = game_lock.lock().await;
        self.snapshots.write().await.remove(game_id);
    }

    async fn rebuild_locked(&self, game_id: &str) -> Result<DerivedGameState, AppError> {
        let state = self.replay(game_id).await?;
        self.snapshots
            .write()
            .await
            .insert(game_id.to_string(), state.clone());
        Ok(state)
    }

    async fn replay(&self, game_id: &str) -> Result<DerivedGameState, AppError> {
        let record = resolve_game(self.directory.as_ref(), game_id).await;
        let events = self.event_log.get_events(game_id).await?;
        Ok(reconstruct(&events, record.teams().as_ref()))
    }

    async fn game_lock(&self, game_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.game_mutexes.read().await;
            if let Some(lock) = guard.get(game_id) {
                return lock.clone();
            }
        }

        let mut guard = self.game_mutexes.write().await;
        guard
            .entry(game_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}
