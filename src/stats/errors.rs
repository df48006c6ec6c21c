use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;

use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<AppError> for StatsError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Serialization(message) => StatsError::Serialization(message),
            other => StatsError::Repository(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        AppError::from(err).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GapReason {
    /// Game has not been marked final
    NotFinal,
    /// One or both sides are missing from the game's metadata
    MissingTeams,
}

/// A game left out of team tallies. Not an error: its player events still count.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("game {game_id} has no final-score summary ({reason})")]
pub struct AggregationGap {
    pub game_id: String,
    pub reason: GapReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_failures_surface_as_serialization_errors() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(StatsError::from(err), StatsError::Serialization(_)));
    }

    #[test]
    fn collaborator_failures_surface_as_repository_errors() {
        let err = StatsError::from(AppError::DatabaseError("offline".into()));
        assert_eq!(err.to_string(), "Repository error: Database error: offline");
    }
}
