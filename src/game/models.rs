use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Division tag used when a game's metadata cannot be looked up
pub const UNKNOWN_DIVISION: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
}

/// The two sides attached to a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTeams {
    pub home: String,
    pub away: String,
}

impl GameTeams {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }

    pub fn contains(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// The other side, or None when `team` is not part of this game
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if team == self.home {
            Some(&self.away)
        } else if team == self.away {
            Some(&self.home)
        } else {
            None
        }
    }
}

/// Game metadata as held by the game directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub division: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl GameRecord {
    /// Placeholder metadata for a game the directory could not resolve
    pub fn unknown(game_id: &str) -> Self {
        Self {
            id: game_id.to_string(),
            division: UNKNOWN_DIVISION.to_string(),
            home_team: None,
            away_team: None,
            status: GameStatus::Scheduled,
            scheduled_at: None,
        }
    }

    pub fn teams(&self) -> Option<GameTeams> {
        match (&self.home_team, &self.away_team) {
            (Some(home), Some(away)) if !home.trim().is_empty() && !away.trim().is_empty() => {
                Some(GameTeams::new(home.trim(), away.trim()))
            }
            _ => None,
        }
    }

    /// A final-score summary exists once both sides are known and the game is over
    pub fn has_final_summary(&self) -> bool {
        self.status == GameStatus::Final && self.teams().is_some()
    }
}

/// Players are identified by name within a team
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerKey {
    pub player: String,
    pub team: String,
}

impl PlayerKey {
    pub fn new(player: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            team: team.into(),
        }
    }
}
