use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use uuid::Uuid;

use super::errors::ValidationError;

/// Length of a regulation period in seconds of game clock
pub const PERIOD_SECONDS: u32 = 20 * 60;

/// Longest single penalty a scorekeeper can record
pub const MAX_PENALTY_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Regulation(u8),
    Overtime,
}

impl Period {
    /// 1-based ordinal of the period; overtime follows the third period
    pub fn index(self) -> u32 {
        match self {
            Period::Regulation(n) => n as u32,
            Period::Overtime => 4,
        }
    }

    /// Rejects regulation ordinals outside 1..=3, which only arrive through stored payloads
    pub fn validate(self) -> Result<Self, ValidationError> {
        match self {
            Period::Regulation(1..=3) | Period::Overtime => Ok(self),
            Period::Regulation(n) => Err(ValidationError::InvalidPeriod(n.to_string())),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "1" => Ok(Period::Regulation(1)),
            "2" => Ok(Period::Regulation(2)),
            "3" => Ok(Period::Regulation(3)),
            "4" | "OT" => Ok(Period::Overtime),
            _ => Err(ValidationError::InvalidPeriod(raw.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Regulation(n) => write!(f, "P{}", n),
            Period::Overtime => write!(f, "OT"),
        }
    }
}

/// Time remaining in the period, counting down from 20:00
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameClock(u32);

impl GameClock {
    pub fn from_remaining_seconds(seconds: u32) -> Result<Self, ValidationError> {
        if seconds > PERIOD_SECONDS {
            return Err(ValidationError::InvalidClock(format!("{}s", seconds)));
        }
        Ok(Self(seconds))
    }

    /// Parses "MM:SS" (minutes may exceed two digits only up to 20:00)
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidClock(raw.to_string());
        let (minutes, seconds) = raw.trim().split_once(':').ok_or_else(invalid)?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        let remaining = minutes
            .checked_mul(60)
            .and_then(|total| total.checked_add(seconds))
            .ok_or_else(invalid)?;
        Self::from_remaining_seconds(remaining).map_err(|_| invalid())
    }

    pub fn remaining_seconds(self) -> u32 {
        self.0
    }

    pub fn elapsed_seconds(self) -> u32 {
        PERIOD_SECONDS.saturating_sub(self.0)
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Absolute game-time position in seconds since opening faceoff
pub fn game_time(period: Period, clock: GameClock) -> u32 {
    period.index().saturating_sub(1) * PERIOD_SECONDS + clock.elapsed_seconds()
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GoalType {
    #[default]
    EvenStrength,
    PowerPlay,
    ShortHanded,
    EmptyNet,
    PenaltyShot,
    Unknown,
}

impl GoalType {
    /// Maps a scorekeeper label (canonical or legacy abbreviation) onto a goal type
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "ev" | "es" | "even" | "evenstrength" => return GoalType::EvenStrength,
            "pp" | "ppg" | "powerplay" => return GoalType::PowerPlay,
            "sh" | "shg" | "shorthanded" => return GoalType::ShortHanded,
            "en" | "eng" | "emptynet" => return GoalType::EmptyNet,
            "ps" | "penaltyshot" => return GoalType::PenaltyShot,
            _ => {}
        }
        GoalType::iter()
            .find(|goal_type| goal_type.to_string() == normalized)
            .unwrap_or(GoalType::Unknown)
    }
}

/// Fields shared by every event a scorekeeper records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    pub id: Uuid,
    pub game_id: String,
    pub team: String,
    pub player: Option<String>,
    pub period: Option<Period>,
    pub clock: Option<GameClock>,
    pub recorded_at: DateTime<Utc>,
    /// Problems found while normalizing the source record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defects: Vec<ValidationError>,
}

impl EventHeader {
    pub fn game_time(&self) -> Result<u32, ValidationError> {
        let period = self
            .period
            .ok_or_else(|| ValidationError::missing("period"))?
            .validate()?;
        let clock = self.clock.ok_or_else(|| ValidationError::missing("clock"))?;
        let clock = GameClock::from_remaining_seconds(clock.remaining_seconds())?;
        Ok(game_time(period, clock))
    }

    pub fn player(&self) -> Result<&str, ValidationError> {
        self.player
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ValidationError::missing("player"))
    }

    /// Team name with surrounding whitespace removed; empty when missing
    pub fn team(&self) -> &str {
        self.team.trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// First assist, then second assist
    #[serde(default)]
    pub assists: Vec<String>,
    #[serde(default)]
    pub goal_type: GoalType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    pub penalty_type: Option<String>,
    pub duration_minutes: Option<u32>,
}

/// Events a scorekeeper submits during a game
///
/// Events are facts about things that already happened on the ice. They are
/// appended to a per-game log and never mutated; all match state is derived
/// from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    Goal(GoalEvent),
    Penalty(PenaltyEvent),
}

impl GameEvent {
    pub fn header(&self) -> &EventHeader {
        match self {
            GameEvent::Goal(goal) => &goal.header,
            GameEvent::Penalty(penalty) => &penalty.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        match self {
            GameEvent::Goal(goal) => &mut goal.header,
            GameEvent::Penalty(penalty) => &mut penalty.header,
        }
    }

    pub fn id(&self) -> Uuid {
        self.header().id
    }

    pub fn game_id(&self) -> &str {
        &self.header().game_id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.header().recorded_at
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::Goal(_) => "goal",
            GameEvent::Penalty(_) => "penalty",
        }
    }
}

/// Stable ordering by recorded-at; events sharing a timestamp keep log order
pub fn sort_by_recorded_at(events: &mut [GameEvent]) {
    events.sort_by_key(|event| event.recorded_at());
}
