//! Normalization boundary for scorekeeper records.
//!
//! Older clients wrote the same facts under different field names
//! (`teamName`, `scoringTeam`, `time`, `timeRemaining`, ...). Every spelling is
//! accepted here and mapped once onto the canonical [`GameEvent`] shape, so
//! nothing downstream ever branches on field-name variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::errors::ValidationError;
use super::events::{
    EventHeader, GameClock, GameEvent, GoalEvent, GoalType, PenaltyEvent, Period,
    MAX_PENALTY_MINUTES,
};

/// A value older clients sent either as a number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(i64),
    Text(String),
}

impl Scalar {
    fn as_text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        }
    }
}

/// Assists arrive as a list or as a single comma separated string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssistList {
    Names(Vec<String>),
    Joined(String),
}

/// Event record as it is stored by any client version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventRecord {
    pub id: Option<Uuid>,
    pub game_id: Option<String>,

    pub kind: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub event_type: Option<String>,

    pub team: Option<String>,
    pub team_name: Option<String>,
    pub scoring_team: Option<String>,
    pub penalized_team: Option<String>,

    pub player: Option<String>,
    pub player_name: Option<String>,
    pub scorer: Option<String>,
    pub penalized_player: Option<String>,

    pub period: Option<Scalar>,

    pub time: Option<String>,
    pub time_remaining: Option<String>,
    pub clock: Option<String>,

    pub assists: Option<AssistList>,
    pub assist1: Option<String>,
    pub assist2: Option<String>,

    pub goal_type: Option<String>,

    pub penalty_type: Option<String>,
    pub infraction: Option<String>,

    pub duration: Option<Scalar>,
    pub minutes: Option<Scalar>,
    pub penalty_minutes: Option<Scalar>,
    pub length: Option<Scalar>,

    pub recorded_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub timestamp: Option<DateTime<Utc>>,
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

impl RawEventRecord {
    /// Converts the record into a canonical event.
    ///
    /// Only a missing kind or a missing timestamp rejects the whole record: without
    /// them the event has no variant or no place in the log. Unparseable clock,
    /// period or duration values are kept as defects on the header so that the
    /// reconstructor can exclude the event from classification while still
    /// counting its score contribution.
    pub fn into_event(self, fallback_game_id: &str) -> Result<GameEvent, ValidationError> {
        let kind = first_present(&[&self.kind, &self.type_, &self.event_type])
            .ok_or_else(|| ValidationError::missing("kind"))?
            .to_ascii_lowercase();

        let recorded_at = self
            .recorded_at
            .or(self.created_at)
            .or(self.timestamp)
            .ok_or_else(|| ValidationError::missing("recorded_at"))?;

        let mut defects = Vec::new();

        let period = self.period.as_ref().and_then(|raw| {
            Period::parse(&raw.as_text())
                .map_err(|err| defects.push(err))
                .ok()
        });

        let clock = first_present(&[&self.time, &self.time_remaining, &self.clock]).and_then(
            |raw| GameClock::parse(raw).map_err(|err| defects.push(err)).ok(),
        );

        let team = first_present(&[
            &self.team,
            &self.team_name,
            &self.scoring_team,
            &self.penalized_team,
        ])
        .unwrap_or_default()
        .to_string();

        let player = first_present(&[
            &self.player,
            &self.player_name,
            &self.scorer,
            &self.penalized_player,
        ])
        .map(str::to_string);

        let game_id = self
            .game_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(fallback_game_id)
            .to_string();

        match kind.as_str() {
            "goal" => {
                let assists = self.collect_assists();
                let goal_type = self
                    .goal_type
                    .as_deref()
                    .map(GoalType::from_label)
                    .unwrap_or_default();
                Ok(GameEvent::Goal(GoalEvent {
                    header: EventHeader {
                        id: self.id.unwrap_or_else(Uuid::nil),
                        game_id,
                        team,
                        player,
                        period,
                        clock,
                        recorded_at,
                        defects,
                    },
                    assists,
                    goal_type,
                }))
            }
            "penalty" => {
                let duration_minutes = [
                    &self.duration,
                    &self.minutes,
                    &self.penalty_minutes,
                    &self.length,
                ]
                    .into_iter()
                    .flatten()
                    .next()
                    .and_then(|raw| parse_duration(raw).map_err(|err| defects.push(err)).ok());
                let penalty_type =
                    first_present(&[&self.penalty_type, &self.infraction]).map(str::to_string);
                Ok(GameEvent::Penalty(PenaltyEvent {
                    header: EventHeader {
                        id: self.id.unwrap_or_else(Uuid::nil),
                        game_id,
                        team,
                        player,
                        period,
                        clock,
                        recorded_at,
                        defects,
                    },
                    penalty_type,
                    duration_minutes,
                }))
            }
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }

    fn collect_assists(&self) -> Vec<String> {
        let listed: Vec<String> = match &self.assists {
            Some(AssistList::Names(names)) => names.clone(),
            Some(AssistList::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
            None => vec![self.assist1.clone(), self.assist2.clone()]
                .into_iter()
                .flatten()
                .collect(),
        };

        listed
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .take(2)
            .collect()
    }
}

fn parse_duration(raw: &Scalar) -> Result<u32, ValidationError> {
    let text = raw.as_text();
    let digits = text
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c.is_whitespace())
        .trim();
    match digits.parse::<u32>() {
        Ok(minutes) if (1..=MAX_PENALTY_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(ValidationError::InvalidDuration(text)),
    }
}

/// Records that could not become events, with their position in the input
pub type RejectedRecords = Vec<(usize, ValidationError)>;

/// Normalizes a batch of raw records for one game, keeping input order.
pub fn normalize_records(
    game_id: &str,
    records: Vec<RawEventRecord>,
) -> (Vec<GameEvent>, RejectedRecords) {
    let mut events = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        match record.into_event(game_id) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(game_id = %game_id, index, error = %err, "Dropping unreadable event record");
                rejected.push((index, err));
            }
        }
    }

    (events, rejected)
}
