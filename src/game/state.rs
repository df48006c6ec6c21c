// Match state is never stored on its own: it is always a fold over a game's
// event log. `reconstruct` replays a whole log; `DerivedGameState::apply` folds
// one more event. Both paths must agree exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

use super::classify::{
    goal_context, goal_strength, penalty_context, strength_between, validate_goal,
    validate_penalty, GoalClassification, PenaltyClassification, StrengthSnapshot,
};
use super::models::{GameTeams, PlayerKey};
use crate::event::{
    sort_by_recorded_at, GameClock, GameEvent, GoalEvent, GoalType, PenaltyEvent, Period,
    ValidationError,
};

/// A penalty's span of game time, `[starts_at, ends_at)` in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyWindow {
    pub event_id: Uuid,
    pub team: String,
    pub starts_at: u32,
    pub ends_at: u32,
}

impl PenaltyWindow {
    pub fn is_active_at(&self, game_time: u32) -> bool {
        self.starts_at <= game_time && game_time < self.ends_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedGoal {
    pub event_id: Uuid,
    pub team: String,
    pub scorer: String,
    pub assists: Vec<String>,
    pub goal_type: GoalType,
    pub period: Option<Period>,
    pub clock: Option<GameClock>,
    pub game_time: u32,
    pub classification: GoalClassification,
    pub team_score_after: u32,
    pub opponent_score_after: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedPenalty {
    pub event_id: Uuid,
    pub team: String,
    pub player: String,
    pub penalty_type: String,
    pub duration_minutes: u32,
    pub game_time: u32,
    pub classification: PenaltyClassification,
}

/// An event excluded from classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub team: Option<String>,
    pub error: ValidationError,
    /// Whether the event still moved the score
    pub counted_in_score: bool,
}

/// Position of the last event folded into a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub events_applied: usize,
    pub last_event_id: Uuid,
    pub last_recorded_at: DateTime<Utc>,
}

/// What folding a single event produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    Goal(ClassifiedGoal),
    Penalty(ClassifiedPenalty),
    Rejected(RejectedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedGameState {
    teams: Option<GameTeams>,
    pub score: BTreeMap<String, u32>,
    pub goals: Vec<ClassifiedGoal>,
    pub penalties: Vec<ClassifiedPenalty>,
    pub rejected: Vec<RejectedEvent>,
    /// Events naming a team that is not one of the game's two sides
    pub unattributed: Vec<Uuid>,
    pub penalty_windows: Vec<PenaltyWindow>,
    pub strength: StrengthSnapshot,
    pub team_pim: BTreeMap<String, u32>,
    pub player_pim: BTreeMap<PlayerKey, u32>,
    pub watermark: Option<Watermark>,
}

/// Replays a game's full log into its derived state.
///
/// Events are folded in recorded-at order; events sharing a timestamp keep
/// their log order. `teams` enables unattributed-team detection and seeds both
/// sides at zero.
pub fn reconstruct(events: &[GameEvent], teams: Option<&GameTeams>) -> DerivedGameState {
    let mut ordered = events.to_vec();
    sort_by_recorded_at(&mut ordered);

    let mut state = DerivedGameState::new(teams.cloned());
    for event in &ordered {
        state.apply(event);
    }

    debug!(
        events = ordered.len(),
        goals = state.goals.len(),
        penalties = state.penalties.len(),
        rejected = state.rejected.len(),
        "Reconstructed game state"
    );
    state
}

impl DerivedGameState {
    pub fn new(teams: Option<GameTeams>) -> Self {
        let mut score = BTreeMap::new();
        if let Some(teams) = &teams {
            score.insert(teams.home.clone(), 0);
            score.insert(teams.away.clone(), 0);
        }
        Self {
            teams,
            score,
            ..Self::default()
        }
    }

    pub fn teams(&self) -> Option<&GameTeams> {
        self.teams.as_ref()
    }

    pub fn total_goals(&self) -> u32 {
        self.score.values().sum()
    }

    /// Penalties that were assessed, including ones excluded from classification
    pub fn total_penalties(&self) -> usize {
        self.penalties.len()
            + self
                .rejected
                .iter()
                .filter(|r| r.event_type == "penalty")
                .count()
    }

    pub fn score_of(&self, team: &str) -> u32 {
        self.score.get(team).copied().unwrap_or_default()
    }

    pub fn contains_event(&self, event_id: Uuid) -> bool {
        self.outcome_for(event_id).is_some()
    }

    /// The outcome recorded for an event already folded into this state
    pub fn outcome_for(&self, event_id: Uuid) -> Option<EventOutcome> {
        if let Some(goal) = self.goals.iter().find(|g| g.event_id == event_id) {
            return Some(EventOutcome::Goal(goal.clone()));
        }
        if let Some(penalty) = self.penalties.iter().find(|p| p.event_id == event_id) {
            return Some(EventOutcome::Penalty(penalty.clone()));
        }
        self.rejected
            .iter()
            .find(|r| r.event_id == event_id)
            .map(|r| EventOutcome::Rejected(r.clone()))
    }

    /// Whether `event` can be folded onto this state without reordering the log
    pub fn accepts_next(&self, event: &GameEvent) -> bool {
        match &self.watermark {
            Some(watermark) => event.recorded_at() >= watermark.last_recorded_at,
            None => true,
        }
    }

    /// Active penalty count for a team at a game-time position
    pub fn active_penalties(&self, team: &str, game_time: u32) -> usize {
        self.penalty_windows
            .iter()
            .filter(|w| w.team == team && w.is_active_at(game_time))
            .count()
    }

    /// The other side for `team`; None for an unattributed team or a game
    /// whose second side has not appeared yet
    pub fn opponent_of(&self, team: &str) -> Option<String> {
        match &self.teams {
            Some(teams) => teams.opponent_of(team).map(str::to_string),
            None => {
                let others: Vec<&String> = self.score.keys().filter(|t| *t != team).collect();
                match others.as_slice() {
                    [only] => Some((*only).clone()),
                    _ => None,
                }
            }
        }
    }

    fn opponent_score(&self, team: &str) -> u32 {
        match self.opponent_of(team) {
            Some(opponent) => self.score_of(&opponent),
            None => self
                .score
                .iter()
                .filter(|(t, _)| *t != team)
                .map(|(_, goals)| *goals)
                .max()
                .unwrap_or_default(),
        }
    }

    fn opponent_active(&self, team: &str, game_time: u32) -> usize {
        match self.opponent_of(team) {
            Some(opponent) => self.active_penalties(&opponent, game_time),
            None => self
                .penalty_windows
                .iter()
                .filter(|w| w.team != team && w.is_active_at(game_time))
                .count(),
        }
    }

    /// The two sides strength is measured between
    fn sides(&self) -> Option<(String, Option<String>)> {
        match &self.teams {
            Some(teams) => Some((teams.home.clone(), Some(teams.away.clone()))),
            None => {
                let mut known = self.score.keys();
                let first = known.next()?.clone();
                Some((first, known.next().cloned()))
            }
        }
    }

    /// Strength between the two sides at a game-time position
    pub fn strength_at(&self, game_time: u32) -> StrengthSnapshot {
        match self.sides() {
            Some((first, second)) => strength_between(
                &first,
                self.active_penalties(&first, game_time),
                second.as_deref(),
                second
                    .as_deref()
                    .map(|team| self.active_penalties(team, game_time))
                    .unwrap_or_default(),
            ),
            None => StrengthSnapshot::even(),
        }
    }

    /// Folds one more event onto the state and returns how it was classified
    pub fn apply(&mut self, event: &GameEvent) -> EventOutcome {
        let team = event.header().team().to_string();
        if !team.is_empty() {
            self.score.entry(team.clone()).or_insert(0);
            if let Some(teams) = &self.teams {
                if !teams.contains(&team) {
                    warn!(event_id = %event.id(), team = %team, "Event names a team outside this game");
                    self.unattributed.push(event.id());
                }
            }
        }

        let outcome = match event {
            GameEvent::Goal(goal) => self.apply_goal(goal),
            GameEvent::Penalty(penalty) => self.apply_penalty(penalty),
        };

        self.watermark = Some(Watermark {
            events_applied: self
                .watermark
                .as_ref()
                .map(|w| w.events_applied)
                .unwrap_or_default()
                + 1,
            last_event_id: event.id(),
            last_recorded_at: event.recorded_at(),
        });

        outcome
    }

    fn reject(
        &mut self,
        event_id: Uuid,
        event_type: &str,
        team: &str,
        error: ValidationError,
        counted_in_score: bool,
    ) -> EventOutcome {
        warn!(event_id = %event_id, event_type, error = %error, "Excluding malformed event from classification");
        let rejected = RejectedEvent {
            event_id,
            event_type: event_type.to_string(),
            team: (!team.is_empty()).then(|| team.to_string()),
            error,
            counted_in_score,
        };
        self.rejected.push(rejected.clone());
        EventOutcome::Rejected(rejected)
    }

    fn apply_goal(&mut self, goal: &GoalEvent) -> EventOutcome {
        let event_id = goal.header.id;
        let valid = match validate_goal(goal) {
            Ok(valid) => valid,
            Err(error) => {
                let team = goal.header.team();
                let counted = !team.is_empty();
                if counted {
                    *self.score.entry(team.to_string()).or_insert(0) += 1;
                }
                return self.reject(event_id, "goal", team, error, counted);
            }
        };

        let team_before = self.score_of(valid.team);
        let opponent_before = self.opponent_score(valid.team);
        let first_of_game = self.total_goals() == 0;

        let classification = GoalClassification {
            first_of_game,
            context: goal_context(team_before, opponent_before, first_of_game),
            strength: goal_strength(
                self.active_penalties(valid.team, valid.game_time),
                self.opponent_active(valid.team, valid.game_time),
            ),
        };

        *self.score.entry(valid.team.to_string()).or_insert(0) += 1;
        self.strength = self.strength_at(valid.game_time);

        let classified = ClassifiedGoal {
            event_id,
            team: valid.team.to_string(),
            scorer: valid.scorer.to_string(),
            assists: goal.assists.clone(),
            goal_type: goal.goal_type,
            period: goal.header.period,
            clock: goal.header.clock,
            game_time: valid.game_time,
            classification,
            team_score_after: team_before + 1,
            opponent_score_after: opponent_before,
        };

        debug!(
            event_id = %event_id,
            team = %classified.team,
            label = %classified.classification.primary_label(),
            strength = %classified.classification.strength,
            "Classified goal"
        );

        self.goals.push(classified.clone());
        EventOutcome::Goal(classified)
    }

    fn apply_penalty(&mut self, penalty: &PenaltyEvent) -> EventOutcome {
        let event_id = penalty.header.id;
        let valid = match validate_penalty(penalty) {
            Ok(valid) => valid,
            Err(error) => {
                let team = penalty.header.team();
                return self.reject(event_id, "penalty", team, error, false);
            }
        };

        let first_of_game = self.penalties.is_empty();
        let context = penalty_context(valid.penalty_type, valid.duration_minutes);

        self.penalty_windows.push(PenaltyWindow {
            event_id,
            team: valid.team.to_string(),
            starts_at: valid.game_time,
            ends_at: valid
                .game_time
                .saturating_add(valid.duration_minutes.saturating_mul(60)),
        });
        let team_pim = self.team_pim.entry(valid.team.to_string()).or_insert(0);
        *team_pim = team_pim.saturating_add(valid.duration_minutes);
        let player_pim = self
            .player_pim
            .entry(PlayerKey::new(valid.player, valid.team))
            .or_insert(0);
        *player_pim = player_pim.saturating_add(valid.duration_minutes);

        let strength_after = self.strength_at(valid.game_time);
        self.strength = strength_after.clone();

        let classified = ClassifiedPenalty {
            event_id,
            team: valid.team.to_string(),
            player: valid.player.to_string(),
            penalty_type: valid.penalty_type.to_string(),
            duration_minutes: valid.duration_minutes,
            game_time: valid.game_time,
            classification: PenaltyClassification {
                first_of_game,
                context,
                strength_after,
            },
        };

        debug!(
            event_id = %event_id,
            team = %classified.team,
            label = %classified.classification.primary_label(),
            strength = %classified.classification.strength_after.situation,
            "Classified penalty"
        );

        self.penalties.push(classified.clone());
        EventOutcome::Penalty(classified)
    }
}
