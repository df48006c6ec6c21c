//! Fluent builders for game logs
#![allow(dead_code)] // Test utilities may not all be used in every test

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use rinkstats::{
    event::{EventHeader, GameClock, GameEvent, GoalEvent, GoalType, PenaltyEvent, Period},
    game::{GameRecord, GameStatus},
};

// ============================================================================
// Game Log Builder
// ============================================================================

/// Builds a game's metadata and its event log. Each event is recorded one
/// second after the previous one, at the game position set by `at`.
pub struct GameLogBuilder {
    record: GameRecord,
    events: Vec<GameEvent>,
    period: Period,
    clock: GameClock,
    recorded_at: DateTime<Utc>,
}

impl GameLogBuilder {
    pub fn new(game_id: &str) -> Self {
        Self {
            record: GameRecord {
                id: game_id.to_string(),
                division: "Gold".to_string(),
                home_team: Some("Blades".to_string()),
                away_team: Some("Pucks".to_string()),
                status: GameStatus::Final,
                scheduled_at: None,
            },
            events: vec![],
            period: Period::Regulation(1),
            clock: GameClock::from_remaining_seconds(20 * 60).unwrap(),
            recorded_at: Utc.with_ymd_and_hms(2024, 1, 5, 19, 0, 0).unwrap(),
        }
    }

    pub fn division(mut self, division: &str) -> Self {
        self.record.division = division.to_string();
        self
    }

    pub fn teams(mut self, home: &str, away: &str) -> Self {
        self.record.home_team = Some(home.to_string());
        self.record.away_team = Some(away.to_string());
        self
    }

    pub fn without_away_team(mut self) -> Self {
        self.record.away_team = None;
        self
    }

    pub fn status(mut self, status: GameStatus) -> Self {
        self.record.status = status;
        self
    }

    /// Moves the game position for the next events
    pub fn at(mut self, period: u8, clock: &str) -> Self {
        self.period = Period::Regulation(period);
        self.clock = GameClock::parse(clock).unwrap();
        self
    }

    pub fn overtime(mut self, clock: &str) -> Self {
        self.period = Period::Overtime;
        self.clock = GameClock::parse(clock).unwrap();
        self
    }

    fn header(&mut self, team: &str, player: &str) -> EventHeader {
        self.recorded_at += Duration::seconds(1);
        EventHeader {
            id: Uuid::new_v4(),
            game_id: self.record.id.clone(),
            team: team.to_string(),
            player: Some(player.to_string()),
            period: Some(self.period),
            clock: Some(self.clock),
            recorded_at: self.recorded_at,
            defects: vec![],
        }
    }

    pub fn goal(self, team: &str, scorer: &str) -> Self {
        self.assisted_goal(team, scorer, &[])
    }

    pub fn assisted_goal(mut self, team: &str, scorer: &str, assists: &[&str]) -> Self {
        let header = self.header(team, scorer);
        self.events.push(GameEvent::Goal(GoalEvent {
            header,
            assists: assists.iter().map(|a| a.to_string()).collect(),
            goal_type: GoalType::EvenStrength,
        }));
        self
    }

    /// Adds `count` goals for a team, all by the same scorer
    pub fn goals(mut self, team: &str, scorer: &str, count: usize) -> Self {
        for _ in 0..count {
            self = self.goal(team, scorer);
        }
        self
    }

    pub fn penalty(mut self, team: &str, player: &str, label: &str, minutes: u32) -> Self {
        let header = self.header(team, player);
        self.events.push(GameEvent::Penalty(PenaltyEvent {
            header,
            penalty_type: Some(label.to_string()),
            duration_minutes: Some(minutes),
        }));
        self
    }

    /// Adds a goal with no clock, which the reconstructor must reject but still count
    pub fn goal_without_clock(mut self, team: &str, scorer: &str) -> Self {
        let mut header = self.header(team, scorer);
        header.clock = None;
        self.events.push(GameEvent::Goal(GoalEvent {
            header,
            assists: vec![],
            goal_type: GoalType::Unknown,
        }));
        self
    }

    pub fn record(&self) -> GameRecord {
        self.record.clone()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.clone()
    }

    pub fn into_parts(self) -> (GameRecord, Vec<GameEvent>) {
        (self.record, self.events)
    }
}
