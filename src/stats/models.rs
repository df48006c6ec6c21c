use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::Display;

use super::errors::AggregationGap;
use crate::game::{DerivedGameState, GameRecord, PlayerKey, StrengthSituation};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSeasonStat {
    pub player: String,
    pub team: String,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
    pub penalty_minutes: u32,
    pub power_play_goals: u32,
    pub short_handed_goals: u32,
    /// Games in which the player scored or assisted
    pub games_with_point: u32,
    /// Games in which the player scored three or more
    pub hat_tricks: u32,
}

impl PlayerSeasonStat {
    pub fn new(key: &PlayerKey) -> Self {
        Self {
            player: key.player.clone(),
            team: key.team.clone(),
            ..Self::default()
        }
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(&self.player, &self.team)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSeasonStat {
    pub team: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_differential: i32,
    pub penalty_minutes: u32,
    pub power_play_goals: u32,
}

impl TeamSeasonStat {
    pub fn new(team: &str) -> Self {
        Self {
            team: team.to_string(),
            ..Self::default()
        }
    }
}

/// Everything the aggregator produced for one scope of games
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub players: BTreeMap<PlayerKey, PlayerSeasonStat>,
    pub teams: BTreeMap<String, TeamSeasonStat>,
    pub gaps: Vec<AggregationGap>,
    /// Games folded into player tallies
    pub games_seen: u32,
    /// Games that also counted toward team results
    pub games_with_result: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameOutcome {
    Win,
    Loss,
    Tie,
}

impl GameOutcome {
    pub fn from_scores(goals_for: u32, goals_against: u32) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => GameOutcome::Win,
            std::cmp::Ordering::Less => GameOutcome::Loss,
            std::cmp::Ordering::Equal => GameOutcome::Tie,
        }
    }
}

/// A single data point emitted by a collector for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectedData {
    Goal {
        scorer: PlayerKey,
        strength: StrengthSituation,
    },
    Assist {
        player: PlayerKey,
    },
    /// A player's line for one game, used for per-game milestones
    GameLine {
        player: PlayerKey,
        goals: u32,
        points: u32,
    },
    PlayerPenalty {
        player: PlayerKey,
        minutes: u32,
    },
    TeamPenalty {
        team: String,
        minutes: u32,
    },
    TeamResult {
        team: String,
        goals_for: u32,
        goals_against: u32,
        outcome: GameOutcome,
    },
    Gap(AggregationGap),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team: String,
    pub goals: u32,
}

/// Per-game summary consumed by highlight rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: String,
    pub division: String,
    pub scores: Vec<TeamScore>,
    pub total_goals: u32,
    pub total_penalties: u32,
    pub has_final_summary: bool,
}

impl GameResult {
    pub fn from_game(record: &GameRecord, state: &DerivedGameState) -> Self {
        let scores = state
            .score
            .iter()
            .map(|(team, goals)| TeamScore {
                team: team.clone(),
                goals: *goals,
            })
            .collect();

        Self {
            game_id: record.id.clone(),
            division: record.division.clone(),
            scores,
            total_goals: state.total_goals(),
            total_penalties: state.total_penalties() as u32,
            has_final_summary: record.has_final_summary(),
        }
    }

    /// Winning margin when exactly two teams appear in the score
    pub fn differential(&self) -> Option<u32> {
        match self.scores.as_slice() {
            [first, second] => Some(first.goals.abs_diff(second.goals)),
            _ => None,
        }
    }

    /// The (winner, loser) pair of a two-team game that did not end tied
    pub fn winner_and_loser(&self) -> Option<(&TeamScore, &TeamScore)> {
        match self.scores.as_slice() {
            [first, second] if first.goals > second.goals => Some((first, second)),
            [first, second] if second.goals > first.goals => Some((second, first)),
            _ => None,
        }
    }
}
