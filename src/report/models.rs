use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::stats::{AggregationGap, GameResult, PlayerSeasonStat, TeamSeasonStat};

pub const DEFAULT_HIGHLIGHT_LIMIT: usize = 6;
pub const DEFAULT_PER_RULE_CAP: usize = 2;
pub const DEFAULT_STANDOUT_COUNT: usize = 3;

/// Tuning for report generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub highlight_limit: usize,
    pub per_rule_cap: usize,
    pub standout_count: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            highlight_limit: DEFAULT_HIGHLIGHT_LIMIT,
            per_rule_cap: DEFAULT_PER_RULE_CAP,
            standout_count: DEFAULT_STANDOUT_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum StandoutTag {
    #[serde(rename = "hat-trick hero")]
    #[strum(to_string = "hat-trick hero")]
    HatTrickHero,
    #[serde(rename = "playmaker")]
    #[strum(to_string = "playmaker")]
    Playmaker,
    #[serde(rename = "consistent performer")]
    #[strum(to_string = "consistent performer")]
    ConsistentPerformer,
    #[serde(rename = "solid contributor")]
    #[strum(to_string = "solid contributor")]
    SolidContributor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standout {
    pub rank: usize,
    pub player: String,
    pub team: String,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
    pub tag: StandoutTag,
}

/// The single current report for a division. Always rebuilt wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionReport {
    pub division: String,
    pub generated_at: DateTime<Utc>,
    pub highlights: Vec<String>,
    pub standouts: Vec<Standout>,
    /// Players in scoring order
    pub players: Vec<PlayerSeasonStat>,
    /// Teams in standings order
    pub teams: Vec<TeamSeasonStat>,
    pub games: Vec<GameResult>,
    #[serde(default)]
    pub gaps: Vec<AggregationGap>,
}
