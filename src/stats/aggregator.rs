use std::sync::Arc;

use tracing::{debug, instrument};

use crate::game::{DerivedGameState, GameRecord, StrengthSituation};

use super::{
    collectors::{PenaltyCollector, ResultCollector, ScoringCollector},
    CollectedData, GameOutcome, PlayerSeasonStat, SeasonStats, StatCollector, TeamSeasonStat,
};

/// Folds per-game derived states into season totals through a set of collectors
pub struct Aggregator {
    collectors: Vec<Arc<dyn StatCollector>>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Aggregator {
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }

    pub fn collectors(&self) -> Vec<Arc<dyn StatCollector>> {
        self.collectors.clone()
    }

    #[instrument(skip_all, fields(games = games.len()))]
    pub fn aggregate(&self, games: &[(GameRecord, DerivedGameState)]) -> SeasonStats {
        let mut stats = SeasonStats::default();

        for (record, state) in games {
            stats.games_seen += 1;
            let mut counted_result = false;

            for collector in &self.collectors {
                for data in collector.collect(record, state) {
                    if matches!(data, CollectedData::TeamResult { .. }) {
                        counted_result = true;
                    }
                    apply(&mut stats, data);
                }
            }

            if counted_result {
                stats.games_with_result += 1;
            }
        }

        debug!(
            players = stats.players.len(),
            teams = stats.teams.len(),
            gaps = stats.gaps.len(),
            "Aggregated season stats"
        );
        stats
    }
}

/// Aggregates with the built-in collectors
pub fn aggregate(games: &[(GameRecord, DerivedGameState)]) -> SeasonStats {
    Aggregator::default().aggregate(games)
}

fn apply(stats: &mut SeasonStats, data: CollectedData) {
    match data {
        CollectedData::Goal { scorer, strength } => {
            if strength == StrengthSituation::PowerPlay {
                team_entry(stats, &scorer.team).power_play_goals += 1;
            }

            let player = stats
                .players
                .entry(scorer.clone())
                .or_insert_with(|| PlayerSeasonStat::new(&scorer));
            player.goals += 1;
            player.points += 1;
            match strength {
                StrengthSituation::PowerPlay => player.power_play_goals += 1,
                StrengthSituation::ShortHanded => player.short_handed_goals += 1,
                _ => {}
            }
        }
        CollectedData::Assist { player } => {
            let entry = stats
                .players
                .entry(player.clone())
                .or_insert_with(|| PlayerSeasonStat::new(&player));
            entry.assists += 1;
            entry.points += 1;
        }
        CollectedData::GameLine {
            player,
            goals,
            points,
        } => {
            let entry = stats
                .players
                .entry(player.clone())
                .or_insert_with(|| PlayerSeasonStat::new(&player));
            if points > 0 {
                entry.games_with_point += 1;
            }
            if goals >= 3 {
                entry.hat_tricks += 1;
            }
        }
        CollectedData::PlayerPenalty { player, minutes } => {
            stats
                .players
                .entry(player.clone())
                .or_insert_with(|| PlayerSeasonStat::new(&player))
                .penalty_minutes += minutes;
        }
        CollectedData::TeamPenalty { team, minutes } => {
            team_entry(stats, &team).penalty_minutes += minutes;
        }
        CollectedData::TeamResult {
            team,
            goals_for,
            goals_against,
            outcome,
        } => {
            let entry = team_entry(stats, &team);
            entry.games_played += 1;
            entry.goals_for += goals_for;
            entry.goals_against += goals_against;
            entry.goal_differential = entry.goals_for as i32 - entry.goals_against as i32;
            match outcome {
                GameOutcome::Win => entry.wins += 1,
                GameOutcome::Loss => entry.losses += 1,
                GameOutcome::Tie => {}
            }
        }
        CollectedData::Gap(gap) => stats.gaps.push(gap),
    }
}

fn team_entry<'a>(stats: &'a mut SeasonStats, team: &str) -> &'a mut TeamSeasonStat {
    stats
        .teams
        .entry(team.to_string())
        .or_insert_with(|| TeamSeasonStat::new(team))
}

pub struct AggregatorBuilder {
    collectors: Vec<Arc<dyn StatCollector>>,
}

impl AggregatorBuilder {
    fn new() -> Self {
        Self {
            collectors: vec![
                Arc::new(ScoringCollector::new()),
                Arc::new(PenaltyCollector::new()),
                Arc::new(ResultCollector::new()),
            ],
        }
    }

    pub fn with_collector(mut self, collector: Arc<dyn StatCollector>) -> Self {
        self.collectors.push(collector);
        self
    }

    pub fn build(self) -> Aggregator {
        Aggregator {
            collectors: self.collectors,
        }
    }
}
