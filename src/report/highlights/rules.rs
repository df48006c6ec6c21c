use super::{priority, HighlightContext, HighlightRule};
use crate::stats::GameResult;

pub const HIGH_SCORING_GOALS: u32 = 8;
pub const HAT_TRICK_GOALS: u32 = 3;
pub const PENALTY_HEAVY_COUNT: u32 = 8;

fn scoreline(game: &GameResult) -> String {
    game.scores
        .iter()
        .map(|score| format!("{} {}", score.team, score.goals))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub struct HighScoringRule;

impl HighlightRule for HighScoringRule {
    fn evaluate(&self, context: &HighlightContext) -> Vec<String> {
        context
            .games
            .iter()
            .filter(|game| game.total_goals >= HIGH_SCORING_GOALS)
            .map(|game| {
                format!(
                    "Goal fest: {} combined for {} goals",
                    scoreline(game),
                    game.total_goals
                )
            })
            .collect()
    }

    fn priority(&self) -> u32 {
        priority::HIGH_SCORING
    }

    fn name(&self) -> &'static str {
        "high-scoring"
    }
}

/// Players with three or more goals across the reporting window
pub struct HatTrickRule;

impl HighlightRule for HatTrickRule {
    fn evaluate(&self, context: &HighlightContext) -> Vec<String> {
        context
            .players
            .iter()
            .filter(|player| player.goals >= HAT_TRICK_GOALS)
            .map(|player| {
                format!(
                    "Hat trick: {} ({}) has found the net {} times",
                    player.player, player.team, player.goals
                )
            })
            .collect()
    }

    fn priority(&self) -> u32 {
        priority::HAT_TRICK
    }

    fn name(&self) -> &'static str {
        "hat-trick"
    }
}

pub struct OneGoalGameRule;

impl HighlightRule for OneGoalGameRule {
    fn evaluate(&self, context: &HighlightContext) -> Vec<String> {
        context
            .games
            .iter()
            .filter(|game| game.has_final_summary && game.differential() == Some(1))
            .filter_map(|game| game.winner_and_loser())
            .map(|(winner, loser)| {
                format!(
                    "Nail-biter: {} edged {} {}-{}",
                    winner.team, loser.team, winner.goals, loser.goals
                )
            })
            .collect()
    }

    fn priority(&self) -> u32 {
        priority::ONE_GOAL_GAME
    }

    fn name(&self) -> &'static str {
        "one-goal-game"
    }
}

pub struct PenaltyHeavyRule;

impl HighlightRule for PenaltyHeavyRule {
    fn evaluate(&self, context: &HighlightContext) -> Vec<String> {
        context
            .games
            .iter()
            .filter(|game| game.total_penalties >= PENALTY_HEAVY_COUNT)
            .map(|game| {
                format!(
                    "Physical one: {} penalties called in {}",
                    game.total_penalties,
                    scoreline(game)
                )
            })
            .collect()
    }

    fn priority(&self) -> u32 {
        priority::PENALTY_HEAVY
    }

    fn name(&self) -> &'static str {
        "penalty-heavy"
    }
}

pub struct ShutoutRule;

impl HighlightRule for ShutoutRule {
    fn evaluate(&self, context: &HighlightContext) -> Vec<String> {
        context
            .games
            .iter()
            .filter(|game| game.has_final_summary && game.total_goals > 0)
            .filter_map(|game| game.winner_and_loser())
            .filter(|(_, loser)| loser.goals == 0)
            .map(|(winner, loser)| {
                format!(
                    "Shutout: {} blanked {} {}-0",
                    winner.team, loser.team, winner.goals
                )
            })
            .collect()
    }

    fn priority(&self) -> u32 {
        priority::SHUTOUT
    }

    fn name(&self) -> &'static str {
        "shutout"
    }
}
