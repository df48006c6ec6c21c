mod rules;

pub use rules::{
    HatTrickRule, HighScoringRule, OneGoalGameRule, PenaltyHeavyRule, ShutoutRule,
    HAT_TRICK_GOALS, HIGH_SCORING_GOALS, PENALTY_HEAVY_COUNT,
};

use std::sync::Arc;

use tracing::debug;

use super::ReportOptions;
use crate::stats::{GameResult, PlayerSeasonStat};

/// Priority constants for highlight rules.
/// Lower values run first and claim highlight slots before later rules.
pub mod priority {
    pub const HIGH_SCORING: u32 = 100;
    pub const HAT_TRICK: u32 = 200;
    pub const ONE_GOAL_GAME: u32 = 300;
    pub const PENALTY_HEAVY: u32 = 400;
    pub const SHUTOUT: u32 = 500;
}

/// What highlight rules look at. Players arrive already ranked.
pub struct HighlightContext<'a> {
    pub players: &'a [PlayerSeasonStat],
    pub games: &'a [GameResult],
}

pub trait HighlightRule: Send + Sync {
    fn evaluate(&self, context: &HighlightContext) -> Vec<String>;

    fn priority(&self) -> u32;

    fn name(&self) -> &'static str;
}

pub struct HighlightGenerator {
    rules: Vec<Arc<dyn HighlightRule>>,
    per_rule_cap: usize,
    limit: usize,
}

impl HighlightGenerator {
    pub fn new(options: &ReportOptions) -> Self {
        Self::with_rules(
            vec![
                Arc::new(HighScoringRule),
                Arc::new(HatTrickRule),
                Arc::new(OneGoalGameRule),
                Arc::new(PenaltyHeavyRule),
                Arc::new(ShutoutRule),
            ],
            options,
        )
    }

    pub fn with_rules(mut rules: Vec<Arc<dyn HighlightRule>>, options: &ReportOptions) -> Self {
        rules.sort_by_key(|rule| rule.priority());
        Self {
            rules,
            per_rule_cap: options.per_rule_cap,
            limit: options.highlight_limit,
        }
    }

    pub fn add_rule(&mut self, rule: Arc<dyn HighlightRule>) {
        self.rules.push(rule);
        self.rules.sort_by_key(|rule| rule.priority());
    }

    /// Highlights in rule priority order, each rule capped, the whole list
    /// truncated to the limit. Falls back to summary lines when nothing fires.
    pub fn generate(&self, context: &HighlightContext) -> Vec<String> {
        let mut highlights = Vec::new();
        let mut any_fired = false;
        for rule in &self.rules {
            let fired = rule.evaluate(context);
            debug!(rule = rule.name(), fired = fired.len(), "Evaluated highlight rule");
            any_fired |= !fired.is_empty();
            highlights.extend(fired.into_iter().take(self.per_rule_cap));
        }

        if !any_fired {
            highlights = fallback(context);
        }
        highlights.truncate(self.limit);
        highlights
    }
}

fn fallback(context: &HighlightContext) -> Vec<String> {
    let games = context.games.len();
    let goals: u32 = context.games.iter().map(|game| game.total_goals).sum();

    let leader = match context.players.first() {
        Some(leader) => format!(
            "Leading scorer: {} ({}) with {} points",
            leader.player, leader.team, leader.points
        ),
        None => "Leading scorer: none yet".to_string(),
    };

    vec![
        format!(
            "{} {} played",
            games,
            if games == 1 { "game" } else { "games" }
        ),
        format!("{} {} scored", goals, if goals == 1 { "goal" } else { "goals" }),
        leader,
    ]
}
