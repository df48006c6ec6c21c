use std::cmp::Ordering;

use super::{PlayerSeasonStat, SeasonStats, TeamSeasonStat};

/// Scoring order: points desc, goals desc, then player name and team ascending
pub fn compare_players(a: &PlayerSeasonStat, b: &PlayerSeasonStat) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goals.cmp(&a.goals))
        .then_with(|| a.player.cmp(&b.player))
        .then_with(|| a.team.cmp(&b.team))
}

/// Standings order: wins desc, goal differential desc, goals-for desc, then name
pub fn compare_teams(a: &TeamSeasonStat, b: &TeamSeasonStat) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.goal_differential.cmp(&a.goal_differential))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.team.cmp(&b.team))
}

pub fn rank_players(stats: &SeasonStats) -> Vec<PlayerSeasonStat> {
    let mut players: Vec<PlayerSeasonStat> = stats.players.values().cloned().collect();
    players.sort_by(compare_players);
    players
}

pub fn rank_teams(stats: &SeasonStats) -> Vec<TeamSeasonStat> {
    let mut teams: Vec<TeamSeasonStat> = stats.teams.values().cloned().collect();
    teams.sort_by(compare_teams);
    teams
}
